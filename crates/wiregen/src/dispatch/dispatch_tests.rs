#![allow(non_snake_case)]

use super::*;
use crate::model::{FieldModel, WireBinding};
use crate::syntax::parse_source;
use std::path::Path;
use test_case::test_case;

fn unit_of(type_name: &str, fields: &str) -> GenerationUnit {
    let source = format!("package transactions\n\ntype {type_name} struct {{\n{fields}\n}}\n");
    let file = parse_source(Path::new("widget.go"), &source).unwrap();
    let wire = WireBinding {
        message: format!("{type_name}Body"),
        accessor: format!("Get{type_name}Body"),
    };
    FieldModel::new("wire")
        .build_unit(&file, &file.structs[0], wire)
        .unwrap()
}

fn run(unit: &GenerationUnit, pass: Pass) -> CodegenResult<String> {
    let templates = TemplateSet::builtin().unwrap();
    TemplateDispatcher::new(&templates).run(unit, pass)
}

// Scenario: a single string field flagged for every accessor pass

fn widget() -> GenerationUnit {
    unit_of(
        "Widget",
        r#"    Name string `wire:"getter,setter,toWire,fromWire"`"#,
    )
}

#[test]
fn run___widget_getter___returns_field() {
    let out = run(&widget(), Pass::Getter).unwrap();

    assert_eq!(out, "func (w *Widget) GetName() string {\n\treturn w.Name\n}\n");
}

#[test]
fn run___widget_setter___chains_receiver() {
    let out = run(&widget(), Pass::Setter).unwrap();

    assert_eq!(
        out,
        "func (w *Widget) SetName(name string) *Widget {\n\tw.Name = name\n\treturn w\n}\n"
    );
}

#[test]
fn run___widget_to_wire___sets_only_non_empty() {
    let out = run(&widget(), Pass::ToWire).unwrap();

    assert_eq!(
        out,
        concat!(
            "func (w *Widget) buildWidgetBody() *services.WidgetBody {\n",
            "\tbody := &services.WidgetBody{}\n",
            "\tif w.Name != \"\" {\n",
            "\t\tbody.Name = w.Name\n",
            "\t}\n",
            "\treturn body\n",
            "}\n",
        )
    );
}

#[test]
fn run___widget_from_wire___calls_setter_when_non_empty() {
    let out = run(&widget(), Pass::FromWire).unwrap();

    assert!(out.starts_with(
        "func WidgetFromWire(source interface{ GetWidgetBody() *services.WidgetBody }) (*Widget, error) {\n"
    ));
    assert!(out.contains("\tbody := source.GetWidgetBody()\n"));
    assert!(out.contains("\tif body.Name != \"\" {\n\t\tw.SetName(body.Name)\n\t}\n"));
    assert!(out.ends_with("\treturn w, nil\n}\n"));
}

#[test]
fn run___no_identifier_fields___checksum_is_trivial() {
    let out = run(&widget(), Pass::Checksum).unwrap();

    assert_eq!(
        out,
        "func (w *Widget) validateChecksums(client *sdk.Client) error {\n\treturn nil\n}\n"
    );
}

// Participation tests

#[test]
fn run___unflagged_fields___skipped() {
    let unit = unit_of(
        "TopicUpdateTransaction",
        "    memo string\n    count int64",
    );

    assert_eq!(run(&unit, Pass::Getter).unwrap(), "");
    assert_eq!(run(&unit, Pass::Setter).unwrap(), "");
    assert!(!run(&unit, Pass::ToWire).unwrap().contains("memo"));
}

#[test]
fn run___fields_in_declaration_order___separated_by_blank_line() {
    let unit = unit_of(
        "TopicUpdateTransaction",
        r#"    memo string `wire:"getter"`
    adminKey sdk.Key `wire:"getter"`"#,
    );

    let out = run(&unit, Pass::Getter).unwrap();

    let memo = out.find("GetMemo()").unwrap();
    let key = out.find("GetAdminKey()").unwrap();
    assert!(memo < key);
    assert!(out.contains("}\n\nfunc (t *TopicUpdateTransaction) GetAdminKey() sdk.Key {"));
}

#[test]
fn run___unknown_flagged_type___names_type_field_pass() {
    let unit = unit_of("Widget", r#"    Count int64 `wire:"getter"`"#);

    let err = run(&unit, Pass::Getter).unwrap_err();

    match err {
        CodegenError::UnknownWireType {
            type_name,
            field,
            pass,
            ty,
        } => {
            assert_eq!(type_name, "Widget");
            assert_eq!(field, "Count");
            assert_eq!(pass, "getter");
            assert_eq!(ty, "int64");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn run___unknown_type_not_flagged_for_pass___ignored() {
    let unit = unit_of("Widget", r#"    Count int64 `wire:"getter"`"#);

    assert!(run(&unit, Pass::Setter).is_ok());
}

#[test_case("[]int64", Pass::ToWire, "to-wire" ; "integer list to wire")]
#[test_case("[]uint32", Pass::FromWire, "from-wire" ; "unsigned list from wire")]
#[test_case("*bool", Pass::Getter, "getter" ; "bare pointer is unsupported earlier")]
#[test_case("[]sdk.NftID", Pass::Getter, "getter" ; "unrecognized entity list getter")]
fn run___unrecognized_element___is_unknown_wire_type(ty: &str, pass: Pass, name: &str) {
    let source = format!("package p\ntype WidgetQuery struct {{\n    values {ty} `wire:\"getter,toWire,fromWire\"`\n}}\n");
    let file = parse_source(Path::new("w.go"), &source).unwrap();
    let built = FieldModel::new("wire").build_unit(
        &file,
        &file.structs[0],
        WireBinding {
            message: "M".into(),
            accessor: "GetM".into(),
        },
    );

    let err = match built {
        Ok(unit) => run(&unit, pass).unwrap_err(),
        Err(err) => {
            assert!(matches!(err, CodegenError::UnsupportedShape { .. }));
            return;
        }
    };

    assert!(matches!(err, CodegenError::UnknownWireType { ref pass, .. } if pass == name));
}

// Shape-specific accessors

#[test]
fn run___singular_slice___index_getter_and_add_setter() {
    let unit = unit_of(
        "TokenAssociateTransaction",
        r#"    tokenIDs []TokenID `wire:"getter,setter,singular"`"#,
    );

    let getter = run(&unit, Pass::Getter).unwrap();
    let setter = run(&unit, Pass::Setter).unwrap();

    assert!(getter.contains("func (t *TokenAssociateTransaction) GetTokenID(index int) TokenID {"));
    assert!(getter.contains("\treturn t.tokenIDs[index]\n"));
    assert!(setter.contains(
        "func (t *TokenAssociateTransaction) AddTokenID(tokenID TokenID) *TokenAssociateTransaction {"
    ));
    assert!(setter.contains("\tt.tokenIDs = append(t.tokenIDs, tokenID)\n"));
}

#[test]
fn run___plain_slice___getter_returns_whole_value() {
    let unit = unit_of(
        "TokenAssociateTransaction",
        r#"    tokenIDs []TokenID `wire:"getter,setter"`"#,
    );

    let getter = run(&unit, Pass::Getter).unwrap();
    let setter = run(&unit, Pass::Setter).unwrap();

    assert_eq!(
        getter,
        "func (t *TokenAssociateTransaction) GetTokenIDs() []TokenID {\n\treturn t.tokenIDs\n}\n"
    );
    assert!(setter.contains("SetTokenIDs(tokenIDs []TokenID)"));
}

#[test]
fn run___pointer_entity___dereferences_with_nil_check() {
    let unit = unit_of(
        "AccountUpdateTransaction",
        r#"    accountID *sdk.AccountID `wire:"getter,setter"`"#,
    );

    let getter = run(&unit, Pass::Getter).unwrap();
    let setter = run(&unit, Pass::Setter).unwrap();

    assert!(getter.contains("GetAccountID() sdk.AccountID {"));
    assert!(getter.contains("\t\treturn sdk.AccountID{}\n"));
    assert!(getter.contains("\treturn *a.accountID\n"));
    assert!(setter.contains("SetAccountID(accountID sdk.AccountID) *AccountUpdateTransaction {"));
    assert!(setter.contains("\ta.accountID = &accountID\n"));
}

#[test]
fn run___keyword_param___prefixed() {
    let unit = unit_of("WidgetQuery", r#"    Type string `wire:"setter"`"#);

    let setter = run(&unit, Pass::Setter).unwrap();

    assert!(setter.contains("SetType(newType string)"));
    assert!(setter.contains("w.Type = newType"));
}

#[test]
fn run___wire_name_override___used_on_both_sides() {
    let unit = unit_of(
        "TopicCreateTransaction",
        r#"    memo string `wire:"setter,toWire,fromWire,wireName=TopicMemo"`"#,
    );

    let to_wire = run(&unit, Pass::ToWire).unwrap();
    let from_wire = run(&unit, Pass::FromWire).unwrap();

    assert!(to_wire.contains("body.TopicMemo = t.memo"));
    assert!(from_wire.contains("t.SetMemo(body.TopicMemo)"));
}

// Checksum pass

#[test]
fn run___checksum___covers_non_slice_identifiers_regardless_of_flags() {
    let unit = unit_of(
        "TokenAssociateTransaction",
        "    accountID *sdk.AccountID\n    nftID NftID\n    tokenIDs []TokenID\n    memo string",
    );

    let out = run(&unit, Pass::Checksum).unwrap();

    assert!(out.contains("\tif t.accountID != nil {\n\t\tif err := t.accountID.ValidateChecksum(client); err != nil {"));
    assert!(out.contains("\tif err := t.nftID.ValidateChecksum(client); err != nil {"));
    assert!(!out.contains("tokenIDs"));
    assert!(!out.contains("memo"));
}

// Round-trip symmetry: whatever to-wire writes, from-wire reads back

#[test_case("bool", "t.SetValue(true)" ; "bool")]
#[test_case("sdk.Hbar", "t.SetValue(sdk.HbarFromTinybar(body.Payload))" ; "amount")]
#[test_case("sdk.AccountID", "t.SetValue(*sdk.AccountIDFromWire(body.Payload))" ; "entity")]
#[test_case("sdk.Key", "t.SetValue(key)" ; "key")]
#[test_case("time.Duration", "t.SetValue(sdk.DurationFromWire(body.Payload))" ; "duration")]
#[test_case("string", "t.SetValue(body.Payload)" ; "text")]
#[test_case("*sdk.TopicID", "t.SetValue(*sdk.TopicIDFromWire(body.Payload))" ; "pointer entity")]
fn run___round_trip___same_wire_field_and_setter(ty: &str, restore: &str) {
    let unit = unit_of(
        "TopicUpdateTransaction",
        &format!("    value {ty} `wire:\"setter,toWire,fromWire,wireName=Payload\"`"),
    );

    let to_wire = run(&unit, Pass::ToWire).unwrap();
    let from_wire = run(&unit, Pass::FromWire).unwrap();

    assert!(to_wire.contains("body.Payload = "), "{to_wire}");
    assert!(from_wire.contains("body.Payload"), "{from_wire}");
    assert!(from_wire.contains(restore), "{from_wire}");
}

#[test_case("[]TokenID", "*TokenIDFromWire(item)" ; "entity list")]
#[test_case("[]Key", "KeyFromWire(item)" ; "key list")]
#[test_case("[]string", "append([]string(nil), body.Payload...)" ; "text list")]
#[test_case("[]bool", "append([]bool(nil), body.Payload...)" ; "bool list")]
#[test_case("[]sdk.Hbar", "sdk.HbarFromTinybar(item)" ; "amount list")]
#[test_case("[]time.Duration", "sdk.DurationFromWire(item)" ; "duration list")]
fn run___round_trip_slices___assigned_directly(ty: &str, restore: &str) {
    let unit = unit_of(
        "TopicUpdateTransaction",
        &format!("    values {ty} `wire:\"toWire,fromWire,wireName=Payload\"`"),
    );

    let to_wire = run(&unit, Pass::ToWire).unwrap();
    let from_wire = run(&unit, Pass::FromWire).unwrap();

    assert!(to_wire.contains("body.Payload = "), "{to_wire}");
    assert!(from_wire.contains(restore), "{from_wire}");
    assert!(from_wire.contains("t.values = "), "{from_wire}");
    assert!(!from_wire.contains("SetValues"), "{from_wire}");
}

#[test]
fn run___slice_conversions___convert_element_wise() {
    let unit = unit_of(
        "FeeScheduleTransaction",
        "    fees []sdk.Hbar `wire:\"toWire\"`\n    periods []time.Duration `wire:\"toWire\"`",
    );

    let out = run(&unit, Pass::ToWire).unwrap();

    assert!(out.contains(
        "\tfor _, item := range f.fees {\n\t\tbody.Fees = append(body.Fees, item.AsTinybar())\n\t}\n"
    ));
    assert!(out.contains(
        "\tfor _, item := range f.periods {\n\t\tbody.Periods = append(body.Periods, sdk.DurationToWire(item))\n\t}\n"
    ));
}

// A pointer to a zero amount is written as 0, which reads back as unset
#[test]
fn run___pointer_to_zero_amount___not_restored() {
    let unit = unit_of(
        "CryptoTransferTransaction",
        "    fee *sdk.Hbar `wire:\"setter,toWire,fromWire\"`",
    );

    let to_wire = run(&unit, Pass::ToWire).unwrap();
    let from_wire = run(&unit, Pass::FromWire).unwrap();

    assert!(to_wire.contains("\tif c.fee != nil {\n\t\tbody.Fee = c.fee.AsTinybar()\n\t}\n"));
    assert!(from_wire.contains(
        "\tif body.Fee != 0 {\n\t\tc.SetFee(sdk.HbarFromTinybar(body.Fee))\n\t}\n"
    ));
}

#[test]
fn run_all___emits_every_pass_in_order() {
    let templates = TemplateSet::builtin().unwrap();

    let outputs = TemplateDispatcher::new(&templates).run_all(&widget()).unwrap();

    let passes: Vec<Pass> = outputs.iter().map(|o| o.pass).collect();
    assert_eq!(passes, Pass::ALL.to_vec());
}

#[test]
fn run_all___stops_on_first_failing_pass() {
    let templates = TemplateSet::builtin().unwrap();
    let unit = unit_of("Widget", r#"    Count int64 `wire:"fromWire"`"#);

    let err = TemplateDispatcher::new(&templates).run_all(&unit).unwrap_err();

    assert!(matches!(err, CodegenError::UnknownWireType { ref pass, .. } if pass == "from-wire"));
}
