#![allow(non_snake_case)]

use super::*;
use crate::config::ImportConfig;
use crate::model::{FieldModel, WireBinding};
use crate::syntax::parse_source;
use crate::templates::{Pass, TemplateSet};
use test_case::test_case;

#[test_case("/src/tx/widget.go", "_generated", "/src/tx/widget_generated.go" ; "go file")]
#[test_case("widget.go", "_gen", "widget_gen.go" ; "relative with custom suffix")]
#[test_case("/src/tx/widget", "_generated", "/src/tx/widget_generated" ; "no extension")]
#[test_case("/src/tx/token.associate.go", "_generated", "/src/tx/token.associate_generated.go" ; "dotted stem")]
fn output_path___stem_suffix_extension(source: &str, suffix: &str, expected: &str) {
    assert_eq!(output_path(Path::new(source), suffix), PathBuf::from(expected));
}

#[test]
fn render_file___layout() {
    let outputs = vec![
        PassOutput {
            pass: Pass::Getter,
            text: "func a() {}\n".into(),
        },
        PassOutput {
            pass: Pass::Setter,
            text: String::new(),
        },
        PassOutput {
            pass: Pass::ToWire,
            text: "func b() {}\n".into(),
        },
    ];

    let out = render_file("widgets", &["\"sdk\"".into(), "\"time\"".into()], &outputs);

    assert_eq!(
        out,
        concat!(
            "// Code generated by wiregen. DO NOT EDIT.\n",
            "\n",
            "package widgets\n",
            "\n",
            "import (\n",
            "\t\"sdk\"\n",
            "\t\"time\"\n",
            ")\n",
            "\n",
            "func a() {}\n",
            "\n",
            "func b() {}\n",
        )
    );
}

#[test]
fn render_file___no_imports___omits_block() {
    let out = render_file("widgets", &[], &[]);

    assert_eq!(out, "// Code generated by wiregen. DO NOT EDIT.\n\npackage widgets\n");
}

#[test]
fn emit___plans_file_next_to_source() {
    let source = "package transactions\n\ntype Widget struct {\n    Name string `wire:\"getter,setter,toWire,fromWire\"`\n}\n";
    let file = parse_source(Path::new("/src/tx/widget.go"), source).unwrap();
    let unit = FieldModel::new("wire")
        .build_unit(
            &file,
            &file.structs[0],
            WireBinding {
                message: "WidgetBody".into(),
                accessor: "GetWidgetBody".into(),
            },
        )
        .unwrap();
    let templates = TemplateSet::builtin().unwrap();
    let imports = ImportConfig::default();
    let emitter = FileEmitter::new(
        TemplateDispatcher::new(&templates),
        ImportResolver::new(&imports),
        "_generated",
    );

    let planned = emitter.emit(&unit).unwrap();

    assert_eq!(planned.type_name, "Widget");
    assert_eq!(planned.path, PathBuf::from("/src/tx/widget_generated.go"));
    assert!(planned.contents.starts_with(GENERATED_HEADER));
    assert!(planned.contents.contains("\npackage transactions\n"));
    assert!(planned.contents.contains("\t\"github.com/ledgerkit/ledger-sdk-go/v2/sdk\"\n"));

    let getter = planned.contents.find("GetName()").unwrap();
    let setter = planned.contents.find("SetName(").unwrap();
    let to_wire = planned.contents.find("buildWidgetBody()").unwrap();
    let from_wire = planned.contents.find("func WidgetFromWire(").unwrap();
    let checksum = planned.contents.find("validateChecksums(").unwrap();
    assert!(getter < setter && setter < to_wire && to_wire < from_wire && from_wire < checksum);
    assert!(planned.contents.ends_with("}\n"));
    assert!(!planned.contents.contains("\n\n\n"));
}

#[test]
fn emit___is_deterministic() {
    let source = "package transactions\n\ntype FileAppendTransaction struct {\n    fileID *sdk.FileID `wire:\"getter,setter,toWire,fromWire\"`\n    contents string `wire:\"toWire\"`\n}\n";
    let file = parse_source(Path::new("file_append.go"), source).unwrap();
    let wire = WireBinding {
        message: "FileAppendTransactionBody".into(),
        accessor: "GetFileAppend".into(),
    };
    let unit = FieldModel::new("wire")
        .build_unit(&file, &file.structs[0], wire)
        .unwrap();
    let templates = TemplateSet::builtin().unwrap();
    let imports = ImportConfig::default();
    let emitter = FileEmitter::new(
        TemplateDispatcher::new(&templates),
        ImportResolver::new(&imports),
        "_generated",
    );

    let first = emitter.emit(&unit).unwrap();
    let second = emitter.emit(&unit).unwrap();

    assert_eq!(first, second);
}
