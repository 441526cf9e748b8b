//! Template dispatch.
//!
//! Each pass walks the fields of a unit in declaration order, picks one
//! template per participating field and wraps the accumulated snippets in the
//! pass skeleton. A field participates in:
//!
//! - getter, setter, to-wire, from-wire: when flagged for that pass;
//! - checksum: when it is not a slice and its declared type name ends in
//!   `ID`, regardless of flags.
//!
//! There is no fallback. A participating field without a template aborts the
//! run with [`CodegenError::UnknownWireType`].

use crate::error::{CodegenError, CodegenResult};
use crate::model::{Field, GenerationUnit};
use crate::naming::{capitalize, receiver_name, to_param_name};
use crate::templates::{Form, Kind, Pass, Selector, TemplateSet};
use std::collections::BTreeMap;

/// Rendered output of one pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOutput {
    pub pass: Pass,
    pub text: String,
}

/// Runs the generation passes against a shared template set
#[derive(Debug, Clone, Copy)]
pub struct TemplateDispatcher<'t> {
    templates: &'t TemplateSet,
}

impl<'t> TemplateDispatcher<'t> {
    pub fn new(templates: &'t TemplateSet) -> Self {
        Self { templates }
    }

    /// Run all five passes in emission order
    pub fn run_all(&self, unit: &GenerationUnit) -> CodegenResult<Vec<PassOutput>> {
        Pass::ALL
            .into_iter()
            .map(|pass| -> CodegenResult<PassOutput> {
                Ok(PassOutput {
                    pass,
                    text: self.run(unit, pass)?,
                })
            })
            .collect()
    }

    /// Run one pass
    pub fn run(&self, unit: &GenerationUnit, pass: Pass) -> CodegenResult<String> {
        let templates = self.templates.pass(pass);
        let receiver = receiver_name(&unit.name);

        let mut snippets = Vec::new();
        for field in &unit.fields {
            let Some(selector) = select(unit, field, pass)? else {
                continue;
            };
            let template = templates
                .field(selector)
                .ok_or_else(|| unknown_wire_type(unit, field, pass))?;

            tracing::trace!(type_name = %unit.name, field = %field.name, %pass, %selector, "dispatch");
            snippets.push(template.render(&field_values(unit, &receiver, field)));
        }

        let mut values = unit_values(unit, &receiver);
        values.insert("Body", snippets.join(pass.separator()));
        Ok(templates.function().render(&values))
    }
}

/// Template selector of `field` in `pass`, or `None` when it does not take part
fn select(unit: &GenerationUnit, field: &Field, pass: Pass) -> CodegenResult<Option<Selector>> {
    let flagged = match pass {
        Pass::Getter => field.config.getter,
        Pass::Setter => field.config.setter,
        Pass::ToWire => field.config.to_wire,
        Pass::FromWire => field.config.from_wire,
        Pass::Checksum => return Ok(checksum_selector(field)),
    };
    if !flagged {
        return Ok(None);
    }

    let kind = Kind::classify(field.effective_base())
        .ok_or_else(|| unknown_wire_type(unit, field, pass))?;
    Ok(Some(Selector::new(kind, form_of(field))))
}

fn form_of(field: &Field) -> Form {
    match (field.ty.is_pointer, field.ty.is_array, field.config.singular) {
        (true, _, _) => Form::Pointer,
        (false, true, true) => Form::Singular,
        (false, true, false) => Form::Slice,
        (false, false, _) => Form::Value,
    }
}

fn checksum_selector(field: &Field) -> Option<Selector> {
    if field.ty.is_array || !field.ty.base_name.ends_with("ID") {
        return None;
    }
    let form = if field.ty.is_pointer {
        Form::Pointer
    } else {
        Form::Value
    };
    Some(Selector::new(Kind::Id, form))
}

fn unknown_wire_type(unit: &GenerationUnit, field: &Field, pass: Pass) -> CodegenError {
    CodegenError::UnknownWireType {
        type_name: unit.name.clone(),
        field: field.name.clone(),
        pass: pass.name().to_string(),
        ty: field.ty.to_string(),
    }
}

fn unit_values<'a>(unit: &GenerationUnit, receiver: &str) -> BTreeMap<&'a str, String> {
    BTreeMap::from([
        ("Struct", unit.name.clone()),
        ("Recv", receiver.to_string()),
        ("Message", unit.wire.message.clone()),
        ("Accessor", unit.wire.accessor.clone()),
    ])
}

fn field_values<'a>(
    unit: &GenerationUnit,
    receiver: &str,
    field: &Field,
) -> BTreeMap<&'a str, String> {
    let name = capitalize(field.effective_name());
    let base = field.effective_base().to_string();
    let pkg = field
        .ty
        .package_qualifier
        .as_ref()
        .map(|q| format!("{q}."))
        .unwrap_or_default();

    let mut values = unit_values(unit, receiver);
    values.extend([
        ("Field", field.name.clone()),
        ("Param", to_param_name(&name)),
        ("Name", name),
        ("Type", field.ty.to_string()),
        ("Elem", format!("{pkg}{base}")),
        ("Pkg", pkg),
        ("Base", base),
        ("Wire", field.wire_field()),
    ]);
    values
}

#[cfg(test)]
#[path = "dispatch/dispatch_tests.rs"]
mod dispatch_tests;
