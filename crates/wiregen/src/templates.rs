//! Template sets for the generation passes.
//!
//! Every pass reads one template file made of sections. A section starts with
//! a header line naming the selectors it serves and runs to the next header:
//!
//! ```text
//! # comment lines are allowed before the first section
//! @@ function
//! {{Body}}
//!
//! @@ bool text
//! func ({{Recv}} *{{Struct}}) Get{{Name}}() {{Type}} {
//!     return {{Recv}}.{{Field}}
//! }
//! ```
//!
//! `@@ function` is the pass skeleton. Field selectors are a kind name
//! (`bool`, `amount`, `entity`, `key`, `duration`, `text`, `id`) with an
//! optional form prefix: `*` pointer, `[]` slice, `+` singular slice.
//!
//! A line made of a single placeholder disappears when the placeholder
//! renders empty, so an empty `{{Body}}` leaves no blank line behind.

use crate::error::{CodegenError, CodegenResult};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Placeholders available to `@@ function` sections
const FUNCTION_PLACEHOLDERS: &[&str] = &["Struct", "Recv", "Message", "Accessor", "Body"];

/// Placeholders available to field sections
const FIELD_PLACEHOLDERS: &[&str] = &[
    "Struct", "Recv", "Message", "Accessor", "Field", "Name", "Param", "Type", "Elem", "Pkg",
    "Base", "Wire",
];

const SECTION_MARKER: &str = "@@";
const FUNCTION_SECTION: &str = "function";

/// One generation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pass {
    Getter = 0,
    Setter = 1,
    ToWire = 2,
    FromWire = 3,
    Checksum = 4,
}

impl Pass {
    /// All passes in emission order
    pub const ALL: [Pass; 5] = [
        Pass::Getter,
        Pass::Setter,
        Pass::ToWire,
        Pass::FromWire,
        Pass::Checksum,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Pass::Getter => "getter",
            Pass::Setter => "setter",
            Pass::ToWire => "to-wire",
            Pass::FromWire => "from-wire",
            Pass::Checksum => "checksum",
        }
    }

    /// Template file name, used for directory overrides
    pub fn file_name(self) -> &'static str {
        match self {
            Pass::Getter => "getter.tmpl",
            Pass::Setter => "setter.tmpl",
            Pass::ToWire => "to_wire.tmpl",
            Pass::FromWire => "from_wire.tmpl",
            Pass::Checksum => "checksum.tmpl",
        }
    }

    /// Text placed between two consecutive field snippets
    pub fn separator(self) -> &'static str {
        match self {
            Pass::Getter | Pass::Setter => "\n",
            Pass::ToWire | Pass::FromWire | Pass::Checksum => "",
        }
    }

    fn builtin_source(self) -> &'static str {
        match self {
            Pass::Getter => include_str!("../templates/getter.tmpl"),
            Pass::Setter => include_str!("../templates/setter.tmpl"),
            Pass::ToWire => include_str!("../templates/to_wire.tmpl"),
            Pass::FromWire => include_str!("../templates/from_wire.tmpl"),
            Pass::Checksum => include_str!("../templates/checksum.tmpl"),
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Template kind of a field type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Bool,
    Amount,
    Entity,
    Key,
    Duration,
    Text,
    /// Entity identifier carrying a checksum; only used by the checksum pass
    Id,
}

impl Kind {
    const ALL: [Kind; 7] = [
        Kind::Bool,
        Kind::Amount,
        Kind::Entity,
        Kind::Key,
        Kind::Duration,
        Kind::Text,
        Kind::Id,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Amount => "amount",
            Kind::Entity => "entity",
            Kind::Key => "key",
            Kind::Duration => "duration",
            Kind::Text => "text",
            Kind::Id => "id",
        }
    }

    /// Wire kind of a base type name
    ///
    /// Never returns [`Kind::Id`]; identifiers are selected by the checksum
    /// pass on their own rule.
    pub fn classify(base_name: &str) -> Option<Kind> {
        let kind = match base_name {
            "bool" => Kind::Bool,
            "Hbar" => Kind::Amount,
            "AccountID" | "ContractID" | "FileID" | "TokenID" | "TopicID" | "ScheduleID" => {
                Kind::Entity
            }
            "Key" => Kind::Key,
            "Duration" => Kind::Duration,
            "string" => Kind::Text,
            _ => return None,
        };
        Some(kind)
    }
}

/// Field form selecting between template variants of one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Form {
    Value,
    Pointer,
    Slice,
    /// Slice flagged `singular`: element-wise accessors
    Singular,
}

impl Form {
    fn prefix(self) -> &'static str {
        match self {
            Form::Value => "",
            Form::Pointer => "*",
            Form::Slice => "[]",
            Form::Singular => "+",
        }
    }
}

/// Section key inside one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Selector {
    pub kind: Kind,
    pub form: Form,
}

impl Selector {
    pub fn new(kind: Kind, form: Form) -> Self {
        Self { kind, form }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.form.prefix(), self.kind.name())
    }
}

impl FromStr for Selector {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (form, kind) = if let Some(rest) = s.strip_prefix("[]") {
            (Form::Slice, rest)
        } else if let Some(rest) = s.strip_prefix('*') {
            (Form::Pointer, rest)
        } else if let Some(rest) = s.strip_prefix('+') {
            (Form::Singular, rest)
        } else {
            (Form::Value, s)
        };

        Kind::ALL
            .into_iter()
            .find(|k| k.name() == kind)
            .map(|kind| Selector { kind, form })
            .ok_or(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Placeholder(String),
}

/// Static text with named placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    lines: Vec<Vec<Segment>>,
}

impl Template {
    /// Parse numbered lines, accepting only the `allowed` placeholders
    fn parse(lines: &[(usize, &str)], allowed: &[&str]) -> Result<Self, (usize, String)> {
        let lines = lines
            .iter()
            .map(|(number, line)| parse_line(line, allowed).map_err(|msg| (*number, msg)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { lines })
    }

    /// Substitute placeholders; missing values render empty
    pub fn render(&self, values: &BTreeMap<&str, String>) -> String {
        let lookup = |name: &str| values.get(name).map_or("", String::as_str);
        let mut out = String::new();

        for line in &self.lines {
            if let [Segment::Placeholder(name)] = line.as_slice() {
                let value = lookup(name);
                let value = value.strip_suffix('\n').unwrap_or(value);
                if value.is_empty() {
                    continue;
                }
                out.push_str(value);
            } else {
                for segment in line {
                    match segment {
                        Segment::Text(text) => out.push_str(text),
                        Segment::Placeholder(name) => out.push_str(lookup(name)),
                    }
                }
            }
            out.push('\n');
        }

        out
    }
}

fn parse_line(line: &str, allowed: &[&str]) -> Result<Vec<Segment>, String> {
    let mut segments = Vec::new();
    let mut rest = line;

    while let Some(start) = rest.find("{{") {
        if start > 0 {
            segments.push(Segment::Text(rest[..start].to_string()));
        }
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or_else(|| "unclosed placeholder".to_string())?;
        let name = &after[..end];
        if !allowed.contains(&name) {
            return Err(format!("unknown placeholder `{{{{{name}}}}}`"));
        }
        segments.push(Segment::Placeholder(name.to_string()));
        rest = &after[end + 2..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Text(rest.to_string()));
    }
    Ok(segments)
}

/// Header target of one section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Function,
    Field(Selector),
}

struct RawSection<'a> {
    header_line: usize,
    targets: Vec<Target>,
    body: Vec<(usize, &'a str)>,
}

/// The templates of one pass
#[derive(Debug, Clone)]
pub struct PassTemplates {
    function: Template,
    fields: BTreeMap<Selector, Template>,
}

impl PassTemplates {
    /// Parse one template file
    pub fn parse(pass: Pass, source: &str) -> CodegenResult<Self> {
        let error = |line: usize, message: String| CodegenError::TemplateSyntax {
            pass: pass.name().to_string(),
            line,
            message,
        };

        let mut sections: Vec<RawSection<'_>> = Vec::new();
        for (index, line) in source.lines().enumerate() {
            let number = index + 1;

            if let Some(header) = line.strip_prefix(SECTION_MARKER) {
                let targets = header
                    .split_whitespace()
                    .map(|token| match token {
                        FUNCTION_SECTION => Ok(Target::Function),
                        _ => token
                            .parse::<Selector>()
                            .map(Target::Field)
                            .map_err(|()| error(number, format!("unknown selector `{token}`"))),
                    })
                    .collect::<CodegenResult<Vec<_>>>()?;
                if targets.is_empty() {
                    return Err(error(number, "section header names no selector".into()));
                }
                if targets.len() > 1 && targets.contains(&Target::Function) {
                    return Err(error(
                        number,
                        "`function` cannot share a section with field selectors".into(),
                    ));
                }
                sections.push(RawSection {
                    header_line: number,
                    targets,
                    body: Vec::new(),
                });
            } else if let Some(section) = sections.last_mut() {
                section.body.push((number, line));
            } else if !(line.trim().is_empty() || line.trim_start().starts_with('#')) {
                return Err(error(number, "text outside of a section".into()));
            }
        }

        let mut function = None;
        let mut fields = BTreeMap::new();

        for section in sections {
            let body = trim_blank_lines(&section.body);
            let allowed = if section.targets == [Target::Function] {
                FUNCTION_PLACEHOLDERS
            } else {
                FIELD_PLACEHOLDERS
            };
            let template =
                Template::parse(body, allowed).map_err(|(line, msg)| error(line, msg))?;

            for target in section.targets {
                match target {
                    Target::Function => {
                        if function.replace(template.clone()).is_some() {
                            return Err(error(
                                section.header_line,
                                "duplicate `function` section".into(),
                            ));
                        }
                    }
                    Target::Field(selector) => {
                        if fields.insert(selector, template.clone()).is_some() {
                            return Err(error(
                                section.header_line,
                                format!("duplicate selector `{selector}`"),
                            ));
                        }
                    }
                }
            }
        }

        let function = function.ok_or_else(|| {
            error(
                source.lines().count(),
                format!("missing `{SECTION_MARKER} {FUNCTION_SECTION}` section"),
            )
        })?;

        Ok(Self { function, fields })
    }

    pub fn function(&self) -> &Template {
        &self.function
    }

    pub fn field(&self, selector: Selector) -> Option<&Template> {
        self.fields.get(&selector)
    }
}

fn trim_blank_lines<'s, 'a>(lines: &'s [(usize, &'a str)]) -> &'s [(usize, &'a str)] {
    let is_blank = |(_, line): &(usize, &str)| line.trim().is_empty();
    let start = lines.iter().position(|l| !is_blank(l)).unwrap_or(lines.len());
    let end = lines.iter().rposition(|l| !is_blank(l)).map_or(start, |i| i + 1);
    &lines[start..end]
}

/// Templates of all five passes, loaded once per run
#[derive(Debug, Clone)]
pub struct TemplateSet {
    passes: Vec<PassTemplates>,
}

impl TemplateSet {
    /// Templates compiled into the binary
    pub fn builtin() -> CodegenResult<Self> {
        let passes = Pass::ALL
            .into_iter()
            .map(|pass| PassTemplates::parse(pass, pass.builtin_source()))
            .collect::<CodegenResult<Vec<_>>>()?;
        Ok(Self { passes })
    }

    /// Templates from `dir`, falling back to the built-in file of every pass
    /// the directory does not provide
    pub fn from_dir(dir: &Path) -> CodegenResult<Self> {
        if !dir.is_dir() {
            return Err(CodegenError::Config(format!(
                "templates_dir {} is not a directory",
                dir.display()
            )));
        }

        let mut passes = Vec::with_capacity(Pass::ALL.len());
        for pass in Pass::ALL {
            let path = dir.join(pass.file_name());
            let templates = if path.is_file() {
                tracing::debug!(pass = %pass, path = %path.display(), "loading template override");
                let source = std::fs::read_to_string(&path).map_err(|e| {
                    CodegenError::io(format!("failed to read {}", path.display()), e)
                })?;
                PassTemplates::parse(pass, &source)?
            } else {
                PassTemplates::parse(pass, pass.builtin_source())?
            };
            passes.push(templates);
        }

        Ok(Self { passes })
    }

    /// Built-in templates, or the overrides in `dir` when one is configured
    pub fn load(dir: Option<&Path>) -> CodegenResult<Self> {
        match dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::builtin(),
        }
    }

    pub fn pass(&self, pass: Pass) -> &PassTemplates {
        &self.passes[pass as usize]
    }
}
