//! Field tag grammar.
//!
//! ```text
//! tag     := ... key ':' '"' options '"' ...
//! options := option (',' option)*
//! option  := "getter" | "setter" | "singular" | "toWire" | "fromWire"
//!          | "wireName" '=' value
//!          | <anything else, ignored>
//! ```
//!
//! Only the `key:"..."` pair is inspected; other pairs in the same tag
//! (`json:"memo"`) are left alone.

use regex::Regex;

/// Option that takes a value
const WIRE_NAME: &str = "wireName";

/// Per-field generation switches, derived from the field tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldConfig {
    pub getter: bool,
    pub setter: bool,
    pub singular: bool,
    pub to_wire: bool,
    pub from_wire: bool,

    /// Wire field name replacing the default derived from the field name
    pub wire_name: Option<String>,
}

impl FieldConfig {
    /// Whether any pass other than checksum validation will touch the field
    pub fn is_empty(&self) -> bool {
        !(self.getter || self.setter || self.to_wire || self.from_wire)
    }
}

/// A `key=value` option without its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedOption(pub String);

/// Parses field tags for one configured tag key
#[derive(Debug, Clone)]
pub struct TagParser {
    pattern: Regex,
}

impl TagParser {
    /// Build a parser for `key:"..."` pairs
    pub fn new(key: &str) -> Self {
        let source = format!(r#"(?:^|\s){}:"([^"]*)""#, regex::escape(key));
        #[allow(clippy::expect_used)] // Safe: the key is escaped, the pattern is fixed
        let pattern = Regex::new(&source).expect("escaped tag pattern is valid");
        Self { pattern }
    }

    /// Parse a raw tag into a field configuration
    ///
    /// An absent tag, or a tag without the key, yields the all-false config.
    pub fn parse(&self, tag: Option<&str>) -> Result<FieldConfig, MalformedOption> {
        let mut config = FieldConfig::default();

        let Some(options) = tag
            .and_then(|tag| self.pattern.captures(tag))
            .and_then(|caps| caps.get(1))
        else {
            return Ok(config);
        };

        for option in options.as_str().split(',').map(str::trim) {
            match option.split_once('=') {
                Some((key, value)) if key.trim() == WIRE_NAME => {
                    let value = value.trim();
                    if value.is_empty() {
                        return Err(MalformedOption(option.to_string()));
                    }
                    config.wire_name = Some(value.to_string());
                }
                Some(_) => tracing::warn!(option, "ignoring unrecognized tag option"),
                None => match option {
                    "getter" => config.getter = true,
                    "setter" => config.setter = true,
                    "singular" => config.singular = true,
                    "toWire" => config.to_wire = true,
                    "fromWire" => config.from_wire = true,
                    WIRE_NAME => return Err(MalformedOption(option.to_string())),
                    "" => {}
                    other => tracing::warn!(option = other, "ignoring unrecognized tag option"),
                },
            }
        }

        Ok(config)
    }
}
