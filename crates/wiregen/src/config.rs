//! Generator configuration
//!
//! Loaded from an optional `wiregen.toml`. Every key has a default, so an
//! absent file and an empty file produce the same [`Config`].

use crate::error::{CodegenError, CodegenResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the input directory
pub const CONFIG_FILE_NAME: &str = "wiregen.toml";

/// Run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Struct tag key carrying the field options (`wire:"getter,setter"`)
    #[serde(default = "default_tag_key")]
    pub tag_key: String,

    /// Marker inserted between the source file stem and its extension
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,

    /// Directory holding replacement template files
    ///
    /// Relative paths are resolved against the directory of the config file.
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,

    #[serde(default)]
    pub discovery: DiscoveryConfig,

    #[serde(default)]
    pub annotations: AnnotationConfig,

    #[serde(default)]
    pub imports: ImportConfig,
}

/// Candidate selection by type name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Role suffixes a candidate type name must end with
    #[serde(default = "default_role_suffixes")]
    pub role_suffixes: Vec<String>,

    /// Characters required in front of the suffix
    #[serde(default = "default_min_prefix_len")]
    pub min_prefix_len: usize,
}

/// Documentation annotation prefixes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationConfig {
    #[serde(default = "default_message_prefix")]
    pub message_prefix: String,

    #[serde(default = "default_accessor_prefix")]
    pub accessor_prefix: String,
}

/// Package qualifier to import statement table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Qualifiers referenced by the function templates themselves
    #[serde(default = "default_always_imports")]
    pub always: Vec<String>,

    /// Import statement text keyed by package qualifier
    #[serde(default = "default_import_table")]
    pub table: BTreeMap<String, String>,
}

fn default_tag_key() -> String {
    "wire".to_string()
}

fn default_output_suffix() -> String {
    "_generated".to_string()
}

fn default_role_suffixes() -> Vec<String> {
    vec!["Transaction".to_string(), "Query".to_string()]
}

fn default_min_prefix_len() -> usize {
    1
}

fn default_message_prefix() -> String {
    "wire-message:".to_string()
}

fn default_accessor_prefix() -> String {
    "wire-accessor:".to_string()
}

fn default_always_imports() -> Vec<String> {
    vec!["sdk".to_string(), "services".to_string()]
}

fn default_import_table() -> BTreeMap<String, String> {
    [
        ("time", "\"time\""),
        ("sdk", "\"github.com/ledgerkit/ledger-sdk-go/v2/sdk\""),
        (
            "services",
            "\"github.com/ledgerkit/ledger-protobufs-go/services\"",
        ),
    ]
    .into_iter()
    .map(|(qualifier, import)| (qualifier.to_string(), import.to_string()))
    .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tag_key: default_tag_key(),
            output_suffix: default_output_suffix(),
            templates_dir: None,
            discovery: DiscoveryConfig::default(),
            annotations: AnnotationConfig::default(),
            imports: ImportConfig::default(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            role_suffixes: default_role_suffixes(),
            min_prefix_len: default_min_prefix_len(),
        }
    }
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            message_prefix: default_message_prefix(),
            accessor_prefix: default_accessor_prefix(),
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            always: default_always_imports(),
            table: default_import_table(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    ///
    /// A relative `templates_dir` is rebased onto the file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> CodegenResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| CodegenError::io(format!("failed to read {}", path.display()), e))?;

        let mut config = Self::from_str(&content)?;
        if let (Some(dir), Some(base)) = (config.templates_dir.as_ref(), path.parent())
            && dir.is_relative()
        {
            config.templates_dir = Some(base.join(dir));
        }
        Ok(config)
    }

    /// Load `wiregen.toml` from `dir` if present, defaults otherwise
    pub fn discover(dir: &Path) -> CodegenResult<Self> {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "loading configuration");
            Self::from_file(candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> CodegenResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> CodegenResult<()> {
        if self.tag_key.trim().is_empty() {
            return Err(CodegenError::Config("tag_key cannot be empty".into()));
        }

        if self.output_suffix.is_empty() {
            return Err(CodegenError::Config("output_suffix cannot be empty".into()));
        }

        if self.discovery.role_suffixes.is_empty() {
            return Err(CodegenError::Config(
                "discovery.role_suffixes needs at least one suffix".into(),
            ));
        }

        if self.discovery.role_suffixes.iter().any(|s| s.is_empty()) {
            return Err(CodegenError::Config(
                "discovery.role_suffixes cannot contain an empty suffix".into(),
            ));
        }

        let message = self.annotations.message_prefix.trim();
        let accessor = self.annotations.accessor_prefix.trim();
        if message.is_empty() || accessor.is_empty() {
            return Err(CodegenError::Config(
                "annotation prefixes cannot be empty".into(),
            ));
        }
        if message == accessor {
            return Err(CodegenError::Config(format!(
                "annotation prefixes must differ, both are `{message}`"
            )));
        }

        for qualifier in &self.imports.always {
            if !self.imports.table.contains_key(qualifier) {
                return Err(CodegenError::Config(format!(
                    "imports.always names `{qualifier}` which is missing from imports.table"
                )));
            }
        }

        Ok(())
    }
}
