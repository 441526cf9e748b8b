//! Error types for wiregen

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for generator operations
pub type CodegenResult<T> = Result<T, CodegenError>;

/// Error type for generator operations
///
/// Every variant is a configuration or programmer error. None of them is
/// retried; the run aborts on the first one.
#[derive(Error, Debug)]
pub enum CodegenError {
    /// A requested type is absent from the documentation index
    #[error("type {type_name} is not declared in the scanned sources")]
    ConfigurationDrift { type_name: String },

    /// A required documentation annotation is missing or repeated
    #[error("type {type_name}: expected exactly one `{annotation}` annotation, found {found}")]
    AnnotationError {
        type_name: String,
        annotation: String,
        found: usize,
    },

    /// Field shape outside the supported grammar
    #[error("type {type_name}, field {field}: unsupported field shape `{shape}`")]
    UnsupportedShape {
        type_name: String,
        field: String,
        shape: String,
    },

    /// Flagged field whose type has no template in a pass
    #[error("type {type_name}, field {field}: no {pass} template for type `{ty}`")]
    UnknownWireType {
        type_name: String,
        field: String,
        pass: String,
        ty: String,
    },

    /// Tag option of the form `key=value` without a value
    #[error("type {type_name}, field {field}: option `{option}` requires a value")]
    MalformedOption {
        type_name: String,
        field: String,
        option: String,
    },

    /// Package qualifier not present in the import table
    #[error("type {type_name}: no import registered for package qualifier `{qualifier}`")]
    UnresolvableImport {
        type_name: String,
        qualifier: String,
    },

    /// Source file could not be parsed
    #[error("{}:{line}: {message}", path.display())]
    Syntax {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Template file could not be loaded
    #[error("{pass} templates, line {line}: {message}")]
    TemplateSyntax {
        pass: String,
        line: usize,
        message: String,
    },

    /// Two accepted types would be written to the same file
    #[error("types {first} and {second} both generate {}", path.display())]
    OutputCollision {
        first: String,
        second: String,
        path: PathBuf,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem error
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl CodegenError {
    /// Returns the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CodegenError::ConfigurationDrift { .. } => 10,
            CodegenError::AnnotationError { .. } => 11,
            CodegenError::UnsupportedShape { .. } => 12,
            CodegenError::UnknownWireType { .. } => 13,
            CodegenError::MalformedOption { .. } => 14,
            CodegenError::UnresolvableImport { .. } => 15,
            CodegenError::Syntax { .. } => 16,
            CodegenError::TemplateSyntax { .. } => 17,
            CodegenError::OutputCollision { .. } => 18,
            CodegenError::Config(_) => 2,
            CodegenError::Io { .. } => 3,
        }
    }

    /// Wrap an I/O error with a description of what was being attempted
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        CodegenError::Io {
            context: context.into(),
            source,
        }
    }
}

impl From<toml::de::Error> for CodegenError {
    fn from(err: toml::de::Error) -> Self {
        CodegenError::Config(err.to_string())
    }
}
