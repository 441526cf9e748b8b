//! wiregen - accessor and wire-conversion code generator for Go SDK types
//!
//! This crate reads a directory of Go sources, picks the request types whose
//! documentation names a wire message, and writes one `_generated.go` file
//! per type:
//! - [`syntax`] reads package clauses and struct declarations
//! - [`TypeDiscovery`] and [`DocumentationResolver`] select the types
//! - [`FieldModel`] normalizes field shapes and parses field tags
//! - [`TemplateDispatcher`] runs the getter, setter, to-wire, from-wire and
//!   checksum passes
//! - [`ImportResolver`] and [`FileEmitter`] assemble the output file
//! - [`Generator`] drives the whole run
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use wiregen::{Config, Generator};
//!
//! let dir = Path::new("sdk/transactions");
//! let generator = Generator::new(Config::discover(dir)?)?;
//! for (file, outcome) in generator.generate(dir, &[])? {
//!     println!("{} {:?}", file.path.display(), outcome);
//! }
//! # Ok::<(), wiregen::CodegenError>(())
//! ```

mod config;
mod discovery;
mod dispatch;
mod emit;
mod error;
mod imports;
mod model;
mod pipeline;
mod tag;
mod templates;

pub mod naming;
pub mod syntax;

pub use config::{AnnotationConfig, CONFIG_FILE_NAME, Config, DiscoveryConfig, ImportConfig};
pub use discovery::{Declaration, DocIndex, DocumentationResolver, TypeDiscovery};
pub use dispatch::{PassOutput, TemplateDispatcher};
pub use emit::{FileEmitter, GENERATED_HEADER, PlannedFile, output_path, render_file};
pub use error::{CodegenError, CodegenResult};
pub use imports::ImportResolver;
pub use model::{Field, FieldModel, FieldTypeDescriptor, GenerationUnit, WireBinding};
pub use pipeline::{Generator, StaleFile, Staleness, WriteOutcome, write_file};
pub use tag::{FieldConfig, MalformedOption, TagParser};
pub use templates::{Form, Kind, Pass, PassTemplates, Selector, Template, TemplateSet};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{CodegenError, CodegenResult, Config, Generator, PlannedFile, WriteOutcome};
}
