//! Output file assembly.

use crate::dispatch::{PassOutput, TemplateDispatcher};
use crate::error::CodegenResult;
use crate::imports::ImportResolver;
use crate::model::GenerationUnit;
use std::path::{Path, PathBuf};

/// First line of every generated file
pub const GENERATED_HEADER: &str = "// Code generated by wiregen. DO NOT EDIT.";

/// A generated file held in memory until the whole run succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    /// Type the file was generated for
    pub type_name: String,
    pub path: PathBuf,
    pub contents: String,
}

/// Path of the file generated next to `source`
///
/// `<dir>/<stem><suffix>.<ext>`; the extension is kept as is.
pub fn output_path(source: &Path, suffix: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let name = match source.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    source.with_file_name(name)
}

/// Assembles one output file per generation unit
#[derive(Debug, Clone, Copy)]
pub struct FileEmitter<'a> {
    dispatcher: TemplateDispatcher<'a>,
    imports: ImportResolver<'a>,
    suffix: &'a str,
}

impl<'a> FileEmitter<'a> {
    pub fn new(
        dispatcher: TemplateDispatcher<'a>,
        imports: ImportResolver<'a>,
        suffix: &'a str,
    ) -> Self {
        Self {
            dispatcher,
            imports,
            suffix,
        }
    }

    /// Generate the file for `unit` without touching the filesystem
    pub fn emit(&self, unit: &GenerationUnit) -> CodegenResult<PlannedFile> {
        let outputs = self.dispatcher.run_all(unit)?;
        let imports = self.imports.resolve(unit)?;

        Ok(PlannedFile {
            type_name: unit.name.clone(),
            path: output_path(&unit.source_file, self.suffix),
            contents: render_file(&unit.package, &imports, &outputs),
        })
    }
}

/// Header, package clause, import block, then every non-empty pass output
pub fn render_file(package: &str, imports: &[String], outputs: &[PassOutput]) -> String {
    let mut out = String::new();
    out.push_str(GENERATED_HEADER);
    out.push_str("\n\n");
    out.push_str(&format!("package {package}\n"));

    if !imports.is_empty() {
        out.push_str("\nimport (\n");
        for import in imports {
            out.push('\t');
            out.push_str(import);
            out.push('\n');
        }
        out.push_str(")\n");
    }

    for output in outputs.iter().filter(|o| !o.text.is_empty()) {
        out.push('\n');
        out.push_str(&output.text);
    }

    out
}

#[cfg(test)]
#[path = "emit/emit_tests.rs"]
mod emit_tests;
