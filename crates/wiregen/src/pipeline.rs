//! End-to-end generation over one source directory.
//!
//! A run has two phases. Planning parses every source file, selects the
//! types, and renders all output files in memory; any error aborts before a
//! single file is touched. Writing then replaces each output file through a
//! temporary file in the same directory.

use crate::config::Config;
use crate::discovery::{DocIndex, DocumentationResolver, TypeDiscovery};
use crate::dispatch::TemplateDispatcher;
use crate::emit::{FileEmitter, PlannedFile};
use crate::error::{CodegenError, CodegenResult};
use crate::imports::ImportResolver;
use crate::model::FieldModel;
use crate::syntax::{SourceFile, parse_file};
use crate::templates::TemplateSet;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::{Path, PathBuf};

const SOURCE_EXTENSION: &str = "go";
const TEST_FILE_SUFFIX: &str = "_test.go";

/// What happened to one planned file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// Existing file already had the planned contents
    Unchanged,
}

/// A generated file that does not match the sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staleness {
    Missing,
    Outdated,
}

/// Result of checking one planned file against the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleFile {
    pub type_name: String,
    pub path: PathBuf,
    pub staleness: Staleness,
}

/// The generator: configuration plus the templates loaded for it
#[derive(Debug, Clone)]
pub struct Generator {
    config: Config,
    templates: TemplateSet,
}

impl Generator {
    /// Create a generator, loading templates once
    pub fn new(config: Config) -> CodegenResult<Self> {
        let templates = TemplateSet::load(config.templates_dir.as_deref())?;
        Ok(Self { config, templates })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse the source files of `dir` in sorted order
    ///
    /// Non-recursive. Test files and previously generated files are skipped.
    pub fn scan(&self, dir: &Path) -> CodegenResult<Vec<SourceFile>> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| CodegenError::io(format!("failed to read {}", dir.display()), e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| CodegenError::io(format!("failed to read {}", dir.display()), e))?;
            let path = entry.path();
            if path.is_file() && self.is_source(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        paths.iter().map(|path| parse_file(path)).collect()
    }

    fn is_source(&self, path: &Path) -> bool {
        if path.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXTENSION) {
            return false;
        }
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if name.ends_with(TEST_FILE_SUFFIX) {
            tracing::debug!(path = %path.display(), "skipping test file");
            return false;
        }
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        if stem.ends_with(&self.config.output_suffix) {
            tracing::debug!(path = %path.display(), "skipping generated file");
            return false;
        }
        true
    }

    /// Render every output file for `dir` in memory
    ///
    /// With an empty `requested` list, types are discovered by role suffix and
    /// candidates with missing or repeated annotations are dropped. Otherwise
    /// exactly the requested types are generated and every annotation problem
    /// is fatal.
    pub fn plan(&self, dir: &Path, requested: &[String]) -> CodegenResult<Vec<PlannedFile>> {
        let files = self.scan(dir)?;
        let index = DocIndex::build(&files);
        let resolver = DocumentationResolver::new(&self.config.annotations);
        let model = FieldModel::new(&self.config.tag_key);
        let emitter = FileEmitter::new(
            TemplateDispatcher::new(&self.templates),
            ImportResolver::new(&self.config.imports),
            &self.config.output_suffix,
        );

        tracing::debug!(
            dir = %dir.display(),
            files = files.len(),
            types = index.len(),
            "scanned sources"
        );

        let mut selected = Vec::new();
        if requested.is_empty() {
            let discovery = TypeDiscovery::new(&self.config.discovery);
            let mut seen = BTreeSet::new();
            for name in discovery.candidates(&files) {
                if !seen.insert(name) {
                    continue;
                }
                let declaration = index.lookup(name)?;
                match resolver.resolve(name, &declaration.decl.doc) {
                    Ok(wire) => selected.push((declaration, wire)),
                    Err(e) => {
                        tracing::debug!(type_name = name, error = %e, "candidate dropped");
                    }
                }
            }
        } else {
            let mut seen = BTreeSet::new();
            for name in requested {
                if !seen.insert(name.as_str()) {
                    continue;
                }
                let declaration = index.lookup(name)?;
                let wire = resolver.resolve(name, &declaration.decl.doc)?;
                selected.push((declaration, wire));
            }
        }

        let mut planned: Vec<PlannedFile> = Vec::with_capacity(selected.len());
        let mut owners: BTreeMap<PathBuf, String> = BTreeMap::new();
        for (declaration, wire) in selected {
            let unit = model.build_unit(declaration.file, declaration.decl, wire)?;
            let file = emitter.emit(&unit)?;

            if let Some(first) = owners.get(&file.path) {
                return Err(CodegenError::OutputCollision {
                    first: first.clone(),
                    second: file.type_name,
                    path: file.path,
                });
            }
            owners.insert(file.path.clone(), file.type_name.clone());
            planned.push(file);
        }

        Ok(planned)
    }

    /// Plan and write every output file for `dir`
    pub fn generate(
        &self,
        dir: &Path,
        requested: &[String],
    ) -> CodegenResult<Vec<(PlannedFile, WriteOutcome)>> {
        let planned = self.plan(dir, requested)?;

        planned
            .into_iter()
            .map(|file| -> CodegenResult<_> {
                let outcome = write_file(&file)?;
                Ok((file, outcome))
            })
            .collect()
    }

    /// Plan every output file for `dir` and compare against the filesystem
    pub fn check(&self, dir: &Path, requested: &[String]) -> CodegenResult<Vec<StaleFile>> {
        let planned = self.plan(dir, requested)?;

        let mut stale = Vec::new();
        for file in planned {
            let staleness = match std::fs::read_to_string(&file.path) {
                Ok(existing) if existing == file.contents => continue,
                Ok(_) => Staleness::Outdated,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Staleness::Missing,
                Err(e) => {
                    return Err(CodegenError::io(
                        format!("failed to read {}", file.path.display()),
                        e,
                    ));
                }
            };
            stale.push(StaleFile {
                type_name: file.type_name,
                path: file.path,
                staleness,
            });
        }

        Ok(stale)
    }
}

/// Replace `file.path` with the planned contents
///
/// Writes through a temporary file in the target directory so a reader never
/// sees a partially written file.
pub fn write_file(file: &PlannedFile) -> CodegenResult<WriteOutcome> {
    if let Ok(existing) = std::fs::read_to_string(&file.path)
        && existing == file.contents
    {
        tracing::debug!(path = %file.path.display(), "unchanged");
        return Ok(WriteOutcome::Unchanged);
    }

    let dir = match file.path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let context = || format!("failed to write {}", file.path.display());

    let mut temp =
        tempfile::NamedTempFile::new_in(dir).map_err(|e| CodegenError::io(context(), e))?;
    temp.write_all(file.contents.as_bytes())
        .map_err(|e| CodegenError::io(context(), e))?;
    temp.persist(&file.path)
        .map_err(|e| CodegenError::io(context(), e.error))?;

    tracing::info!(
        type_name = %file.type_name,
        path = %file.path.display(),
        "generated"
    );
    Ok(WriteOutcome::Written)
}
