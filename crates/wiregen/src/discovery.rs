//! Candidate discovery and documentation annotations.
//!
//! Candidates are struct declarations whose name ends in a role suffix
//! (`...Transaction`, `...Query`). A candidate is accepted only if its doc
//! comment names its wire message and accessor exactly once each:
//!
//! ```text
//! // TopicCreateTransaction creates a topic.
//! //
//! // wire-message: ConsensusCreateTopicTransactionBody
//! // wire-accessor: GetConsensusCreateTopic
//! type TopicCreateTransaction struct { ... }
//! ```

use crate::config::{AnnotationConfig, DiscoveryConfig};
use crate::error::{CodegenError, CodegenResult};
use crate::model::WireBinding;
use crate::syntax::{SourceFile, StructDecl};
use regex::Regex;
use std::collections::BTreeMap;

/// A struct declaration together with the file it was found in
#[derive(Debug, Clone, Copy)]
pub struct Declaration<'a> {
    pub file: &'a SourceFile,
    pub decl: &'a StructDecl,
}

/// Struct declarations of one package, by type name
#[derive(Debug, Default)]
pub struct DocIndex<'a> {
    entries: BTreeMap<&'a str, Declaration<'a>>,
}

impl<'a> DocIndex<'a> {
    /// Index every struct declaration; the first declaration of a name wins
    pub fn build(files: &'a [SourceFile]) -> Self {
        let mut entries = BTreeMap::new();

        for file in files {
            for decl in &file.structs {
                if entries.contains_key(decl.name.as_str()) {
                    tracing::warn!(
                        type_name = %decl.name,
                        file = %file.path.display(),
                        "duplicate type declaration ignored"
                    );
                    continue;
                }
                entries.insert(decl.name.as_str(), Declaration { file, decl });
            }
        }

        Self { entries }
    }

    /// Find a declaration by name
    ///
    /// A name that is not indexed means the sources and the requested type
    /// list disagree; that is never recoverable.
    pub fn lookup(&self, type_name: &str) -> CodegenResult<Declaration<'a>> {
        self.entries
            .get(type_name)
            .copied()
            .ok_or_else(|| CodegenError::ConfigurationDrift {
                type_name: type_name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Selects candidate types by role suffix
#[derive(Debug, Clone)]
pub struct TypeDiscovery {
    role_suffixes: Vec<String>,
    min_prefix_len: usize,
}

impl TypeDiscovery {
    pub fn new(config: &DiscoveryConfig) -> Self {
        Self {
            role_suffixes: config.role_suffixes.clone(),
            min_prefix_len: config.min_prefix_len,
        }
    }

    /// Whether `name` ends in a role suffix with enough in front of it
    pub fn is_candidate(&self, name: &str) -> bool {
        self.role_suffixes.iter().any(|suffix| {
            name.strip_suffix(suffix.as_str())
                .is_some_and(|prefix| prefix.chars().count() >= self.min_prefix_len)
        })
    }

    /// Candidate type names in file order, then declaration order
    pub fn candidates<'a>(&self, files: &'a [SourceFile]) -> Vec<&'a str> {
        files
            .iter()
            .flat_map(|file| &file.structs)
            .map(|decl| decl.name.as_str())
            .filter(|name| self.is_candidate(name))
            .collect()
    }
}

/// One single-line annotation pattern
#[derive(Debug, Clone)]
struct Annotation {
    prefix: String,
    pattern: Regex,
}

impl Annotation {
    fn new(prefix: &str) -> Self {
        let prefix = prefix.trim();
        let source = format!(r"(?m)^[ \t]*{}[ \t]*(\S+)", regex::escape(prefix));
        #[allow(clippy::expect_used)] // Safe: the prefix is escaped, the pattern is fixed
        let pattern = Regex::new(&source).expect("escaped annotation pattern is valid");
        Self {
            prefix: prefix.to_string(),
            pattern,
        }
    }

    /// The single value in `doc`, or an error carrying the match count
    fn extract(&self, type_name: &str, doc: &str) -> CodegenResult<String> {
        let values: Vec<&str> = self
            .pattern
            .captures_iter(doc)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .collect();

        match values.as_slice() {
            [value] => Ok((*value).to_string()),
            _ => Err(CodegenError::AnnotationError {
                type_name: type_name.to_string(),
                annotation: self.prefix.clone(),
                found: values.len(),
            }),
        }
    }
}

/// Mines wire bindings from doc comments
#[derive(Debug, Clone)]
pub struct DocumentationResolver {
    message: Annotation,
    accessor: Annotation,
}

impl DocumentationResolver {
    pub fn new(config: &AnnotationConfig) -> Self {
        Self {
            message: Annotation::new(&config.message_prefix),
            accessor: Annotation::new(&config.accessor_prefix),
        }
    }

    /// Extract the wire binding of one type
    ///
    /// Fails with [`CodegenError::AnnotationError`] when either annotation
    /// is missing or repeated.
    pub fn resolve(&self, type_name: &str, doc: &str) -> CodegenResult<WireBinding> {
        Ok(WireBinding {
            message: self.message.extract(type_name, doc)?,
            accessor: self.accessor.extract(type_name, doc)?,
        })
    }
}
