//! Generation units and their fields.
//!
//! A [`GenerationUnit`] is one accepted struct: its fields with normalized
//! types and parsed tags, plus the wire message it converts to. Field types
//! are reduced from arbitrary [`TypeExpr`] trees to a [`FieldTypeDescriptor`]
//! through a closed set of shapes:
//!
//! | Source | Descriptor |
//! |--------|------------|
//! | `T` | `{base: T}` |
//! | `*pkg.T` | `{pointer, qualifier: pkg, base: T}` |
//! | `pkg.T` | `{qualifier: pkg, base: T}` |
//! | `[]T` | `{array, base: T}` |
//!
//! Everything else, including `*T` without a package, is rejected.

use crate::error::{CodegenError, CodegenResult};
use crate::naming::{capitalize, singularize};
use crate::syntax::{SourceFile, StructDecl, TypeExpr};
use crate::tag::{FieldConfig, MalformedOption, TagParser};
use std::fmt;
use std::path::PathBuf;

/// Normalized field type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTypeDescriptor {
    pub is_pointer: bool,
    pub is_array: bool,

    /// Package qualifier, only for externally qualified types
    pub package_qualifier: Option<String>,

    /// Type name without qualifier, pointer or slice markers; never empty
    pub base_name: String,
}

impl fmt::Display for FieldTypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_pointer {
            write!(f, "*")?;
        }
        if self.is_array {
            write!(f, "[]")?;
        }
        if let Some(qualifier) = &self.package_qualifier {
            write!(f, "{qualifier}.")?;
        }
        write!(f, "{}", self.base_name)
    }
}

/// The accepted field shapes
enum Shape<'a> {
    Bare(&'a str),
    PointerToQualified { qualifier: &'a str, name: &'a str },
    Qualified { qualifier: &'a str, name: &'a str },
    SliceOfBare(&'a str),
    Unsupported,
}

impl<'a> Shape<'a> {
    fn classify(expr: &'a TypeExpr) -> Self {
        match expr {
            TypeExpr::Named {
                qualifier: None,
                name,
            } => Shape::Bare(name),
            TypeExpr::Named {
                qualifier: Some(qualifier),
                name,
            } => Shape::Qualified { qualifier, name },
            TypeExpr::Pointer(inner) => match inner.as_ref() {
                TypeExpr::Named {
                    qualifier: Some(qualifier),
                    name,
                } => Shape::PointerToQualified { qualifier, name },
                _ => Shape::Unsupported,
            },
            TypeExpr::Slice(inner) => match inner.as_ref() {
                TypeExpr::Named {
                    qualifier: None,
                    name,
                } => Shape::SliceOfBare(name),
                _ => Shape::Unsupported,
            },
            _ => Shape::Unsupported,
        }
    }
}

impl FieldTypeDescriptor {
    /// Normalize a type expression, or `None` for an unsupported shape
    pub fn resolve(expr: &TypeExpr) -> Option<Self> {
        let descriptor = match Shape::classify(expr) {
            Shape::Bare(name) => Self {
                is_pointer: false,
                is_array: false,
                package_qualifier: None,
                base_name: name.to_string(),
            },
            Shape::PointerToQualified { qualifier, name } => Self {
                is_pointer: true,
                is_array: false,
                package_qualifier: Some(qualifier.to_string()),
                base_name: name.to_string(),
            },
            Shape::Qualified { qualifier, name } => Self {
                is_pointer: false,
                is_array: false,
                package_qualifier: Some(qualifier.to_string()),
                base_name: name.to_string(),
            },
            Shape::SliceOfBare(name) => Self {
                is_pointer: false,
                is_array: true,
                package_qualifier: None,
                base_name: name.to_string(),
            },
            Shape::Unsupported => return None,
        };
        Some(descriptor)
    }
}

/// A field of a generation unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: FieldTypeDescriptor,
    pub config: FieldConfig,
}

impl Field {
    /// Accessor base name, singularized when the field is flagged `singular`
    pub fn effective_name(&self) -> &str {
        if self.config.singular {
            singularize(&self.name)
        } else {
            &self.name
        }
    }

    /// Element type name, singularized when the field is flagged `singular`
    pub fn effective_base(&self) -> &str {
        if self.config.singular {
            singularize(&self.ty.base_name)
        } else {
            &self.ty.base_name
        }
    }

    /// Name of the corresponding field on the wire message
    pub fn wire_field(&self) -> String {
        self.config
            .wire_name
            .clone()
            .unwrap_or_else(|| capitalize(&self.name))
    }
}

/// Wire message binding mined from a type's documentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireBinding {
    /// Wire message type, e.g. `CryptoCreateTransactionBody`
    pub message: String,

    /// Accessor returning that message from its envelope
    pub accessor: String,
}

/// One struct driving one generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationUnit {
    pub name: String,
    pub source_file: PathBuf,
    pub package: String,
    pub fields: Vec<Field>,
    pub wire: WireBinding,
}

/// Builds generation units from parsed declarations
#[derive(Debug, Clone)]
pub struct FieldModel {
    tags: TagParser,
}

impl FieldModel {
    pub fn new(tag_key: &str) -> Self {
        Self {
            tags: TagParser::new(tag_key),
        }
    }

    /// Resolve every named field of `decl`
    ///
    /// Embedded fields are skipped. Names declared together share one type
    /// and tag.
    pub fn build_unit(
        &self,
        file: &SourceFile,
        decl: &StructDecl,
        wire: WireBinding,
    ) -> CodegenResult<GenerationUnit> {
        let mut fields = Vec::new();

        for field_decl in decl.fields.iter().filter(|f| !f.is_embedded()) {
            let field_label = field_decl.names.join(", ");

            let ty = FieldTypeDescriptor::resolve(&field_decl.ty).ok_or_else(|| {
                CodegenError::UnsupportedShape {
                    type_name: decl.name.clone(),
                    field: field_label.clone(),
                    shape: field_decl.ty.to_string(),
                }
            })?;

            let config = self
                .tags
                .parse(field_decl.tag.as_deref())
                .map_err(|MalformedOption(option)| CodegenError::MalformedOption {
                    type_name: decl.name.clone(),
                    field: field_label.clone(),
                    option,
                })?;

            for name in &field_decl.names {
                fields.push(Field {
                    name: name.clone(),
                    ty: ty.clone(),
                    config: config.clone(),
                });
            }
        }

        Ok(GenerationUnit {
            name: decl.name.clone(),
            source_file: file.path.clone(),
            package: file.package.clone(),
            fields,
            wire,
        })
    }
}
