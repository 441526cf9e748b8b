//! Declaration-level syntax tree for Go source files.

use std::fmt;
use std::path::PathBuf;

/// One parsed source file
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    /// Path the file was read from
    pub path: PathBuf,

    /// Name from the package clause
    pub package: String,

    /// Struct type declarations, in source order
    pub structs: Vec<StructDecl>,
}

/// A `type Name struct { ... }` declaration
#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub name: String,

    /// Doc comment text, one line per comment line
    pub doc: String,

    pub fields: Vec<FieldDecl>,

    /// Line of the type name
    pub line: usize,
}

/// A field line inside a struct body
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    /// Declared names; empty for an embedded field
    pub names: Vec<String>,

    pub ty: TypeExpr,

    /// Tag literal contents, without quotes
    pub tag: Option<String>,

    pub line: usize,
}

impl FieldDecl {
    /// Whether this is an embedded (anonymous) field
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

/// A type expression as written in the source
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// `T` or `pkg.T`
    Named {
        qualifier: Option<String>,
        name: String,
    },

    /// `*T`
    Pointer(Box<TypeExpr>),

    /// `[]T`
    Slice(Box<TypeExpr>),

    /// `[N]T`
    Array { len: String, elem: Box<TypeExpr> },

    /// `map[K]V`
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },

    /// `chan T`, in any direction
    Chan(Box<TypeExpr>),

    /// `func(...) ...`
    Func,

    /// Anonymous `struct { ... }`
    Struct,

    /// `interface { ... }`
    Interface,

    /// `T[A, B]`
    Generic {
        base: Box<TypeExpr>,
        args: Vec<TypeExpr>,
    },
}

impl TypeExpr {
    /// Bare named type
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named {
            qualifier: None,
            name: name.into(),
        }
    }

    /// Package-qualified named type
    pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        TypeExpr::Named {
            qualifier: Some(qualifier.into()),
            name: name.into(),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named {
                qualifier: Some(q),
                name,
            } => write!(f, "{q}.{name}"),
            TypeExpr::Named {
                qualifier: None,
                name,
            } => write!(f, "{name}"),
            TypeExpr::Pointer(elem) => write!(f, "*{elem}"),
            TypeExpr::Slice(elem) => write!(f, "[]{elem}"),
            TypeExpr::Array { len, elem } => write!(f, "[{len}]{elem}"),
            TypeExpr::Map { key, value } => write!(f, "map[{key}]{value}"),
            TypeExpr::Chan(elem) => write!(f, "chan {elem}"),
            TypeExpr::Func => write!(f, "func(...)"),
            TypeExpr::Struct => write!(f, "struct{{...}}"),
            TypeExpr::Interface => write!(f, "interface{{...}}"),
            TypeExpr::Generic { base, args } => {
                write!(f, "{base}[")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, "]")
            }
        }
    }
}
