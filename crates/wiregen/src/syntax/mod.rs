//! Go source reading.
//!
//! ```text
//! source text
//!     ↓
//!  [lexer]   tokens with line numbers, comments kept
//!     ↓
//!  [parser]  package clause + struct declarations
//!     ↓
//! SourceFile
//! ```
//!
//! The parser stops at declaration level. Field types are recorded as
//! [`TypeExpr`] trees whatever their shape; deciding which shapes are
//! acceptable is the field model's job, not the parser's.

mod ast;
mod lexer;
mod parser;

pub use ast::{FieldDecl, SourceFile, StructDecl, TypeExpr};
pub use parser::{parse_file, parse_source};
