//! DataLisp text reader.
//!
//! Reads DataLisp source into a [`datalisp_model::Container`] in two steps:
//! [`parse`] produces a [`SyntaxTree`] plus [`Diagnostics`], and [`build`]
//! evaluates expressions and inserts the resulting groups. [`read`] runs
//! both and fails on the first step that reports an error.

mod build;
mod diagnostics;
mod expr;
mod lexer;
mod parser;
mod reader;
mod syntax;

pub use diagnostics::{Diagnostic, Diagnostics, Level, Position};
pub use expr::{Expressions, Handler, Scope};
pub use parser::MAX_DEPTH;
pub use reader::{build, parse, read, Parsed, ReadError, Reader};
pub use syntax::{DataNode, Expression, Statement, SyntaxTree, ValueNode};
