//! Entry points: parse, build, read.

use crate::build::Builder;
use crate::diagnostics::Diagnostics;
use crate::expr::{Expressions, Handler};
use crate::parser::parse_tree;
use crate::syntax::SyntaxTree;
use datalisp_model::Container;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("syntax error: {0}")]
    Syntax(Diagnostics),

    #[error("build error: {0}")]
    Build(Diagnostics),
}

impl ReadError {
    pub fn diagnostics(&self) -> &Diagnostics {
        match self {
            ReadError::Syntax(diagnostics) | ReadError::Build(diagnostics) => diagnostics,
        }
    }
}

/// Result of [`parse`]: always a tree, possibly with errors.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub tree: SyntaxTree,
    pub diagnostics: Diagnostics,
}

/// Reader configuration: the expressions available at build time.
#[derive(Debug, Clone)]
pub struct Reader {
    expressions: Expressions,
}

impl Default for Reader {
    fn default() -> Self {
        Self::new()
    }
}

impl Reader {
    /// A reader with the standard expressions.
    pub fn new() -> Self {
        Self::with_expressions(Expressions::standard())
    }

    /// A reader with no expressions; every `$(...)` is unknown.
    pub fn bare() -> Self {
        Self::with_expressions(Expressions::new())
    }

    pub fn with_expressions(expressions: Expressions) -> Self {
        Self { expressions }
    }

    pub fn expression(mut self, name: impl Into<String>, handler: Handler) -> Self {
        self.expressions.register(name, handler);
        self
    }

    pub fn expressions(&self) -> &Expressions {
        &self.expressions
    }

    pub fn parse(&self, text: &str) -> Parsed {
        let (tree, diagnostics) = parse_tree(text);
        tracing::debug!(
            statements = tree.statements.len(),
            errors = diagnostics.error_count(),
            "parsed"
        );
        Parsed { tree, diagnostics }
    }

    /// Evaluate expressions and append the tree's groups to `container`.
    pub fn build(&self, tree: &SyntaxTree, container: &mut Container) -> Diagnostics {
        Builder::new(&self.expressions).run(tree, container)
    }

    /// Parse and build. Any error diagnostic fails the read; warnings and
    /// info messages are forwarded to `tracing`.
    pub fn read(&self, text: &str) -> Result<Container, ReadError> {
        let parsed = self.parse(text);
        if parsed.diagnostics.has_errors() {
            return Err(ReadError::Syntax(parsed.diagnostics));
        }
        parsed.diagnostics.emit();

        let mut container = Container::new();
        let diagnostics = self.build(&parsed.tree, &mut container);
        if diagnostics.has_errors() {
            return Err(ReadError::Build(diagnostics));
        }
        diagnostics.emit();
        Ok(container)
    }
}

/// Parse DataLisp source without evaluating it.
pub fn parse(text: &str) -> Parsed {
    Reader::new().parse(text)
}

/// Build a parsed tree with the standard expressions.
pub fn build(tree: &SyntaxTree, container: &mut Container) -> Diagnostics {
    Reader::new().build(tree, container)
}

/// Parse and build DataLisp source with the standard expressions.
pub fn read(text: &str) -> Result<Container, ReadError> {
    Reader::new().read(text)
}
