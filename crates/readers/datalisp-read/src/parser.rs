//! Recursive-descent parser producing a [`SyntaxTree`].
//!
//! The parser never stops early. Problems become error diagnostics and the
//! offending token is skipped or replaced by [`ValueNode::Invalid`].

use crate::diagnostics::{Diagnostics, Position};
use crate::lexer::{tokenize, Token, TokenKind};
use crate::syntax::{DataNode, Expression, Statement, SyntaxTree, ValueNode};

/// Deepest nesting of groups, arrays and expressions inside a top-level
/// statement.
pub const MAX_DEPTH: usize = 256;

pub(crate) fn parse_tree(text: &str) -> (SyntaxTree, Diagnostics) {
    let (tokens, diagnostics) = tokenize(text);
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        diagnostics,
    };
    let tree = parser.unit();
    (tree, parser.diagnostics)
}

struct Parser {
    /// Never empty; the last token is `Eof`.
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    diagnostics: Diagnostics,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek().kind == *kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) {
        if !self.eat(&kind) {
            let token = self.peek();
            let message = format!("expected '{}' but got '{}'", kind.describe(), token.kind.describe());
            let position = token.position;
            self.diagnostics.error(position, message);
        }
    }

    fn unexpected(&mut self, expected: &str) {
        let token = self.peek();
        let message = format!("expected {expected} but got '{}'", token.kind.describe());
        let position = token.position;
        self.diagnostics.error(position, message);
    }

    fn unit(&mut self) -> SyntaxTree {
        let mut statements = Vec::new();
        loop {
            let token = self.advance();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::OpenParen => {
                    statements.push(self.statement(token.position));
                    self.expect(TokenKind::CloseParen);
                }
                other => {
                    self.diagnostics.error(
                        token.position,
                        format!("unexpected '{}' outside of a group", other.describe()),
                    );
                }
            }
        }
        SyntaxTree { statements }
    }

    fn statement(&mut self, position: Position) -> Statement {
        let name = self.identifier().unwrap_or_default();
        self.eat(&TokenKind::Comma);
        let data = self.data_list();
        Statement { name, data, position }
    }

    fn identifier(&mut self) -> Option<String> {
        if let TokenKind::Ident(name) = &self.peek().kind {
            let name = name.clone();
            self.advance();
            return Some(name);
        }
        self.unexpected("identifier");
        None
    }

    fn data_list(&mut self) -> Vec<DataNode> {
        let mut list = Vec::new();
        while starts_data(&self.peek().kind) {
            list.push(self.data());
            self.eat(&TokenKind::Comma);
        }
        list
    }

    fn data(&mut self) -> DataNode {
        let position = self.peek().position;
        let key = if self.eat(&TokenKind::Colon) { self.key() } else { None };
        let value = self.value();
        DataNode { key, value, position }
    }

    /// Keys are identifiers or unsigned integer literals.
    fn key(&mut self) -> Option<String> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Ident(key) => {
                self.advance();
                Some(key)
            }
            TokenKind::Integer(key) if key.bytes().all(|b| b.is_ascii_digit()) => {
                self.advance();
                Some(key)
            }
            TokenKind::Integer(key) => {
                self.advance();
                self.diagnostics
                    .error(token.position, format!("key '{key}' must be an unsigned integer"));
                None
            }
            _ => {
                self.unexpected("key");
                None
            }
        }
    }

    fn value(&mut self) -> ValueNode {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::OpenParen | TokenKind::OpenBracket | TokenKind::ExprOpen => self.nested(token),
            _ => self.leaf(token),
        }
    }

    /// A group, array or expression. `token` is its opening token.
    fn nested(&mut self, token: Token) -> ValueNode {
        if self.depth >= MAX_DEPTH {
            self.diagnostics
                .error(token.position, format!("nesting deeper than {MAX_DEPTH} levels"));
            self.skip_nested();
            return ValueNode::Invalid;
        }

        self.depth += 1;
        self.advance();
        let value = match token.kind {
            TokenKind::OpenParen => {
                let statement = self.statement(token.position);
                self.expect(TokenKind::CloseParen);
                ValueNode::Statement(statement)
            }
            TokenKind::OpenBracket => {
                let items = self.array();
                self.expect(TokenKind::CloseBracket);
                ValueNode::Array(items)
            }
            _ => {
                let name = self.identifier().unwrap_or_default();
                let args = self.data_list();
                self.expect(TokenKind::CloseParen);
                ValueNode::Expression(Expression {
                    name,
                    args,
                    position: token.position,
                })
            }
        };
        self.depth -= 1;
        value
    }

    fn leaf(&mut self, token: Token) -> ValueNode {
        let value = match token.kind {
            TokenKind::Integer(text) => match text.parse::<i64>() {
                Ok(v) => ValueNode::Integer(v),
                Err(_) => {
                    self.diagnostics
                        .error(token.position, format!("integer '{text}' out of range"));
                    ValueNode::Invalid
                }
            },
            TokenKind::Float(text) => match text.parse::<f64>() {
                Ok(v) => ValueNode::Float(v),
                Err(_) => {
                    self.diagnostics.error(token.position, format!("invalid float '{text}'"));
                    ValueNode::Invalid
                }
            },
            TokenKind::Str(s) => ValueNode::String(s),
            TokenKind::True => ValueNode::Bool(true),
            TokenKind::False => ValueNode::Bool(false),
            TokenKind::Null => ValueNode::Null,
            _ => {
                self.unexpected("value");
                return ValueNode::Invalid;
            }
        };
        self.advance();
        value
    }

    /// Skip one balanced group, array or expression without descending.
    fn skip_nested(&mut self) {
        let mut open = 0usize;
        loop {
            match self.advance().kind {
                TokenKind::OpenParen | TokenKind::OpenBracket | TokenKind::ExprOpen => open += 1,
                TokenKind::CloseParen | TokenKind::CloseBracket => {
                    open -= 1;
                    if open == 0 {
                        return;
                    }
                }
                TokenKind::Eof => return,
                _ => {}
            }
        }
    }

    fn array(&mut self) -> Vec<ValueNode> {
        let mut items = Vec::new();
        while starts_data(&self.peek().kind) {
            let node = self.data();
            if node.key.is_some() {
                self.diagnostics
                    .error(node.position, "array elements cannot have keys");
            }
            items.push(node.value);
            self.eat(&TokenKind::Comma);
        }
        items
    }
}

fn starts_data(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Colon
            | TokenKind::OpenParen
            | TokenKind::OpenBracket
            | TokenKind::ExprOpen
            | TokenKind::Integer(_)
            | TokenKind::Float(_)
            | TokenKind::Str(_)
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null
    )
}
