//! Parsed, unevaluated DataLisp source.

use crate::diagnostics::Position;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyntaxTree {
    pub statements: Vec<Statement>,
}

/// `(name data...)`
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub name: String,
    pub data: Vec<DataNode>,
    pub position: Position,
}

/// An optionally keyed value: `:key value` or `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct DataNode {
    pub key: Option<String>,
    pub value: ValueNode,
    pub position: Position,
}

/// `$(name args...)`
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub name: String,
    pub args: Vec<DataNode>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValueNode {
    Statement(Statement),
    Array(Vec<ValueNode>),
    Expression(Expression),
    Integer(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
    /// Placeholder for a value that failed to parse.
    Invalid,
}

impl SyntaxTree {
    /// Indented outline of the tree. Expressions are shown, not evaluated.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for statement in &self.statements {
            dump_statement(&mut out, statement, 0);
        }
        out
    }
}

fn line(out: &mut String, depth: usize, text: &str) {
    out.push_str(&"  ".repeat(depth));
    out.push_str(text);
    out.push('\n');
}

fn dump_statement(out: &mut String, statement: &Statement, depth: usize) {
    line(out, depth, &format!("Statement {}", statement.name));
    for data in &statement.data {
        dump_value(out, data.key.as_deref(), &data.value, depth + 1);
    }
}

fn dump_value(out: &mut String, key: Option<&str>, value: &ValueNode, depth: usize) {
    let prefix = key.map(|k| format!(":{k} ")).unwrap_or_default();
    match value {
        ValueNode::Statement(statement) => {
            line(out, depth, &format!("{prefix}Group"));
            dump_statement(out, statement, depth + 1);
        }
        ValueNode::Array(items) => {
            line(out, depth, &format!("{prefix}Array"));
            for item in items {
                dump_value(out, None, item, depth + 1);
            }
        }
        ValueNode::Expression(expression) => {
            line(out, depth, &format!("{prefix}Expression {}", expression.name));
            for arg in &expression.args {
                dump_value(out, arg.key.as_deref(), &arg.value, depth + 1);
            }
        }
        ValueNode::Integer(v) => line(out, depth, &format!("{prefix}Integer {v}")),
        ValueNode::Float(v) => line(out, depth, &format!("{prefix}Float {v:?}")),
        ValueNode::String(v) => line(out, depth, &format!("{prefix}String {v:?}")),
        ValueNode::Bool(v) => line(out, depth, &format!("{prefix}Bool {v}")),
        ValueNode::Null => line(out, depth, &format!("{prefix}Null")),
        ValueNode::Invalid => line(out, depth, &format!("{prefix}Invalid")),
    }
}
