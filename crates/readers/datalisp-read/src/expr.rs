//! Expressions evaluated at build time: `$(name args...)`.

use crate::diagnostics::{Diagnostics, Position};
use datalisp_model::{Data, Group, Kind, Value};
use std::collections::HashMap;
use std::fmt;

/// An expression handler. Arguments arrive evaluated, keys included.
pub type Handler = fn(&[Data], &mut Scope<'_>) -> Data;

/// What a handler can see of the build: its own name, position, and the
/// diagnostics sink.
pub struct Scope<'a> {
    name: &'a str,
    position: Position,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(name: &'a str, position: Position, diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            name,
            position,
            diagnostics,
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.diagnostics.error(self.position, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.diagnostics.warning(self.position, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.diagnostics.info(self.position, message);
    }

    /// Booleans as-is, numbers are true when non-zero. Anything else is an
    /// error.
    pub fn to_bool(&mut self, data: &Data) -> Option<bool> {
        match data.value() {
            Value::Bool(b) => Some(*b),
            Value::Integer(i) => Some(*i != 0),
            Value::Float(f) => Some(*f != 0.0),
            other => {
                self.error(format!("cannot convert '{}' to '{}'", other.kind(), Kind::Bool));
                None
            }
        }
    }
}

/// Registry of expression handlers by name.
#[derive(Clone, Default)]
pub struct Expressions {
    handlers: HashMap<String, Handler>,
}

impl Expressions {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// `if`, `not`, `and`, `or`, `print`, `union`, `named`, `anonymous`.
    pub fn standard() -> Self {
        let mut expressions = Self::new();
        expressions.register("if", if_expr);
        expressions.register("not", not_expr);
        expressions.register("and", and_expr);
        expressions.register("or", or_expr);
        expressions.register("print", print_expr);
        expressions.register("union", union_expr);
        expressions.register("named", named_expr);
        expressions.register("anonymous", anonymous_expr);
        expressions
    }

    /// Add or replace a handler. Returns the replaced handler.
    pub fn register(&mut self, name: impl Into<String>, handler: Handler) -> Option<Handler> {
        self.handlers.insert(name.into(), handler)
    }

    pub fn get(&self, name: &str) -> Option<Handler> {
        self.handlers.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

impl fmt::Debug for Expressions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("Expressions").field("handlers", &names).finish()
    }
}

fn group_of(group: Group) -> Data {
    Data::group(group)
}

/// `$(if cond then [else])`
fn if_expr(args: &[Data], scope: &mut Scope<'_>) -> Data {
    let (cond, then, otherwise) = match args {
        [cond, then] => (cond, then, None),
        [cond, then, otherwise] => (cond, then, Some(otherwise)),
        _ => {
            scope.error("$(if ...) takes a condition and one or two branches");
            return Data::null();
        }
    };

    match scope.to_bool(cond) {
        Some(true) => then.clone().anonymous(),
        Some(false) => otherwise.cloned().map_or_else(Data::null, Data::anonymous),
        None => Data::null(),
    }
}

/// `$(not x)` negates one value; several values negate element-wise into an
/// anonymous group.
fn not_expr(args: &[Data], scope: &mut Scope<'_>) -> Data {
    let mut negate = |data: &Data| scope.to_bool(data).map_or_else(Data::null, |b| Data::bool(!b));
    match args {
        [] => Data::null(),
        [single] => negate(single),
        many => {
            let mut group = Group::unknown();
            for data in many {
                group.push(negate(data).into_value());
            }
            group_of(group)
        }
    }
}

fn and_expr(args: &[Data], scope: &mut Scope<'_>) -> Data {
    fold_bool(args, scope, true)
}

fn or_expr(args: &[Data], scope: &mut Scope<'_>) -> Data {
    fold_bool(args, scope, false)
}

/// `and` when `all` is set, `or` otherwise. Short-circuits.
fn fold_bool(args: &[Data], scope: &mut Scope<'_>, all: bool) -> Data {
    match args {
        [] => Data::null(),
        [single] => scope.to_bool(single).map_or_else(Data::null, Data::bool),
        many => {
            for data in many {
                let value = scope.to_bool(data).unwrap_or(false);
                if value != all {
                    return Data::bool(!all);
                }
            }
            Data::bool(all)
        }
    }
}

/// `$(print args...)` reports its arguments as one info diagnostic.
fn print_expr(args: &[Data], scope: &mut Scope<'_>) -> Data {
    let mut text = String::new();
    for data in args {
        render(&mut text, data.value());
    }
    scope.info(text);
    Data::null()
}

fn render(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::String(s) => out.push_str(s),
        Value::Integer(i) => out.push_str(&i.to_string()),
        Value::Float(f) => out.push_str(&f.to_string()),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Array(array) => {
            out.push('[');
            for (i, data) in array.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render(out, data.value());
            }
            out.push(']');
        }
        Value::Group(group) => {
            out.push('(');
            out.push_str(group.id());
            let entries = group.anonymous_entries().iter().chain(group.named_entries());
            for (i, data) in entries.enumerate() {
                out.push_str(if i > 0 { ", " } else { " " });
                if let Some(key) = data.key() {
                    out.push(':');
                    out.push_str(key);
                    out.push(' ');
                }
                render(out, data.value());
            }
            out.push(')');
        }
    }
}

/// `$(union args...)` merges groups into one anonymous-id group: named
/// entries first, then anonymous ones. Non-group arguments are added as-is.
/// A single argument is returned unchanged.
fn union_expr(args: &[Data], _scope: &mut Scope<'_>) -> Data {
    match args {
        [] => Data::null(),
        [single] => single.clone(),
        many => {
            let mut merged = Group::unknown();
            for data in many {
                match data.as_group() {
                    Some(group) => {
                        for entry in group.named_entries().iter().chain(group.anonymous_entries()) {
                            merged.add(entry.clone());
                        }
                    }
                    None => {
                        merged.add(data.clone());
                    }
                }
            }
            group_of(merged)
        }
    }
}

/// Named entries of the union, or null when there are none.
fn named_expr(args: &[Data], scope: &mut Scope<'_>) -> Data {
    let union = union_expr(args, scope);
    let Some(group) = union.as_group().filter(|g| !g.named_entries().is_empty()) else {
        return Data::null();
    };
    let mut named = Group::unknown();
    for entry in group.named_entries() {
        named.add(entry.clone());
    }
    group_of(named)
}

/// Anonymous entries of the union. Non-group results pass through.
fn anonymous_expr(args: &[Data], scope: &mut Scope<'_>) -> Data {
    let union = union_expr(args, scope);
    let Some(group) = union.as_group() else {
        return union;
    };
    let mut anonymous = Group::unknown();
    for entry in group.anonymous_entries() {
        anonymous.add(entry.clone());
    }
    group_of(anonymous)
}
