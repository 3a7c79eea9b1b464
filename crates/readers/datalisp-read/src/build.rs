//! Turn a [`SyntaxTree`] into model groups.

use crate::diagnostics::Diagnostics;
use crate::expr::{Expressions, Scope};
use crate::syntax::{DataNode, Expression, Statement, SyntaxTree, ValueNode};
use datalisp_model::{Array, Container, Data, Group, Value};

pub(crate) struct Builder<'a> {
    expressions: &'a Expressions,
    diagnostics: Diagnostics,
}

impl<'a> Builder<'a> {
    pub(crate) fn new(expressions: &'a Expressions) -> Self {
        Self {
            expressions,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Append one top group per statement to `container`.
    pub(crate) fn run(mut self, tree: &SyntaxTree, container: &mut Container) -> Diagnostics {
        for statement in &tree.statements {
            let group = self.group(statement);
            tracing::trace!(group = group.id(), entries = group.len(), "built top group");
            container.push(group);
        }
        self.diagnostics
    }

    fn group(&mut self, statement: &Statement) -> Group {
        let mut group = Group::new(statement.name.as_str());
        for node in &statement.data {
            let Some(data) = self.data(node) else {
                continue;
            };
            if let Some(replaced) = group.add(data) {
                let key = replaced.key().unwrap_or_default();
                self.diagnostics.warning(
                    node.position,
                    format!("duplicate key ':{key}' in '{}', keeping the later value", group.id()),
                );
            }
        }
        group
    }

    /// Anonymous expressions that evaluate to null leave no entry, so
    /// `$(print ...)` and a false `$(if ...)` without else vanish.
    fn data(&mut self, node: &DataNode) -> Option<Data> {
        let value = self.value(&node.value);
        match &node.key {
            Some(key) => Some(Data::new(value).with_key(key.as_str())),
            None if is_dropped(&node.value, &value) => None,
            None => Some(Data::new(value)),
        }
    }

    fn value(&mut self, node: &ValueNode) -> Value {
        match node {
            ValueNode::Statement(statement) => Value::Group(self.group(statement)),
            ValueNode::Array(items) => Value::Array(self.array(items)),
            ValueNode::Expression(expression) => self.evaluate(expression).into_value(),
            ValueNode::Integer(v) => Value::Integer(*v),
            ValueNode::Float(v) => Value::Float(*v),
            ValueNode::String(v) => Value::String(v.clone()),
            ValueNode::Bool(v) => Value::Bool(*v),
            ValueNode::Null | ValueNode::Invalid => Value::Null,
        }
    }

    fn array(&mut self, items: &[ValueNode]) -> Array {
        let mut array = Array::new();
        for item in items {
            let value = self.value(item);
            if !is_dropped(item, &value) {
                array.push(Data::new(value));
            }
        }
        array
    }

    fn evaluate(&mut self, expression: &Expression) -> Data {
        let args: Vec<Data> = expression
            .args
            .iter()
            .map(|arg| {
                let value = self.value(&arg.value);
                match &arg.key {
                    Some(key) => Data::new(value).with_key(key.as_str()),
                    None => Data::new(value),
                }
            })
            .collect();

        let Some(handler) = self.expressions.get(&expression.name) else {
            self.diagnostics.error(
                expression.position,
                format!("unknown expression '$({})'", expression.name),
            );
            return Data::null();
        };

        let mut scope = Scope::new(&expression.name, expression.position, &mut self.diagnostics);
        let result = handler(&args, &mut scope);
        tracing::debug!(
            expression = expression.name.as_str(),
            kind = %result.kind(),
            "evaluated expression"
        );
        result
    }
}

fn is_dropped(node: &ValueNode, value: &Value) -> bool {
    matches!(node, ValueNode::Expression(_)) && matches!(value, Value::Null)
}
