//! Tagged data values.

use crate::{Array, Group};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A value with exactly one active variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// No value. Produced for native values the importer cannot classify.
    Null,
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Nested group: `(id ...)`.
    Group(Group),
    /// Anonymous ordered list: `[a, b, c]`.
    Array(Array),
}

/// Variant tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    String,
    Integer,
    Float,
    Bool,
    Group,
    Array,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Null => "Null",
            Kind::String => "String",
            Kind::Integer => "Integer",
            Kind::Float => "Float",
            Kind::Bool => "Bool",
            Kind::Group => "Group",
            Kind::Array => "Array",
        };
        f.write_str(name)
    }
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::String(_) => Kind::String,
            Value::Integer(_) => Kind::Integer,
            Value::Float(_) => Kind::Float,
            Value::Bool(_) => Kind::Bool,
            Value::Group(_) => Kind::Group,
            Value::Array(_) => Kind::Array,
        }
    }
}

impl From<Group> for Value {
    fn from(group: Group) -> Self {
        Value::Group(group)
    }
}

impl From<Array> for Value {
    fn from(array: Array) -> Self {
        Value::Array(array)
    }
}

/// A value plus its association key.
///
/// The key is set when the data is a named member of a group and unset when
/// it is anonymous or an array element. The value's variant cannot change
/// once the data is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Data {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    value: Value,
}

// Builder methods for data
impl Data {
    pub fn new(value: Value) -> Self {
        Self { key: None, value }
    }

    pub fn null() -> Self {
        Self::new(Value::Null)
    }

    pub fn string(v: impl Into<String>) -> Self {
        Self::new(Value::String(v.into()))
    }

    pub fn integer(v: i64) -> Self {
        Self::new(Value::Integer(v))
    }

    pub fn float(v: f64) -> Self {
        Self::new(Value::Float(v))
    }

    pub fn bool(v: bool) -> Self {
        Self::new(Value::Bool(v))
    }

    pub fn group(group: Group) -> Self {
        Self::new(Value::Group(group))
    }

    pub fn array(array: Array) -> Self {
        Self::new(Value::Array(array))
    }

    /// Attach an association key, making this a named entry.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Drop the association key, making this an anonymous entry.
    pub fn anonymous(mut self) -> Self {
        self.key = None;
        self
    }
}

impl Data {
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.key.is_none()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn kind(&self) -> Kind {
        self.value.kind()
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.value {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.value {
            Value::Float(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match &self.value {
            Value::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match &self.value {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// True for integer and float values.
    pub fn is_number(&self) -> bool {
        matches!(self.value, Value::Integer(_) | Value::Float(_))
    }

    /// Integer or float value widened to `f64`.
    pub fn as_number(&self) -> Option<f64> {
        match self.value {
            Value::Integer(i) => Some(i as f64),
            Value::Float(f) => Some(f),
            _ => None,
        }
    }
}

impl From<Value> for Data {
    fn from(value: Value) -> Self {
        Data::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_variant() {
        let data = Data::integer(4);
        assert_eq!(data.kind(), Kind::Integer);
        assert_eq!(data.as_int(), Some(4));
        assert_eq!(data.as_float(), None);
        assert_eq!(data.as_str(), None);
    }

    #[test]
    fn test_key_builder() {
        let data = Data::string("hi").with_key("greeting");
        assert_eq!(data.key(), Some("greeting"));
        assert!(!data.is_anonymous());

        let data = data.anonymous();
        assert!(data.is_anonymous());
        assert_eq!(data.as_str(), Some("hi"));
    }

    #[test]
    fn test_number_widening() {
        assert_eq!(Data::integer(2).as_number(), Some(2.0));
        assert_eq!(Data::float(2.5).as_number(), Some(2.5));
        assert_eq!(Data::bool(true).as_number(), None);
        assert!(!Data::null().is_number());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Kind::Bool.to_string(), "Bool");
        assert_eq!(Data::null().kind().to_string(), "Null");
    }
}
