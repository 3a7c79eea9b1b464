//! Native value tree consumed by the importer and produced by the exporter.

use indexmap::IndexMap;

/// A loosely-typed native value.
///
/// This is the contract between the model and host data: decoded JSON,
/// hand-built trees, or user types exposed through [`Fields`].
#[derive(Debug, Clone, PartialEq)]
pub enum Native {
    /// Absent value.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Ordered, non-mapping sequence.
    List(Vec<Native>),
    /// String-keyed mapping.
    Map(Map),
    /// Structured object tagged with its type name.
    Record { type_name: String, fields: Map },
    /// A value the host could not describe. Carries a type description.
    Opaque(String),
}

/// Explicit adapter for structured objects that should import as groups.
///
/// Implement this for any type that is not already a [`Map`]; the type name
/// becomes the group id and each field becomes a named entry.
pub trait Fields {
    fn type_name(&self) -> &str;

    /// Named fields in declaration order.
    fn fields(&self) -> Vec<(String, Native)>;
}

impl Native {
    /// Snapshot a structured object into a [`Native::Record`].
    pub fn record<T: Fields + ?Sized>(value: &T) -> Self {
        Native::Record {
            type_name: value.type_name().to_string(),
            fields: value.fields().into_iter().collect(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Native::Null)
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Native::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Short name of the variant, for diagnostics.
    pub fn describe(&self) -> &str {
        match self {
            Native::Null => "null",
            Native::Bool(_) => "bool",
            Native::Int(_) => "integer",
            Native::Float(_) => "float",
            Native::Str(_) => "string",
            Native::List(_) => "list",
            Native::Map(_) => "map",
            Native::Record { type_name, .. } => type_name,
            Native::Opaque(type_name) => type_name,
        }
    }
}

impl From<bool> for Native {
    fn from(v: bool) -> Self {
        Native::Bool(v)
    }
}

impl From<i64> for Native {
    fn from(v: i64) -> Self {
        Native::Int(v)
    }
}

impl From<i32> for Native {
    fn from(v: i32) -> Self {
        Native::Int(v.into())
    }
}

impl From<f64> for Native {
    fn from(v: f64) -> Self {
        Native::Float(v)
    }
}

impl From<&str> for Native {
    fn from(v: &str) -> Self {
        Native::Str(v.to_string())
    }
}

impl From<String> for Native {
    fn from(v: String) -> Self {
        Native::Str(v)
    }
}

impl From<Map> for Native {
    fn from(v: Map) -> Self {
        Native::Map(v)
    }
}

impl<T: Into<Native>> From<Vec<T>> for Native {
    fn from(v: Vec<T>) -> Self {
        Native::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Native>> From<Option<T>> for Native {
    fn from(v: Option<T>) -> Self {
        v.map_or(Native::Null, Into::into)
    }
}

/// Ordered string-keyed mapping.
///
/// Inserting an existing key replaces its value and keeps the key's original
/// position. Equality is order-sensitive.
#[derive(Debug, Clone, Default)]
pub struct Map {
    entries: IndexMap<String, Native>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Insert or replace. Returns the previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: Native) -> Option<Native> {
        self.entries.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Native> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Native)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl<K: Into<String>> FromIterator<(K, Native)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, Native)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = Map::with_capacity(iter.size_hint().0);
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl IntoIterator for Map {
    type Item = (String, Native);
    type IntoIter = indexmap::map::IntoIter<String, Native>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
