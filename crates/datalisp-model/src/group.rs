//! Groups and arrays.

use std::collections::HashMap;

use crate::{Data, Kind, Value};
use serde::{Deserialize, Serialize};

/// Id given to groups whose identity cannot be determined.
pub const UNKNOWN_ID: &str = "__unknown__";

/// A record identified by an id, mixing named and anonymous entries.
///
/// Written as `(id value :key value ...)`. Named keys are unique; adding a
/// key that already exists replaces the earlier value in place. Anonymous
/// entries are identified by position only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GroupRepr", into = "GroupRepr")]
pub struct Group {
    id: String,
    named: Vec<Data>,
    /// Key to position in `named`.
    index: HashMap<String, usize>,
    anonymous: Vec<Data>,
}

/// Serialized form of [`Group`]. Deserializing re-adds every entry, so the
/// key index and the id rules hold for snapshots too.
#[derive(Serialize, Deserialize)]
#[serde(rename = "Group")]
struct GroupRepr {
    id: String,
    named: Vec<Data>,
    anonymous: Vec<Data>,
}

impl From<GroupRepr> for Group {
    fn from(repr: GroupRepr) -> Self {
        let mut group = Group::new(repr.id);
        for data in repr.named.into_iter().chain(repr.anonymous) {
            group.add(data);
        }
        group
    }
}

impl From<Group> for GroupRepr {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            named: group.named,
            anonymous: group.anonymous,
        }
    }
}

impl Group {
    /// Create an empty group. An empty id resolves to [`UNKNOWN_ID`].
    pub fn new(id: impl Into<String>) -> Self {
        let mut group = Self {
            id: String::new(),
            named: Vec::new(),
            index: HashMap::new(),
            anonymous: Vec::new(),
        };
        group.set_id(id);
        group
    }

    pub fn unknown() -> Self {
        Self::new(UNKNOWN_ID)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.id = if id.is_empty() { UNKNOWN_ID.to_string() } else { id };
    }

    /// Add a named or anonymous entry, depending on whether `data` has a key.
    ///
    /// Returns the entry replaced by a named insert, if any.
    pub fn add(&mut self, data: Data) -> Option<Data> {
        let Some(key) = data.key() else {
            self.anonymous.push(data);
            return None;
        };

        match self.index.get(key) {
            Some(&position) => Some(std::mem::replace(&mut self.named[position], data)),
            None => {
                self.index.insert(key.to_string(), self.named.len());
                self.named.push(data);
                None
            }
        }
    }

    /// Add a named entry. Last write wins.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Data> {
        self.add(Data::new(value).with_key(key))
    }

    /// Append an anonymous entry.
    pub fn push(&mut self, value: Value) {
        self.anonymous.push(Data::new(value));
    }

    /// Anonymous entry at position `index`.
    pub fn at(&self, index: usize) -> Option<&Data> {
        self.anonymous.get(index)
    }

    pub fn anonymous_count(&self) -> usize {
        self.anonymous.len()
    }

    /// Named entry with the given key.
    pub fn get(&self, key: &str) -> Option<&Data> {
        self.index.get(key).map(|&position| &self.named[position])
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Named entries in insertion order.
    pub fn named_entries(&self) -> &[Data] {
        &self.named
    }

    /// Anonymous entries in position order.
    pub fn anonymous_entries(&self) -> &[Data] {
        &self.anonymous
    }

    /// Total number of entries, named and anonymous.
    pub fn len(&self) -> usize {
        self.named.len() + self.anonymous.len()
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.anonymous.is_empty()
    }
}

/// An ordered list of anonymous data. Written as `[a, b, c]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Array {
    items: Vec<Data>,
}

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element. Any key on `data` is dropped.
    pub fn push(&mut self, data: Data) {
        self.items.push(data.anonymous());
    }

    /// Replace the element at `index`. Appends when `index == len()`;
    /// indices past the end are ignored.
    pub fn set(&mut self, index: usize, data: Data) {
        let data = data.anonymous();
        if index < self.items.len() {
            self.items[index] = data;
        } else if index == self.items.len() {
            self.items.push(data);
        }
    }

    pub fn get(&self, index: usize) -> Option<&Data> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Data> {
        self.items.iter()
    }

    /// True if every element has the given kind. Vacuously true when empty.
    pub fn is_all(&self, kind: Kind) -> bool {
        self.items.iter().all(|d| d.kind() == kind)
    }

    pub fn is_all_number(&self) -> bool {
        self.items.iter().all(Data::is_number)
    }
}

impl FromIterator<Data> for Array {
    fn from_iter<I: IntoIterator<Item = Data>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Data::anonymous).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Data;
    type IntoIter = std::slice::Iter<'a, Data>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
