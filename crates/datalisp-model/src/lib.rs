//! Typed tree model for DataLisp documents.
//!
//! The model is shared by every representation of a document: the textual
//! notation, native values and JSON. It carries no behavior beyond
//! construction and access.
//!
//! - [`Data`]: a tagged [`Value`], optionally keyed when it is a named member
//!   of a group.
//! - [`Group`]: an id plus named and anonymous entries.
//! - [`Array`]: an ordered list of anonymous data.
//! - [`Container`]: the ordered top-level groups of a document.

mod data;
mod group;

pub use data::*;
pub use group::*;

use serde::{Deserialize, Serialize};

/// A complete document: the ordered list of top groups.
///
/// Built in one pass (by a reader or an importer) and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Container {
    top_groups: Vec<Group>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a top group. Order of insertion is preserved.
    pub fn push(&mut self, group: Group) {
        self.top_groups.push(group);
    }

    pub fn top_groups(&self) -> &[Group] {
        &self.top_groups
    }

    pub fn len(&self) -> usize {
        self.top_groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.top_groups.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Group> {
        self.top_groups.iter()
    }

    /// All groups with the given id, top-level and nested, depth-first.
    pub fn groups_with_id(&self, id: &str) -> Vec<&Group> {
        let mut found = Vec::new();
        for top in &self.top_groups {
            walk_groups(top, &mut |group| {
                if group.id() == id {
                    found.push(group);
                }
            });
        }
        found
    }

    /// All named data with the given key, at any depth.
    pub fn data_with_key(&self, key: &str) -> Vec<&Data> {
        let mut found = Vec::new();
        for top in &self.top_groups {
            walk_groups(top, &mut |group| {
                if let Some(data) = group.get(key) {
                    found.push(data);
                }
            });
        }
        found
    }
}

fn walk_groups<'a>(group: &'a Group, visit: &mut impl FnMut(&'a Group)) {
    visit(group);
    for data in group.named_entries().iter().chain(group.anonymous_entries()) {
        walk_value(data.value(), visit);
    }
}

fn walk_value<'a>(value: &'a Value, visit: &mut impl FnMut(&'a Group)) {
    match value {
        Value::Group(group) => walk_groups(group, visit),
        Value::Array(array) => {
            for item in array.iter() {
                walk_value(item.value(), visit);
            }
        }
        _ => {}
    }
}

impl<'a> IntoIterator for &'a Container {
    type Item = &'a Group;
    type IntoIter = std::slice::Iter<'a, Group>;

    fn into_iter(self) -> Self::IntoIter {
        self.top_groups.iter()
    }
}

impl FromIterator<Group> for Container {
    fn from_iter<I: IntoIterator<Item = Group>>(iter: I) -> Self {
        Self {
            top_groups: iter.into_iter().collect(),
        }
    }
}

impl Extend<Group> for Container {
    fn extend<I: IntoIterator<Item = Group>>(&mut self, iter: I) {
        self.top_groups.extend(iter);
    }
}
