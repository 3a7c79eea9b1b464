//! Convert the model to native values.

use crate::{Map, Native, ID_KEY};
use datalisp_model::{Array, Container, Data, Group, Value};

/// Shape of exported groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    /// Plain mapping with the group id under `"__id__"`. JSON-ready.
    Dict,
    /// [`Native::Record`] tagged with the group id.
    Record,
}

/// Export a container to a mapping from top group id to exported group.
pub fn export(container: &Container, mode: ExportMode) -> Map {
    Exporter::new(mode).run(container)
}

#[derive(Debug, Clone, Copy)]
pub struct Exporter {
    mode: ExportMode,
}

impl Exporter {
    pub fn new(mode: ExportMode) -> Self {
        Self { mode }
    }

    /// Map each top group id to its exported group, in container order.
    ///
    /// Top groups sharing an id: the later group wins.
    pub fn run(&self, container: &Container) -> Map {
        let mut root = Map::new();
        for group in container {
            if root.insert(group.id(), self.export_group(group)).is_some() {
                tracing::debug!(group = group.id(), "repeated top group id, keeping the later group");
            }
        }
        root
    }

    fn export_data(&self, data: &Data) -> Native {
        match data.value() {
            Value::Null => Native::Null,
            Value::String(s) => Native::Str(s.clone()),
            Value::Integer(i) => Native::Int(*i),
            Value::Float(f) => Native::Float(*f),
            Value::Bool(b) => Native::Bool(*b),
            Value::Group(group) => self.export_group(group),
            Value::Array(array) => self.export_array(array),
        }
    }

    fn export_array(&self, array: &Array) -> Native {
        Native::List(array.iter().map(|data| self.export_data(data)).collect())
    }

    /// Named entries first, then anonymous entries keyed by position.
    fn export_group(&self, group: &Group) -> Native {
        let mut fields = Map::new();
        for data in group.named_entries() {
            if let Some(key) = data.key() {
                fields.insert(key, self.export_data(data));
            }
        }
        for (index, data) in group.anonymous_entries().iter().enumerate() {
            fields.insert(index.to_string(), self.export_data(data));
        }

        match self.mode {
            ExportMode::Dict => {
                fields.insert(ID_KEY, Native::Str(group.id().to_string()));
                Native::Map(fields)
            }
            ExportMode::Record => Native::Record {
                type_name: group.id().to_string(),
                fields,
            },
        }
    }
}
