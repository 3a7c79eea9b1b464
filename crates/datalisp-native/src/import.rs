//! Convert native values to the model.

use crate::{Map, Native, ID_KEY};
use datalisp_model::{Array, Container, Data, Group, Value};

/// A classification rule: returns a value when it accepts the input.
type Rule = fn(&Native) -> Option<Value>;

/// Classification rules in priority order. The first rule that accepts a
/// value decides its variant; booleans must be tried before integers.
const RULES: [Rule; 6] = [
    array_rule,
    string_rule,
    bool_rule,
    integer_rule,
    float_rule,
    group_rule,
];

/// Import a native root mapping into a container.
pub fn import(root: &Map) -> Container {
    Importer::new().run(root)
}

/// Builds a [`Container`] from a native root mapping.
///
/// Import is total: values no rule accepts become null data.
#[derive(Debug, Default, Clone, Copy)]
pub struct Importer;

impl Importer {
    pub fn new() -> Self {
        Self
    }

    /// Build one top group per root entry, in root order.
    ///
    /// The root key always becomes the group id, overriding any `__id__`
    /// inside the payload.
    pub fn run(&self, root: &Map) -> Container {
        let mut container = Container::new();
        for (name, payload) in root.iter() {
            let mut group = match payload {
                Native::Map(_) | Native::Record { .. } => to_group(payload),
                // A scalar or list payload is kept as the group's only
                // anonymous entry.
                other => {
                    tracing::debug!(group = name, kind = other.describe(), "wrapping non-group payload");
                    let mut group = Group::unknown();
                    group.push(classify(other));
                    group
                }
            };
            group.set_id(name);
            tracing::trace!(group = name, entries = group.len(), "imported top group");
            container.push(group);
        }
        container
    }
}

/// Classify a single native value.
fn classify(native: &Native) -> Value {
    if let Some(value) = RULES.iter().find_map(|rule| rule(native)) {
        return value;
    }
    if let Native::Opaque(type_name) = native {
        tracing::debug!(type_name = type_name.as_str(), "unsupported native value imported as null");
    }
    Value::Null
}

fn array_rule(native: &Native) -> Option<Value> {
    match native {
        Native::List(items) => {
            let array: Array = items.iter().map(|item| Data::new(classify(item))).collect();
            Some(Value::Array(array))
        }
        _ => None,
    }
}

fn string_rule(native: &Native) -> Option<Value> {
    match native {
        Native::Str(s) => Some(Value::String(s.clone())),
        _ => None,
    }
}

fn bool_rule(native: &Native) -> Option<Value> {
    match native {
        Native::Bool(b) => Some(Value::Bool(*b)),
        _ => None,
    }
}

fn integer_rule(native: &Native) -> Option<Value> {
    match native {
        Native::Int(i) => Some(Value::Integer(*i)),
        _ => None,
    }
}

fn float_rule(native: &Native) -> Option<Value> {
    match native {
        Native::Float(f) => Some(Value::Float(*f)),
        _ => None,
    }
}

fn group_rule(native: &Native) -> Option<Value> {
    match native {
        Native::Map(_) | Native::Record { .. } => Some(Value::Group(to_group(native))),
        _ => None,
    }
}

/// Build a group from a mapping or record.
///
/// Id resolution: `__id__` entry of a mapping, then the record's type name,
/// then [`datalisp_model::UNKNOWN_ID`].
fn to_group(native: &Native) -> Group {
    let (id, fields) = match native {
        Native::Map(map) => (map.get(ID_KEY).and_then(id_from), map),
        Native::Record { type_name, fields } => (Some(type_name.clone()), fields),
        _ => return Group::unknown(),
    };

    let mut group = id.map_or_else(Group::unknown, Group::new);
    for (key, value) in fields.iter() {
        if key == ID_KEY {
            continue;
        }
        group.add(Data::new(classify(value)).with_key(key));
    }
    group
}

/// Stringify an explicit `__id__` value. Null and structured values do not
/// name a group.
fn id_from(native: &Native) -> Option<String> {
    match native {
        Native::Str(s) => Some(s.clone()),
        Native::Int(i) => Some(i.to_string()),
        Native::Float(f) => Some(f.to_string()),
        Native::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fields;
    use datalisp_model::{Kind, UNKNOWN_ID};

    fn root(entries: Vec<(&str, Native)>) -> Map {
        entries.into_iter().collect()
    }

    struct Duplicated;

    impl Fields for Duplicated {
        fn type_name(&self) -> &str {
            "Duplicated"
        }

        fn fields(&self) -> Vec<(String, Native)> {
            vec![
                ("1".into(), Native::Str("first".into())),
                ("other".into(), Native::Null),
                ("1".into(), Native::Str("second".into())),
            ]
        }
    }

    #[test]
    fn test_id_extraction() {
        let point: Map = root(vec![
            (ID_KEY, Native::Str("Point".into())),
            ("x", Native::Int(1)),
            ("y", Native::Int(2)),
        ]);
        let group = to_group(&Native::Map(point));

        assert_eq!(group.id(), "Point");
        assert_eq!(group.get("x").and_then(Data::as_int), Some(1));
        assert_eq!(group.get("y").and_then(Data::as_int), Some(2));
        assert!(!group.has_key(ID_KEY));
        assert_eq!(group.named_entries().len(), 2);
    }

    #[test]
    fn test_missing_id_is_unknown() {
        let group = to_group(&Native::Map(root(vec![("a", Native::Int(1))])));
        assert_eq!(group.id(), UNKNOWN_ID);
    }

    #[test]
    fn test_non_string_id_is_stringified() {
        let group = to_group(&Native::Map(root(vec![(ID_KEY, Native::Int(7))])));
        assert_eq!(group.id(), "7");

        let group = to_group(&Native::Map(root(vec![(ID_KEY, Native::Null)])));
        assert_eq!(group.id(), UNKNOWN_ID);
    }

    #[test]
    fn test_record_uses_type_name() {
        let group = to_group(&Native::record(&Duplicated));
        assert_eq!(group.id(), "Duplicated");
    }

    #[test]
    fn test_duplicate_fields_last_write_wins() {
        let group = to_group(&Native::record(&Duplicated));
        assert_eq!(group.named_entries().len(), 2);
        assert_eq!(group.get("1").and_then(Data::as_str), Some("second"));
    }

    #[test]
    fn test_boolean_precedence() {
        assert_eq!(classify(&Native::Bool(true)), Value::Bool(true));
        assert_eq!(classify(&Native::Bool(false)).kind(), Kind::Bool);
        assert_eq!(classify(&Native::Int(1)).kind(), Kind::Integer);
    }

    #[test]
    fn test_lists_always_import_as_arrays() {
        match classify(&Native::from(vec![Native::Int(1), Native::Str("a".into())])) {
            Value::Array(array) => {
                assert_eq!(array.len(), 2);
                assert_eq!(array.get(1).and_then(Data::as_str), Some("a"));
                assert!(array.iter().all(Data::is_anonymous));
            }
            other => panic!("expected Array, got {other:?}"),
        }
    }

    #[test]
    fn test_lossy_leaf() {
        assert_eq!(classify(&Native::Opaque("bytes".into())), Value::Null);
        assert_eq!(classify(&Native::Null), Value::Null);
    }

    #[test]
    fn test_lossy_leaf_exports_as_null() {
        let payload = root(vec![("blob", Native::Opaque("bytes".into())), ("n", Native::Int(1))]);
        let container = import(&root(vec![("g", Native::Map(payload))]));
        let exported = crate::export(&container, crate::ExportMode::Dict);

        let group = exported.get("g").and_then(Native::as_map).unwrap();
        assert_eq!(group.get("blob"), Some(&Native::Null));
        assert_eq!(group.get("n"), Some(&Native::Int(1)));
        assert_eq!(group.keys().collect::<Vec<_>>(), ["blob", "n", ID_KEY]);
    }

    #[test]
    fn test_root_name_overrides_payload_id() {
        let payload = root(vec![(ID_KEY, Native::Str("Inner".into())), ("v", Native::Int(1))]);
        let container = import(&root(vec![("Outer", Native::Map(payload))]));

        assert_eq!(container.len(), 1);
        assert_eq!(container.top_groups()[0].id(), "Outer");
    }

    #[test]
    fn test_root_order_preserved() {
        let container = import(&root(vec![
            ("b", Native::Map(Map::new())),
            ("a", Native::Map(Map::new())),
            ("c", Native::Map(Map::new())),
        ]));
        let ids: Vec<&str> = container.iter().map(Group::id).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[test]
    fn test_scalar_top_level_payload() {
        let container = import(&root(vec![("version", Native::Int(3))]));
        let group = &container.top_groups()[0];

        assert_eq!(group.id(), "version");
        assert_eq!(group.at(0).and_then(Data::as_int), Some(3));
    }

    #[test]
    fn test_nested_groups() {
        let inner = root(vec![(ID_KEY, Native::Str("Vec2".into())), ("x", Native::Float(0.5))]);
        let outer = root(vec![("pos", Native::Map(inner))]);
        let group = to_group(&Native::Map(outer));

        let pos = group.get("pos").and_then(Data::as_group).unwrap();
        assert_eq!(pos.id(), "Vec2");
        assert_eq!(pos.get("x").and_then(Data::as_float), Some(0.5));
    }
}
