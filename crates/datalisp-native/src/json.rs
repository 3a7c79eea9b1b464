//! JSON bridge for native values.
//!
//! Decoding is total apart from syntax errors and a non-object root.
//! Encoding fails for values JSON cannot carry (non-finite floats and
//! opaque values).

use crate::{Map, Native, NativeError, ID_KEY};
use serde_json::Value;

/// Decode JSON text into a root mapping.
pub fn decode(text: &str) -> Result<Map, NativeError> {
    let value: Value = serde_json::from_str(text)?;
    from_json(value)
}

/// Encode a root mapping as JSON text.
pub fn encode(root: &Map, pretty: bool) -> Result<String, NativeError> {
    let value = map_to_json(root)?;
    let text = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(text)
}

/// Convert a decoded JSON document into a root mapping.
pub fn from_json(value: Value) -> Result<Map, NativeError> {
    match Native::from(value) {
        Native::Map(map) => Ok(map),
        other => Err(NativeError::ExpectedObject(other.describe().to_string())),
    }
}

pub fn to_json(native: &Native) -> Result<Value, NativeError> {
    match native {
        Native::Null => Ok(Value::Null),
        Native::Bool(b) => Ok(Value::Bool(*b)),
        Native::Int(i) => Ok(Value::from(*i)),
        Native::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .ok_or_else(|| NativeError::NotRepresentable(format!("float {f}"))),
        Native::Str(s) => Ok(Value::String(s.clone())),
        Native::List(items) => items.iter().map(to_json).collect::<Result<_, _>>().map(Value::Array),
        Native::Map(map) => map_to_json(map),
        Native::Record { type_name, fields } => {
            let mut value = map_to_json(fields)?;
            if let Value::Object(object) = &mut value {
                object.insert(ID_KEY.to_string(), Value::String(type_name.clone()));
            }
            Ok(value)
        }
        Native::Opaque(type_name) => Err(NativeError::NotRepresentable(format!("opaque value of type {type_name}"))),
    }
}

fn map_to_json(map: &Map) -> Result<Value, NativeError> {
    let mut object = serde_json::Map::with_capacity(map.len());
    for (key, value) in map.iter() {
        object.insert(key.to_string(), to_json(value)?);
    }
    Ok(Value::Object(object))
}

impl From<Value> for Native {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Native::Null,
            Value::Bool(b) => Native::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Native::Int(i),
                // Integers beyond i64 widen to float.
                None => n.as_f64().map_or(Native::Null, Native::Float),
            },
            Value::String(s) => Native::Str(s),
            Value::Array(items) => Native::List(items.into_iter().map(Native::from).collect()),
            Value::Object(object) => Native::Map(object.into_iter().map(|(k, v)| (k, Native::from(v))).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_keeps_key_order() {
        let root = decode(r#"{"b": {}, "a": {}, "c": {}}"#).unwrap();
        assert_eq!(root.keys().collect::<Vec<_>>(), ["b", "a", "c"]);
    }

    #[test]
    fn test_decode_duplicate_keys_last_wins() {
        let root = decode(r#"{"g": {"k": 1, "k": 2}}"#).unwrap();
        let group = root.get("g").and_then(Native::as_map).unwrap();
        assert_eq!(group.len(), 1);
        assert_eq!(group.get("k"), Some(&Native::Int(2)));
    }

    #[test]
    fn test_number_classes() {
        assert_eq!(Native::from(json!(3)), Native::Int(3));
        assert_eq!(Native::from(json!(3.0)), Native::Float(3.0));
        assert_eq!(Native::from(json!(u64::MAX)), Native::Float(u64::MAX as f64));
        assert_eq!(Native::from(json!(true)), Native::Bool(true));
    }

    #[test]
    fn test_record_encodes_id() {
        let fields: Map = [("x", Native::Int(1))].into_iter().collect();
        let record = Native::Record {
            type_name: "Point".into(),
            fields,
        };
        assert_eq!(to_json(&record).unwrap(), json!({"x": 1, "__id__": "Point"}));
    }

    #[test]
    fn test_unrepresentable_values() {
        assert!(matches!(
            to_json(&Native::Float(f64::INFINITY)),
            Err(NativeError::NotRepresentable(_))
        ));
        assert!(matches!(
            to_json(&Native::List(vec![Native::Opaque("socket".into())])),
            Err(NativeError::NotRepresentable(_))
        ));
    }

    #[test]
    fn test_encode_compact() {
        let root: Map = [("g", Native::Map(Map::new()))].into_iter().collect();
        assert_eq!(encode(&root, false).unwrap(), r#"{"g":{}}"#);
    }
}
