//! Native and JSON conversion for the DataLisp model.
//!
//! Converts between a [`Container`] and a native value tree ([`Native`]),
//! and between that tree and JSON text.
//!
//! JSON document shape (`ExportMode::Dict`):
//! - `{"Point": {"x": 1, "y": 2.5, "__id__": "Point"}}` → one top group
//! - named entries keep their keys
//! - anonymous entries use their position as key: `"0"`, `"1"`, ...
//! - `"__id__"` carries the group id and is never a data key

mod export;
mod import;
pub mod json;
mod native;

pub use export::{export, ExportMode, Exporter};
pub use import::{import, Importer};
pub use native::{Fields, Map, Native};

use datalisp_model::Container;
use thiserror::Error;

/// Reserved mapping key holding a group id.
pub const ID_KEY: &str = "__id__";

#[derive(Debug, Error)]
pub enum NativeError {
    #[error("expected object at document root, got {0}")]
    ExpectedObject(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("value not representable in JSON: {0}")]
    NotRepresentable(String),
}

/// Decode JSON text and import it as a container.
pub fn import_json(text: &str) -> Result<Container, NativeError> {
    let root = json::decode(text)?;
    Ok(import(&root))
}

/// Export a container in dict form and encode it as JSON text.
pub fn export_json(container: &Container, pretty: bool) -> Result<String, NativeError> {
    let root = export(container, ExportMode::Dict);
    json::encode(&root, pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use datalisp_model::{Group, Value};
    use serde_json::json;

    #[test]
    fn test_json_round_trip() {
        let text = r#"{"Point": {"x": 1, "y": 2.5, "tags": ["a", true]}}"#;
        let container = import_json(text).unwrap();
        let out = export_json(&container, false).unwrap();

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            value,
            json!({"Point": {"x": 1, "y": 2.5, "tags": ["a", true], "__id__": "Point"}})
        );
    }

    #[test]
    fn test_export_json_rejects_non_finite() {
        let mut group = Group::new("g");
        group.insert("nan", Value::Float(f64::NAN));
        let container = Container::from_iter([group]);

        assert!(matches!(
            export_json(&container, true),
            Err(NativeError::NotRepresentable(_))
        ));
    }

    #[test]
    fn test_import_json_rejects_non_object_root() {
        assert!(matches!(import_json("[1, 2]"), Err(NativeError::ExpectedObject(_))));
        assert!(matches!(import_json("{"), Err(NativeError::Json(_))));
    }
}
