//! JSON save/import.
//!
//! Export writes an envelope `{fileName, data, timestamp}` with `data` as an
//! array of cell-row arrays. Import accepts:
//! - an array of arrays (rows of cells)
//! - an array of objects: the first object's keys become a header row and
//!   every object becomes a data row keyed by those headers
//! - a single object: one header row plus one data row
//! - the export envelope itself

use crate::error::{GridError, Result};
use crate::store::Store;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SavedGrid<'a> {
    file_name: &'a str,
    data: Vec<Vec<String>>,
    timestamp: String,
}

impl Store {
    /// Pretty-printed JSON save file for this store
    pub fn to_json_export(&self, file_name: &str, timestamp: DateTime<Utc>) -> Result<String> {
        let saved = SavedGrid {
            file_name,
            data: self.to_array(),
            timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        serde_json::to_string_pretty(&saved)
            .map_err(|e| GridError::Serialize(format!("JSON write error: {e}")))
    }
}

/// Parse imported JSON text into raw rows of cells.
///
/// Any other shape fails with [`GridError::ImportFormat`].
pub fn parse_import_json(content: &str) -> Result<Vec<Vec<String>>> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| GridError::ImportFormat(format!("Invalid JSON: {e}")))?;

    match value {
        Value::Array(items) => rows_from_array(&items),
        Value::Object(obj) => match obj.get("data") {
            Some(Value::Array(items)) if is_envelope(&obj) => rows_from_arrays(items),
            _ => Ok(rows_from_objects(&[&obj])),
        },
        other => Err(GridError::ImportFormat(format!(
            "expected an array or an object, found {}",
            type_name(&other)
        ))),
    }
}

/// A saved-grid envelope: `data` is an array whose elements are all arrays
fn is_envelope(obj: &Map<String, Value>) -> bool {
    obj.get("data")
        .and_then(Value::as_array)
        .is_some_and(|items| items.iter().all(Value::is_array))
}

fn rows_from_array(items: &[Value]) -> Result<Vec<Vec<String>>> {
    match items.first() {
        None => Ok(Vec::new()),
        Some(Value::Object(_)) => {
            let objects = items
                .iter()
                .enumerate()
                .map(|(idx, item)| {
                    item.as_object().ok_or_else(|| {
                        GridError::ImportFormat(format!("element at index {idx} must be an object"))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(rows_from_objects(&objects))
        }
        Some(_) => rows_from_arrays(items),
    }
}

fn rows_from_arrays(items: &[Value]) -> Result<Vec<Vec<String>>> {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::Array(cells) => Ok(cells.iter().map(cell_text).collect()),
            other => Err(GridError::ImportFormat(format!(
                "element at index {idx} must be an array, found {}",
                type_name(other)
            ))),
        })
        .collect()
}

fn rows_from_objects(objects: &[&Map<String, Value>]) -> Vec<Vec<String>> {
    let Some(first) = objects.first() else {
        return Vec::new();
    };
    let headers: Vec<String> = first.keys().cloned().collect();
    let mut rows = Vec::with_capacity(objects.len() + 1);
    rows.push(headers.clone());
    for obj in objects {
        rows.push(
            headers
                .iter()
                .map(|h| obj.get(h).map(cell_text).unwrap_or_default())
                .collect(),
        );
    }
    rows
}

/// Stringify one JSON value as cell text
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_export_envelope_shape() {
        let store = Store::from_data(&[vec!["a", "1"], vec!["b", ""]], 0, 0);
        let timestamp = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let json = store.to_json_export("report", timestamp).unwrap();

        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["fileName"], "report");
        assert_eq!(value["data"][0][1], "1");
        assert_eq!(value["timestamp"], "2024-05-01T12:30:00.000Z");
        // key order and two-space indentation
        assert!(json.starts_with("{\n  \"fileName\""));
    }

    #[test]
    fn test_import_array_of_arrays() {
        let rows = parse_import_json(r#"[["a", 1, null], [true]]"#).unwrap();
        assert_eq!(rows, vec![vec!["a", "1", ""], vec!["true"]]);
    }

    #[test]
    fn test_import_array_of_objects() {
        let rows = parse_import_json(r#"[{"name": "Alice", "age": 30}, {"name": "Bob"}]"#).unwrap();
        assert_eq!(
            rows,
            vec![vec!["name", "age"], vec!["Alice", "30"], vec!["Bob", ""]]
        );
    }

    #[test]
    fn test_import_single_object() {
        let rows = parse_import_json(r#"{"x": 1, "y": {"z": 2}}"#).unwrap();
        assert_eq!(rows, vec![vec!["x", "y"], vec!["1", r#"{"z":2}"#]]);
    }

    #[test]
    fn test_import_envelope_round_trip() {
        let store = Store::from_data(&[vec!["a", "b"], vec!["c", "d"]], 0, 0);
        let json = store.to_json_export("grid", Utc::now()).unwrap();
        assert_eq!(parse_import_json(&json).unwrap(), store.to_array());
    }

    #[test]
    fn test_import_rejects_other_shapes() {
        for bad in ["42", "\"text\"", "null", "[1, 2]", "[[1], {\"a\": 1}]", "[{\"a\": 1}, [1]]", "{oops"] {
            let err = parse_import_json(bad).unwrap_err();
            assert!(matches!(err, GridError::ImportFormat(_)), "{bad}: {err}");
        }
    }

    #[test]
    fn test_import_empty_array() {
        assert!(parse_import_json("[]").unwrap().is_empty());
    }
}
