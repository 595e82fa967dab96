//! Record flattening
//!
//! Collapses a nested Graph record into a single-level map so every record of
//! a category can be loaded as one flat row by downstream tooling:
//! - `{"reviewedBy": {"id": "u1"}}` → `{"reviewedBy_id": "u1"}`
//! - arrays are kept as-is under their key and never recursed into
//! - empty objects are kept as-is

use crate::domain::FlatRecord;
use serde_json::{Map, Value};

/// Separator placed between a parent key and its child key
pub const KEY_SEPARATOR: &str = "_";

/// Flatten a record into a single-level map
///
/// Non-object inputs have no fields and flatten to an empty map.
///
/// # Examples
///
/// ```
/// use arx::core::transform::flatten::flatten_record;
/// use serde_json::json;
///
/// let record = json!({
///     "id": "d1",
///     "scope": {"query": "/groups", "queryType": "MicrosoftGraph"},
///     "reviewers": [{"query": "/users/u1"}]
/// });
///
/// let flat = flatten_record(&record);
/// assert_eq!(flat["scope_query"], "/groups");
/// assert_eq!(flat["scope_queryType"], "MicrosoftGraph");
/// assert!(flat["reviewers"].is_array());
/// ```
pub fn flatten_record(record: &Value) -> FlatRecord {
    match record {
        Value::Object(map) => flatten_object(map),
        _ => FlatRecord::new(),
    }
}

fn flatten_object(map: &Map<String, Value>) -> FlatRecord {
    let mut fields = FlatRecord::new();

    for (key, value) in map {
        match value {
            Value::Object(child) if !child.is_empty() => {
                for (child_key, child_value) in flatten_object(child) {
                    fields.insert(join_key(key, &child_key), child_value);
                }
            }
            // arrays, scalars, null, and empty objects
            _ => {
                fields.insert(key.clone(), value.clone());
            }
        }
    }

    fields
}

fn join_key(parent: &str, child: &str) -> String {
    let mut key = String::with_capacity(parent.len() + KEY_SEPARATOR.len() + child.len());
    key.push_str(parent);
    key.push_str(KEY_SEPARATOR);
    key.push_str(child);
    key
}
