//! Helpers for schemaless TestRail records.
//!
//! A record is whatever JSON object the API returned. Only the handful of
//! fields this tool reads or removes are ever inspected.

use serde_json::{Map, Value};

/// One entity instance as an ordered JSON object.
pub type Record = Map<String, Value>;

/// Remove `fields` from `record`, keeping the order of the remaining keys.
///
/// Absent fields are ignored, so stripping twice equals stripping once.
pub fn strip_fields(record: &mut Record, fields: &[&str]) {
    for field in fields {
        record.shift_remove(*field);
    }
}

/// Keep only `fields`, in their original order.
pub fn retain_fields(record: &mut Record, fields: &[&str]) {
    record.retain(|key, _| fields.contains(&key.as_str()));
}

/// Point a record at the destination project.
pub fn set_project_id(record: &mut Record, project_id: u64) {
    record.insert("project_id".to_string(), Value::from(project_id));
}

/// Truthiness the way the API treats optional foreign keys: `null`, `false`,
/// `0`, `""`, `[]` and `{}` count as absent.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Render an id value as a URL path segment.
///
/// Accepts non-negative integers and non-empty strings; anything else is
/// not usable as an id.
#[must_use]
pub fn id_segment(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => n.as_u64().map(|id| id.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// The `id` of a record value, if it is an object carrying a usable id.
#[must_use]
pub fn record_id(value: &Value) -> Option<String> {
    value.get("id").and_then(id_segment)
}

/// The list of records in a collection payload.
///
/// TestRail returns either a bare array or, on paginated endpoints, an
/// object wrapping the array under a named key (`{"milestones": [...]}`).
/// Both shapes are accepted; anything else yields `None`.
#[must_use]
pub fn records_in<'a>(payload: &'a Value, key: &str) -> Option<&'a [Value]> {
    match payload {
        Value::Array(items) => Some(items),
        Value::Object(map) => map.get(key).and_then(Value::as_array).map(Vec::as_slice),
        _ => None,
    }
}

/// Owned variant of [`records_in`].
#[must_use]
pub fn into_records(payload: Value, key: &str) -> Option<Vec<Value>> {
    match payload {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => match map.shift_remove(key) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

/// Ids of every record in `records` that has one, in order.
#[must_use]
pub fn collect_ids(records: &[Value]) -> Vec<String> {
    records.iter().filter_map(record_id).collect()
}
