//! Helpers over the JSON-like value domain folded by reducers.
//!
//! Reducers operate on [`serde_json::Value`]. Objects keep insertion order, so
//! merged fields and grouping buckets come out in first-seen order.

use serde_json::Value;

/// Type name for `null`
pub const NULL_TYPE: &str = "null";
/// Type name for booleans
pub const BOOL_TYPE: &str = "bool";
/// Type name for numbers
pub const NUMBER_TYPE: &str = "number";
/// Type name for strings
pub const STRING_TYPE: &str = "string";
/// Type name for arrays
pub const ARRAY_TYPE: &str = "array";
/// Type name for objects
pub const OBJECT_TYPE: &str = "object";

/// Returns a human-readable name for the shape of a value
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => NULL_TYPE,
        Value::Bool(_) => BOOL_TYPE,
        Value::Number(_) => NUMBER_TYPE,
        Value::String(_) => STRING_TYPE,
        Value::Array(_) => ARRAY_TYPE,
        Value::Object(_) => OBJECT_TYPE,
    }
}

/// Returns true for the values a merge policy can descend into: objects and arrays.
pub fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

/// Looks up `key` in a record.
///
/// Objects are indexed by member name and arrays by a decimal position. Any
/// other value has no fields.
pub fn field<'a>(record: &'a Value, key: &str) -> Option<&'a Value> {
    match record {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Coerces a grouping key to the string that names its bucket.
///
/// Strings are used verbatim, so `1` and `"1"` land in the same bucket. A
/// missing key groups under `"undefined"`.
pub fn group_key(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(value) => stringify(value),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => {
                format!("{f:.0}")
            }
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => stringify(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}
