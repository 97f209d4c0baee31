//! Record normalizer
//!
//! Turns any JSON payload into a sequence of object records.

use contracts::{wrap_value, Record};
use serde_json::Value;

/// Normalize a payload into records
///
/// - `null` -> no records
/// - array -> one record per element; objects kept, everything else wrapped
/// - object -> the object itself
/// - scalar -> `{"value": scalar}`
pub fn normalize(data: Value) -> Vec<Record> {
    match data {
        Value::Null => Vec::new(),
        Value::Array(items) => items.into_iter().map(into_record).collect(),
        Value::Object(map) => vec![map],
        scalar => vec![wrap_value(scalar)],
    }
}

fn into_record(item: Value) -> Record {
    match item {
        Value::Object(map) => map,
        other => wrap_value(other),
    }
}

/// True for payloads that `push` ignores: null, "", [] and {}
pub fn is_empty_payload(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: Value) -> Vec<Value> {
        normalize(value).into_iter().map(Value::Object).collect()
    }

    #[test]
    fn test_null_is_empty() {
        assert!(normalize(Value::Null).is_empty());
    }

    #[test]
    fn test_scalar_is_wrapped() {
        assert_eq!(records(json!(5)), vec![json!({"value": 5})]);
        assert_eq!(records(json!("x")), vec![json!({"value": "x"})]);
        assert_eq!(records(json!(false)), vec![json!({"value": false})]);
    }

    #[test]
    fn test_object_kept_whole() {
        assert_eq!(records(json!({"a": 1})), vec![json!({"a": 1})]);
    }

    #[test]
    fn test_array_elements_keep_order() {
        assert_eq!(
            records(json!([1, {"a": 1}, [2, 3], null])),
            vec![
                json!({"value": 1}),
                json!({"a": 1}),
                json!({"value": [2, 3]}),
                json!({"value": null}),
            ]
        );
    }

    #[test]
    fn test_empty_payloads() {
        for value in [json!(null), json!(""), json!([]), json!({})] {
            assert!(is_empty_payload(&value), "{value}");
        }
        for value in [json!(0), json!(false), json!(" "), json!([null])] {
            assert!(!is_empty_payload(&value), "{value}");
        }
    }
}
