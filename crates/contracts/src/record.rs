//! Record - one normalized unit of persisted data

use serde_json::{Map, Value};

/// A persisted record; always a JSON object
pub type Record = Map<String, Value>;

/// Collection used when the caller does not name one
pub const DEFAULT_COLLECTION: &str = "data";

/// Field that wraps non-object values
pub const VALUE_FIELD: &str = "value";

/// Wrap a non-object value as `{"value": value}`
pub fn wrap_value(value: Value) -> Record {
    let mut record = Record::new();
    record.insert(VALUE_FIELD.to_string(), value);
    record
}
