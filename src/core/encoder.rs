//! Structured field encoding
//!
//! Structured emits are encoded to canonical JSON (keys sorted) on the
//! producer side, before the entry is queued.

use super::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered mapping of structured log fields.
///
/// # Example
///
/// ```
/// use fanout_logger::LogFields;
///
/// let fields = LogFields::new().with("name", "a").with("age", 1);
/// assert_eq!(fields.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogFields(Map<String, Value>);

impl LogFields {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Add a field, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for LogFields {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for LogFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Encode a structured payload to JSON text.
///
/// Returns `Ok(None)` when the payload is `null` or an empty object; such
/// payloads are dropped by the logger without a diagnostic.
///
/// # Errors
///
/// Returns [`LoggerError::JsonError`](super::error::LoggerError::JsonError)
/// when the payload cannot be represented as JSON.
pub fn encode<T: Serialize + ?Sized>(payload: &T) -> Result<Option<String>> {
    let value = serde_json::to_value(payload)?;
    match &value {
        Value::Null => Ok(None),
        Value::Object(map) if map.is_empty() => Ok(None),
        _ => Ok(Some(serde_json::to_string(&value)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::{Error as _, Serializer};
    use std::collections::HashMap;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error> {
            Err(S::Error::custom("refusing to serialize"))
        }
    }

    #[test]
    fn test_encode_sorts_keys() {
        let fields = LogFields::new().with("name", "a").with("age", 1);
        assert_eq!(encode(&fields).unwrap().unwrap(), r#"{"age":1,"name":"a"}"#);
    }

    #[test]
    fn test_empty_and_null_are_skipped() {
        assert_eq!(encode(&LogFields::new()).unwrap(), None);
        assert_eq!(encode(&Option::<LogFields>::None).unwrap(), None);
        assert_eq!(encode(&HashMap::<String, i32>::new()).unwrap(), None);
    }

    #[test]
    fn test_encode_failure() {
        assert!(encode(&Unserializable).is_err());

        let mut bad_keys = HashMap::new();
        bad_keys.insert((1, 2), "tuple keys are not JSON object keys");
        assert!(encode(&bad_keys).is_err());
    }

    #[test]
    fn test_from_iterator() {
        let fields: LogFields = vec![("id", 7), ("retries", 2)].into_iter().collect();
        assert_eq!(fields.get("id"), Some(&Value::from(7)));
    }
}
