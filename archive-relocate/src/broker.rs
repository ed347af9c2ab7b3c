//! Shared per-message context passed between pipeline stages.
//!
//! The host pipeline creates one [`Broker`] per consumed message, lets each
//! stage read and mutate it in turn, and drops it when the message is done.
//! Only one stage holds it at a time (`&mut Broker`), so no locking is done
//! here.

use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Key under which upstream stages store the source archive path.
pub const S3_PATH_KEY: &str = "s3_path";

/// Key under which upstream stages may store the cluster identifier.
pub const CLUSTER_ID_KEY: &str = "cluster_id";

/// Errors raised when a stage's preconditions on the broker are not met.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BrokerError {
    /// A key the stage depends on was never written upstream
    #[error("broker is missing required key '{0}'")]
    MissingKey(String),

    /// The key exists but holds a value of the wrong shape
    #[error("broker key '{key}' must be a string, found {found}")]
    NotAString { key: String, found: String },
}

/// Mutable key/value context for a single message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Broker {
    entries: BTreeMap<String, Value>,
}

impl Broker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Store a value, returning the one it replaced.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove a key, returning its value if it was present.
    pub fn delete(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Fetch a string value that upstream stages are required to have set.
    pub fn require_str(&self, key: &str) -> Result<&str, BrokerError> {
        match self.entries.get(key) {
            None => Err(BrokerError::MissingKey(key.to_string())),
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(BrokerError::NotAString {
                key: key.to_string(),
                found: value_kind(other).to_string(),
            }),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Broker {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_get_delete() {
        let mut broker = Broker::new();
        assert!(broker.is_empty());

        assert_eq!(broker.set("s3_path", "1/2/3"), None);
        assert_eq!(broker.get("s3_path"), Some(&json!("1/2/3")));
        assert!(broker.contains_key("s3_path"));

        assert_eq!(broker.set("s3_path", "4/5/6"), Some(json!("1/2/3")));
        assert_eq!(broker.delete("s3_path"), Some(json!("4/5/6")));
        assert_eq!(broker.delete("s3_path"), None);
        assert!(broker.is_empty());
    }

    #[test]
    fn test_require_str_missing_key() {
        let broker = Broker::new();
        assert_eq!(
            broker.require_str(S3_PATH_KEY),
            Err(BrokerError::MissingKey("s3_path".to_string()))
        );
    }

    #[test]
    fn test_require_str_wrong_type() {
        let mut broker = Broker::new();
        broker.set(S3_PATH_KEY, 42);
        let err = broker.require_str(S3_PATH_KEY).unwrap_err();
        assert_eq!(err.to_string(), "broker key 's3_path' must be a string, found number");
    }

    #[test]
    fn test_from_iterator_and_keys() {
        let broker: Broker = [("b", json!(1)), ("a", json!("x"))].into_iter().collect();
        assert_eq!(broker.len(), 2);
        assert_eq!(broker.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
