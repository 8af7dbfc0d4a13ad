//! Per-request property bag shared by every middleware in a chain.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Key under which the dispatch stores the request id.
pub const REQUEST_ID: &str = "requestId";

/// Request-scoped key/value bag.
///
/// Created fresh for every dispatch and dropped when it returns. Matched
/// path parameters are merged in as string values, so a handler for
/// `/movies/:id` reads `props.get_str("id")`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    values: HashMap<String, Value>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Store any serializable value. Fails if it cannot be represented as
    /// JSON; the bag is left unchanged in that case.
    pub fn insert_serialized<T: Serialize + ?Sized>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> serde_json::Result<()> {
        let value = serde_json::to_value(value)?;
        self.values.insert(key.into(), value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// String value stored under `key`, if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Deserialize the value under `key` into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// The id assigned to this request by the dispatch.
    pub fn request_id(&self) -> Option<&str> {
        self.get_str(REQUEST_ID)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn merge_params(&mut self, params: crate::routing::matcher::Params) {
        for (name, value) in params {
            self.values.insert(name, Value::String(value));
        }
    }
}
