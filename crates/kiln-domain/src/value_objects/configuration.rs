//! Configuration source
//!
//! Free-form settings resolved by the host and handed, read-only, to every
//! startup configuration. Nested values are addressed with dotted paths
//! (`"storage.path"`).

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Resolved settings passed through the configuration pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationSource {
    values: Map<String, Value>,
}

impl ConfigurationSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source from a JSON object
    pub fn from_map(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Set a top-level value
    pub fn with_value<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Raw value at a dotted path
    pub fn value(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.values.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Deserialize the value at a dotted path
    ///
    /// Returns `Ok(None)` when the path is absent and an error when the value
    /// has the wrong shape.
    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        match self.value(path) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// String value at a dotted path
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.value(path).and_then(Value::as_str)
    }

    /// Nested object at a dotted path as its own source
    pub fn section(&self, path: &str) -> Self {
        self.value(path)
            .and_then(Value::as_object)
            .cloned()
            .map(Self::from_map)
            .unwrap_or_default()
    }

    /// Whether a value exists at a dotted path
    pub fn contains(&self, path: &str) -> bool {
        self.value(path).is_some()
    }

    /// Top-level keys
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Whether the source holds no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Map<String, Value>> for ConfigurationSource {
    fn from(values: Map<String, Value>) -> Self {
        Self::from_map(values)
    }
}
