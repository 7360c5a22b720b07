//! Export metadata
//!
//! Metadata is an immutable string-keyed map of JSON values. Cloning shares
//! the underlying map.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::contract::CONTRACT_NAME_KEY;
use crate::error::{ExportError, Result};

/// Immutable key/value metadata attached to an export
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    entries: Arc<HashMap<String, Value>>,
}

impl Metadata {
    /// Metadata with no entries
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> MetadataBuilder {
        MetadataBuilder::default()
    }

    /// Default metadata of an export registered under a contract name
    pub fn for_contract(contract_name: &str) -> Self {
        Self::builder()
            .with(CONTRACT_NAME_KEY, contract_name)
            .build()
    }

    /// Value stored under `key`
    pub fn get(&self, key: &str) -> Result<&Value> {
        self.entries
            .get(key)
            .ok_or_else(|| ExportError::MetadataKeyNotFound {
                key: key.to_string(),
            })
    }

    /// Value stored under `key`, if any
    pub fn try_get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Value stored under `key`, deserialized into `T`
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self.get(key)?;
        T::deserialize(value).map_err(|e| ExportError::MetadataView {
            view: std::any::type_name::<T>(),
            key: key.to_string(),
            reason: e.to_string(),
        })
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

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl From<HashMap<String, Value>> for Metadata {
    fn from(entries: HashMap<String, Value>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }
}

impl From<Map<String, Value>> for Metadata {
    fn from(entries: Map<String, Value>) -> Self {
        entries.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect::<HashMap<_, _>>();
        Self::from(entries)
    }
}

/// Fluent construction of [`Metadata`]
#[derive(Debug, Default)]
pub struct MetadataBuilder {
    entries: HashMap<String, Value>,
}

impl MetadataBuilder {
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Metadata {
        Metadata::from(self.entries)
    }
}
