//! Bindings: one registration of a service type

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::service::{ServiceFactory, ServiceLifetime, ServiceType};

/// Name given to bindings registered without an explicit name.
///
/// Unnamed bindings are stored under this name so every binding carries one;
/// [`BindingMetadata::name`] translates it back to `None`.
pub const DEFAULT_BINDING_NAME: &str = "71751FFE-46C5-465A-9F50-6AEFD1C14232";

/// Identity of a single binding within a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub(crate) u64);

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Name and free-form metadata attached to a binding
#[derive(Clone)]
pub struct BindingMetadata {
    name: String,
    entries: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl BindingMetadata {
    /// Metadata for an unnamed binding
    pub fn new() -> Self {
        Self {
            name: DEFAULT_BINDING_NAME.to_string(),
            entries: HashMap::new(),
        }
    }

    /// The stored name, including [`DEFAULT_BINDING_NAME`] for unnamed bindings
    pub fn raw_name(&self) -> &str {
        &self.name
    }

    /// The explicit name, if one was given
    pub fn name(&self) -> Option<&str> {
        if self.name == DEFAULT_BINDING_NAME {
            None
        } else {
            Some(&self.name)
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Whether the binding is registered under `name` (`None` meaning unnamed)
    pub fn matches_name(&self, name: Option<&str>) -> bool {
        self.name == name.unwrap_or(DEFAULT_BINDING_NAME)
    }

    /// Store a value under `key`, replacing any previous one
    pub fn set<V: Any + Send + Sync>(&mut self, key: impl Into<String>, value: V) {
        self.entries.insert(key.into(), Arc::new(value));
    }

    /// Typed lookup; `None` when the key is absent or holds another type
    pub fn get<V: Any>(&self, key: &str) -> Option<&V> {
        self.entries.get(key).and_then(|value| value.downcast_ref::<V>())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Default for BindingMetadata {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BindingMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.keys().collect();
        keys.sort_unstable();
        f.debug_struct("BindingMetadata")
            .field("name", &self.name())
            .field("keys", &keys)
            .finish()
    }
}

/// A registration of a service type: lifetime, factory, name and metadata
#[derive(Clone)]
pub struct Binding {
    pub(crate) id: BindingId,
    pub(crate) service: ServiceType,
    pub(crate) implementation_type_name: &'static str,
    pub(crate) lifetime: ServiceLifetime,
    pub(crate) metadata: BindingMetadata,
    pub(crate) factory: ServiceFactory,
}

impl Binding {
    pub fn id(&self) -> BindingId {
        self.id
    }

    pub fn service(&self) -> ServiceType {
        self.service
    }

    pub fn implementation_type_name(&self) -> &'static str {
        self.implementation_type_name
    }

    pub fn lifetime(&self) -> ServiceLifetime {
        self.lifetime
    }

    pub fn metadata(&self) -> &BindingMetadata {
        &self.metadata
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("id", &self.id)
            .field("service", &self.service)
            .field("implementation_type", &self.implementation_type_name)
            .field("lifetime", &self.lifetime)
            .field("metadata", &self.metadata)
            .finish()
    }
}
