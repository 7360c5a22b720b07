//! [`BindingRegistry`] over the portico-di container

use downcast_rs::DowncastSync;
use portico_di::{Binding, BindingBuilder, Container, DiError, ServiceType};
use serde_json::Value;
use std::collections::HashMap;

use crate::contract::EXPORT_METADATA_KEY;
use crate::error::{ExportError, Result};
use crate::metadata::Metadata;
use crate::registry::{BindingRegistry, Instance, RegisteredBinding};

impl RegisteredBinding for Binding {
    fn name(&self) -> Option<&str> {
        Some(self.metadata().raw_name())
    }

    /// Accepts a [`Metadata`] value, a JSON object (the form produced by
    /// configuration files) or a `HashMap<String, Value>`
    fn export_metadata(&self) -> Result<Option<Metadata>> {
        let bag = self.metadata();
        if !bag.contains_key(EXPORT_METADATA_KEY) {
            return Ok(None);
        }

        if let Some(metadata) = bag.get::<Metadata>(EXPORT_METADATA_KEY) {
            return Ok(Some(metadata.clone()));
        }
        if let Some(entries) = bag.get::<HashMap<String, Value>>(EXPORT_METADATA_KEY) {
            return Ok(Some(Metadata::from(entries.clone())));
        }

        let reason = match bag.get::<Value>(EXPORT_METADATA_KEY) {
            Some(Value::Object(map)) => return Ok(Some(Metadata::from(map.clone()))),
            Some(other) => format!("expected a JSON object, found {}", json_kind(other)),
            None => "expected Metadata, a JSON object or a map of JSON values".to_string(),
        };
        Err(ExportError::InvalidExportMetadata {
            binding: format!("{} binding {}", self.service(), self.id()),
            reason,
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl BindingRegistry for Container {
    type Binding = Binding;

    fn bindings(&self, service: ServiceType) -> Vec<Binding> {
        Container::bindings(self, service.id())
    }

    fn resolve_binding(&self, binding: &Binding) -> Result<Instance> {
        let instance = Container::resolve_binding(self, binding.id())?;
        Ok(DowncastSync::into_any_arc(instance))
    }

    fn resolve(&self, service: ServiceType, contract: Option<&str>) -> Result<Instance> {
        let instance = self
            .get(service, contract)
            .map_err(|e| lookup_error(service, contract, e))?;
        Ok(DowncastSync::into_any_arc(instance))
    }

    fn resolve_all(&self, service: ServiceType, contract: Option<&str>) -> Result<Vec<Instance>> {
        let instances = self
            .get_all(service, contract)
            .map_err(|e| lookup_error(service, contract, e))?;
        Ok(instances.into_iter().map(DowncastSync::into_any_arc).collect())
    }
}

fn lookup_error(service: ServiceType, contract: Option<&str>, error: DiError) -> ExportError {
    match error {
        DiError::ServiceNotFound { .. } => ExportError::not_found(service.name(), contract),
        DiError::AmbiguousBinding { count, .. } => {
            ExportError::ambiguous(service.name(), contract, count)
        }
        other => ExportError::Container(other),
    }
}

/// Export-related shorthands for [`BindingBuilder`]
pub trait ExportBindingExt: Sized {
    /// Attach the metadata surfaced on exports of this binding
    fn export_metadata(self, metadata: Metadata) -> Self;

    /// Name the binding after `contract` and record the contract name in its export metadata
    fn exported_as(self, contract: &str) -> Self;
}

impl<'a> ExportBindingExt for BindingBuilder<'a> {
    fn export_metadata(self, metadata: Metadata) -> Self {
        self.with_metadata(EXPORT_METADATA_KEY, metadata)
    }

    fn exported_as(self, contract: &str) -> Self {
        self.named(contract)
            .export_metadata(Metadata::for_contract(contract))
    }
}
