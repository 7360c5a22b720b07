//! Configuration-based dependency injection

use crate::builder::ContainerBuilder;
use crate::error::{DiError, DiResult};
use crate::registry::{RegistryContainerBuilderExt, ServiceRegistry};
use crate::service::ServiceLifetime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Binding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingConfig {
    /// Service type name, as known to the [`ServiceRegistry`]
    pub service_type: String,
    /// Binding name; omitted for the unnamed binding
    #[serde(default)]
    pub name: Option<String>,
    /// Service lifetime
    pub lifetime: ServiceLifetimeConfig,
    /// Metadata entries, stored on the binding as `serde_json::Value`
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Service lifetime configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceLifetimeConfig {
    Transient,
    Scoped,
    Singleton,
}

impl From<ServiceLifetimeConfig> for ServiceLifetime {
    fn from(config: ServiceLifetimeConfig) -> Self {
        match config {
            ServiceLifetimeConfig::Transient => ServiceLifetime::Transient,
            ServiceLifetimeConfig::Scoped => ServiceLifetime::Scoped,
            ServiceLifetimeConfig::Singleton => ServiceLifetime::Singleton,
        }
    }
}

/// Container configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// Binding configurations
    #[serde(default)]
    pub bindings: Vec<BindingConfig>,
}

impl ContainerConfig {
    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> DiResult<Self> {
        toml::from_str(toml_str)
            .map_err(|e| DiError::ConfigError(format!("Failed to parse TOML: {}", e)))
    }

    /// Load configuration from JSON string
    pub fn from_json(json_str: &str) -> DiResult<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| DiError::ConfigError(format!("Failed to parse JSON: {}", e)))
    }

    /// Apply configuration to a container builder
    ///
    /// Every service type is checked against the registry before anything is
    /// registered, so a failed apply leaves the builder untouched.
    pub fn apply_to_builder(
        &self,
        registry: &ServiceRegistry,
        builder: &mut ContainerBuilder,
    ) -> DiResult<()> {
        if let Some(unknown) = self
            .bindings
            .iter()
            .find(|binding| !registry.contains(&binding.service_type))
        {
            return Err(DiError::ConfigError(format!(
                "Unknown service type: {}",
                unknown.service_type
            )));
        }

        for config in &self.bindings {
            debug!(
                "Applying configured binding {} ({:?})",
                config.service_type, config.name
            );
            let mut binding =
                builder.bind_registered(registry, &config.service_type, config.lifetime.into())?;
            if let Some(name) = &config.name {
                binding = binding.named(name.clone());
            }
            for (key, value) in &config.metadata {
                binding = binding.with_metadata(key.clone(), value.clone());
            }
            binding.register();
        }

        Ok(())
    }
}

/// Configuration builder with validation
pub struct ConfigBuilder {
    bindings: Vec<BindingConfig>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Add a binding configuration
    pub fn add_binding(&mut self, config: BindingConfig) -> &mut Self {
        self.bindings.push(config);
        self
    }

    /// Build the configuration, rejecting empty service type names
    pub fn build(self) -> DiResult<ContainerConfig> {
        if let Some(position) = self
            .bindings
            .iter()
            .position(|binding| binding.service_type.trim().is_empty())
        {
            return Err(DiError::ConfigError(format!(
                "Binding {} has an empty service type",
                position
            )));
        }

        Ok(ContainerConfig {
            bindings: self.bindings,
        })
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// Example configuration file format:
// ```toml
// [[bindings]]
// service_type = "ConsoleLogger"
// lifetime = "singleton"
//
// [[bindings]]
// service_type = "ConsoleLogger"
// name = "audit"
// lifetime = "transient"
//
// [bindings.metadata.ExportMetadata]
// ContractName = "audit"
// ```

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml() {
        let config = ContainerConfig::from_toml(
            r#"
            [[bindings]]
            service_type = "Logger"
            lifetime = "singleton"

            [[bindings]]
            service_type = "Logger"
            name = "audit"
            lifetime = "transient"

            [bindings.metadata]
            level = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.bindings.len(), 2);
        assert_eq!(config.bindings[0].name, None);
        assert_eq!(config.bindings[1].name.as_deref(), Some("audit"));
        assert_eq!(config.bindings[1].lifetime, ServiceLifetimeConfig::Transient);
        assert_eq!(config.bindings[1].metadata["level"], serde_json::json!(3));
    }

    #[test]
    fn test_parse_json_rejects_bad_lifetime() {
        let result = ContainerConfig::from_json(
            r#"{ "bindings": [ { "service_type": "Logger", "lifetime": "forever" } ] }"#,
        );
        assert!(matches!(result, Err(DiError::ConfigError(_))));
    }

    #[test]
    fn test_config_builder_validation() {
        let mut builder = ConfigBuilder::new();
        builder.add_binding(BindingConfig {
            service_type: " ".to_string(),
            name: None,
            lifetime: ServiceLifetimeConfig::Transient,
            metadata: HashMap::new(),
        });
        assert!(builder.build().is_err());
    }
}
