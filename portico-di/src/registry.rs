//! Service registry for configuration-based dependency injection

use crate::builder::ContainerBuilder;
use crate::container::Container;
use crate::error::{DiError, DiResult};
use crate::service::{erase_factory, Service, ServiceFactory, ServiceType};
use std::collections::HashMap;

/// A factory known under a configuration type name
#[derive(Clone)]
pub struct RegisteredType {
    pub service: ServiceType,
    pub factory: ServiceFactory,
}

/// Maps configuration type names to typed factories
///
/// Each application builds its own registry; there is no process-wide instance.
#[derive(Clone, Default)]
pub struct ServiceRegistry {
    types: HashMap<String, RegisteredType>,
}

impl ServiceRegistry {
    /// Create a new service registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for `T` under a type name
    pub fn register_factory<T, F>(&mut self, type_name: &str, factory: F) -> &mut Self
    where
        T: Service,
        F: Fn(&Container) -> T + Send + Sync + 'static,
    {
        self.types.insert(
            type_name.to_string(),
            RegisteredType {
                service: ServiceType::of::<T>(),
                factory: erase_factory(move |container| Ok(factory(container))),
            },
        );
        self
    }

    /// Look up the factory registered under a type name
    pub fn get(&self, type_name: &str) -> DiResult<&RegisteredType> {
        self.types
            .get(type_name)
            .ok_or_else(|| DiError::ConfigError(format!("Unknown service type: {}", type_name)))
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }
}

/// Macro to register services in a registry
#[macro_export]
macro_rules! register_services {
    ($registry:expr, $($service_type:ty => $factory:expr),* $(,)?) => {
        {
            let registry: &mut $crate::registry::ServiceRegistry = &mut $registry;
            $(
                registry.register_factory::<$service_type, _>(stringify!($service_type), $factory);
            )*
        }
    };
}

/// Extension trait for ContainerBuilder to use a registry
pub trait RegistryContainerBuilderExt {
    /// Start a binding for a type known to the registry
    fn bind_registered(
        &mut self,
        registry: &ServiceRegistry,
        type_name: &str,
        lifetime: crate::service::ServiceLifetime,
    ) -> DiResult<crate::builder::BindingBuilder<'_>>;
}

impl RegistryContainerBuilderExt for ContainerBuilder {
    fn bind_registered(
        &mut self,
        registry: &ServiceRegistry,
        type_name: &str,
        lifetime: crate::service::ServiceLifetime,
    ) -> DiResult<crate::builder::BindingBuilder<'_>> {
        let registered = registry.get(type_name)?;
        Ok(self.bind_erased(registered.service, lifetime, registered.factory.clone()))
    }
}
