//! Container builder for fluent configuration

use std::any::Any;

use crate::binding::{BindingId, BindingMetadata};
use crate::container::{Container, ServiceContainer};
use crate::error::DiResult;
use crate::service::{erase_factory, Service, ServiceFactory, ServiceLifetime, ServiceType};

/// Builder for constructing a service container
pub struct ContainerBuilder {
    container: ServiceContainer,
}

impl ContainerBuilder {
    /// Create a new container builder
    pub fn new() -> Self {
        Self {
            container: ServiceContainer::new(),
        }
    }

    /// Register an unnamed singleton service
    pub fn register_singleton<T>(
        &mut self,
        factory: impl Fn() -> T + Send + Sync + 'static,
    ) -> &mut Self
    where
        T: Service,
    {
        self.bind_singleton(move |_| factory()).register();
        self
    }

    /// Register an unnamed transient service
    pub fn register_transient<T>(
        &mut self,
        factory: impl Fn() -> T + Send + Sync + 'static,
    ) -> &mut Self
    where
        T: Service,
    {
        self.bind_transient(move |_| factory()).register();
        self
    }

    /// Register an unnamed scoped service
    pub fn register_scoped<T>(
        &mut self,
        factory: impl Fn() -> T + Send + Sync + 'static,
    ) -> &mut Self
    where
        T: Service,
    {
        self.bind_scoped(move |_| factory()).register();
        self
    }

    /// Register an existing instance as an unnamed singleton
    pub fn register_instance<T>(&mut self, instance: T) -> &mut Self
    where
        T: Service + Clone,
    {
        self.register_singleton(move || instance.clone())
    }

    /// Start a binding of `T` whose factory may resolve other services
    pub fn bind<T, F>(&mut self, lifetime: ServiceLifetime, factory: F) -> BindingBuilder<'_>
    where
        T: Service,
        F: Fn(&Container) -> T + Send + Sync + 'static,
    {
        self.try_bind(lifetime, move |container| Ok(factory(container)))
    }

    /// Start a binding of `T` with a fallible factory
    pub fn try_bind<T, F>(&mut self, lifetime: ServiceLifetime, factory: F) -> BindingBuilder<'_>
    where
        T: Service,
        F: Fn(&Container) -> DiResult<T> + Send + Sync + 'static,
    {
        BindingBuilder {
            container: &self.container,
            service: ServiceType::of::<T>(),
            implementation_type_name: std::any::type_name::<T>(),
            lifetime,
            metadata: BindingMetadata::new(),
            factory: erase_factory(factory),
        }
    }

    pub fn bind_singleton<T, F>(&mut self, factory: F) -> BindingBuilder<'_>
    where
        T: Service,
        F: Fn(&Container) -> T + Send + Sync + 'static,
    {
        self.bind(ServiceLifetime::Singleton, factory)
    }

    pub fn bind_transient<T, F>(&mut self, factory: F) -> BindingBuilder<'_>
    where
        T: Service,
        F: Fn(&Container) -> T + Send + Sync + 'static,
    {
        self.bind(ServiceLifetime::Transient, factory)
    }

    pub fn bind_scoped<T, F>(&mut self, factory: F) -> BindingBuilder<'_>
    where
        T: Service,
        F: Fn(&Container) -> T + Send + Sync + 'static,
    {
        self.bind(ServiceLifetime::Scoped, factory)
    }

    /// Start a binding from an already type-erased factory
    ///
    /// The factory must produce instances of `service`; resolution through a
    /// typed API reports [`crate::DiError::TypeMismatch`] otherwise.
    pub fn bind_erased(
        &mut self,
        service: ServiceType,
        lifetime: ServiceLifetime,
        factory: ServiceFactory,
    ) -> BindingBuilder<'_> {
        BindingBuilder {
            container: &self.container,
            service,
            implementation_type_name: service.name(),
            lifetime,
            metadata: BindingMetadata::new(),
            factory,
        }
    }

    /// Build the container
    pub fn build(self) -> Container {
        self.container.build()
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Extension methods for fluent builder pattern
impl ContainerBuilder {
    /// Add multiple services using a configuration function
    pub fn add_services<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        configure(&mut self);
        self
    }

    /// Add services from another module
    pub fn add_module<M: Module>(mut self, module: M) -> Self {
        module.configure(&mut self);
        self
    }
}

/// Trait for service modules
pub trait Module {
    /// Configure services for this module
    fn configure(&self, builder: &mut ContainerBuilder);
}

/// A binding under construction; nothing is registered until [`BindingBuilder::register`]
#[must_use = "bindings are only added to the container by calling `register`"]
pub struct BindingBuilder<'a> {
    container: &'a ServiceContainer,
    service: ServiceType,
    implementation_type_name: &'static str,
    lifetime: ServiceLifetime,
    metadata: BindingMetadata,
    factory: ServiceFactory,
}

impl<'a> BindingBuilder<'a> {
    /// Register the binding under an explicit name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.metadata.set_name(name);
        self
    }

    /// Attach a metadata value under `key`
    pub fn with_metadata<V: Any + Send + Sync>(mut self, key: impl Into<String>, value: V) -> Self {
        self.metadata.set(key, value);
        self
    }

    /// The metadata collected so far
    pub fn metadata(&self) -> &BindingMetadata {
        &self.metadata
    }

    pub fn register(self) -> BindingId {
        self.container.register(
            self.service,
            self.implementation_type_name,
            self.lifetime,
            self.metadata,
            self.factory,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_builder_collects_metadata() {
        let mut builder = ContainerBuilder::new();
        let id = builder
            .bind_singleton(|_| 5u8)
            .named("five")
            .with_metadata("weight", 2.5f64)
            .register();
        let container = builder.build();

        let bindings = container.bindings(std::any::TypeId::of::<u8>());
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].id(), id);
        assert_eq!(bindings[0].metadata().name(), Some("five"));
        assert_eq!(bindings[0].metadata().get::<f64>("weight"), Some(&2.5));
        assert_eq!(bindings[0].lifetime(), ServiceLifetime::Singleton);
    }

    #[test]
    fn test_module_registration() {
        struct Numbers;

        impl Module for Numbers {
            fn configure(&self, builder: &mut ContainerBuilder) {
                builder.register_instance(11u64);
            }
        }

        let container = ContainerBuilder::new().add_module(Numbers).build();
        assert_eq!(container.resolve::<u64>().unwrap(), 11);
    }
}
