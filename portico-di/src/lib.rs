//! Dependency injection container for Portico
//!
//! This crate provides a lightweight, thread-safe container where a service
//! type may have several bindings. Bindings are told apart by an optional
//! name and carry a free-form metadata bag; each one has a [`BindingId`] so it
//! can be resolved on its own even when siblings share its type and name.
//!
//! The export layer in `portico-exports` builds on the introspection API
//! ([`Container::bindings`], [`Container::resolve_binding`]).

pub mod binding;
pub mod builder;
pub mod container;
pub mod error;
pub mod provider;
pub mod service;

#[cfg(feature = "config")]
pub mod config;

#[cfg(feature = "config")]
pub mod registry;

pub use binding::{Binding, BindingId, BindingMetadata, DEFAULT_BINDING_NAME};
pub use builder::{BindingBuilder, ContainerBuilder, Module};
pub use container::{Container, ServiceContainer};
pub use error::{DiError, DiResult};
pub use provider::ServiceProvider;
pub use service::{Service, ServiceFactory, ServiceLifetime, ServiceType};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::{
        Container, ContainerBuilder, DiError, DiResult, Module, Service, ServiceLifetime,
        ServiceProvider, ServiceType,
    };
}
