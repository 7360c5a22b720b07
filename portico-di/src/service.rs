//! Service definitions and lifetimes

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use downcast_rs::{impl_downcast, DowncastSync};

use crate::container::Container;
use crate::error::DiResult;

/// Service lifetime determines how services are created and cached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceLifetime {
    /// A new instance is created for each request
    Transient,
    /// A single instance is created and reused within a scope
    Scoped,
    /// A single instance is created and reused for the container lifetime
    Singleton,
}

impl fmt::Display for ServiceLifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceLifetime::Transient => write!(f, "Transient"),
            ServiceLifetime::Scoped => write!(f, "Scoped"),
            ServiceLifetime::Singleton => write!(f, "Singleton"),
        }
    }
}

/// Trait that all services must implement
pub trait Service: DowncastSync {
    /// Get the type name of the service
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl_downcast!(sync Service);

/// Blanket implementation for all suitable types
impl<T: Any + Send + Sync> Service for T {}

/// Type token identifying a service by its `TypeId`, carrying the type name for diagnostics
#[derive(Clone, Copy)]
pub struct ServiceType {
    id: TypeId,
    name: &'static str,
}

impl ServiceType {
    /// Token for the static type `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ServiceType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ServiceType {}

impl Hash for ServiceType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ServiceType").field(&self.name).finish()
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Type-erased factory stored on a binding
pub type ServiceFactory = Arc<dyn Fn(&Container) -> DiResult<Arc<dyn Service>> + Send + Sync>;

/// Erase a typed, fallible factory
pub fn erase_factory<T, F>(factory: F) -> ServiceFactory
where
    T: Service,
    F: Fn(&Container) -> DiResult<T> + Send + Sync + 'static,
{
    Arc::new(move |container| {
        factory(container).map(|service| Arc::new(service) as Arc<dyn Service>)
    })
}
