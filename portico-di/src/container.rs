//! Core container implementation

use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::binding::{Binding, BindingId, BindingMetadata};
use crate::error::{DiError, DiResult};
use crate::provider::ServiceProvider;
use crate::service::{Service, ServiceFactory, ServiceLifetime, ServiceType};

/// Thread-safe service container used during registration
pub struct ServiceContainer {
    /// All bindings by id
    bindings: RwLock<HashMap<BindingId, Binding>>,
    /// Binding ids per service type, in registration order
    by_service: RwLock<HashMap<TypeId, Vec<BindingId>>>,
    /// Singleton instances by binding
    singletons: RwLock<HashMap<BindingId, Arc<dyn Service>>>,
    next_id: AtomicU64,
}

impl ServiceContainer {
    /// Create a new service container
    pub fn new() -> Self {
        Self {
            bindings: RwLock::new(HashMap::new()),
            by_service: RwLock::new(HashMap::new()),
            singletons: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a binding and return its id
    pub fn register(
        &self,
        service: ServiceType,
        implementation_type_name: &'static str,
        lifetime: ServiceLifetime,
        metadata: BindingMetadata,
        factory: ServiceFactory,
    ) -> BindingId {
        let id = BindingId(self.next_id.fetch_add(1, Ordering::Relaxed));
        trace!(
            "Registering {} binding {} for {} as {:?}",
            lifetime,
            id,
            service,
            metadata.name()
        );

        let binding = Binding {
            id,
            service,
            implementation_type_name,
            lifetime,
            metadata,
            factory,
        };

        self.bindings.write().insert(id, binding);
        self.by_service
            .write()
            .entry(service.id())
            .or_default()
            .push(id);
        id
    }

    /// Build an immutable container
    pub fn build(self) -> Container {
        Container {
            inner: Arc::new(self),
            scoped: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for ServiceContainer {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable service container
///
/// Cloning is cheap and shares both registrations and cached instances.
/// [`Container::create_scope`] shares registrations and singletons but starts
/// with an empty cache for scoped bindings.
#[derive(Clone)]
pub struct Container {
    inner: Arc<ServiceContainer>,
    scoped: Arc<RwLock<HashMap<BindingId, Arc<dyn Service>>>>,
}

impl Container {
    /// Create a new container builder
    pub fn builder() -> crate::builder::ContainerBuilder {
        crate::builder::ContainerBuilder::new()
    }

    /// Create a scope with its own scoped instances
    pub fn create_scope(&self) -> Container {
        Container {
            inner: self.inner.clone(),
            scoped: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Resolve the unnamed binding of `T` returning a cloned instance
    pub fn resolve<T: Service + Clone>(&self) -> DiResult<T> {
        self.resolve_arc::<T>().map(|service| (*service).clone())
    }

    /// Resolve the unnamed binding of `T` returning an Arc
    pub fn resolve_arc<T: Service>(&self) -> DiResult<Arc<T>> {
        let instance = self.get(ServiceType::of::<T>(), None)?;
        downcast::<T>(instance)
    }

    /// Resolve the single binding of `T` registered under `name`
    pub fn resolve_named<T: Service>(&self, name: &str) -> DiResult<Arc<T>> {
        let instance = self.get(ServiceType::of::<T>(), Some(name))?;
        downcast::<T>(instance)
    }

    /// Resolve every binding of `T` registered under `name` (`None` meaning unnamed)
    pub fn resolve_all<T: Service>(&self, name: Option<&str>) -> DiResult<Vec<Arc<T>>> {
        self.get_all(ServiceType::of::<T>(), name)?
            .into_iter()
            .map(downcast::<T>)
            .collect()
    }

    /// Resolve the single binding of `service` registered under `name`
    ///
    /// Fails when no binding or more than one binding matches.
    pub fn get(&self, service: ServiceType, name: Option<&str>) -> DiResult<Arc<dyn Service>> {
        let mut matching = self.matching(service, name);
        match matching.len() {
            0 => Err(DiError::ServiceNotFound {
                service_type: service.name().to_string(),
                name: name.map(str::to_string),
            }),
            1 => {
                let binding = matching.remove(0);
                self.activate(&binding)
            }
            count => Err(DiError::AmbiguousBinding {
                service_type: service.name().to_string(),
                name: name.map(str::to_string),
                count,
            }),
        }
    }

    /// Resolve all bindings of `service` registered under `name`, in registration order
    pub fn get_all(
        &self,
        service: ServiceType,
        name: Option<&str>,
    ) -> DiResult<Vec<Arc<dyn Service>>> {
        self.matching(service, name)
            .iter()
            .map(|binding| self.activate(binding))
            .collect()
    }

    /// Snapshot of the bindings registered for a service type, in registration order
    pub fn bindings(&self, service: TypeId) -> Vec<Binding> {
        let by_service = self.inner.by_service.read();
        let Some(ids) = by_service.get(&service) else {
            return Vec::new();
        };

        let bindings = self.inner.bindings.read();
        ids.iter()
            .filter_map(|id| bindings.get(id).cloned())
            .collect()
    }

    /// Resolve exactly the binding identified by `id`
    pub fn resolve_binding(&self, id: BindingId) -> DiResult<Arc<dyn Service>> {
        let binding = self
            .inner
            .bindings
            .read()
            .get(&id)
            .cloned()
            .ok_or(DiError::BindingNotFound(id))?;
        self.activate(&binding)
    }

    fn matching(&self, service: ServiceType, name: Option<&str>) -> Vec<Binding> {
        self.bindings(service.id())
            .into_iter()
            .filter(|binding| binding.metadata.matches_name(name))
            .collect()
    }

    /// Produce an instance for a binding according to its lifetime
    fn activate(&self, binding: &Binding) -> DiResult<Arc<dyn Service>> {
        let cache = match binding.lifetime {
            ServiceLifetime::Transient => None,
            ServiceLifetime::Singleton => Some(&self.inner.singletons),
            ServiceLifetime::Scoped => Some(&*self.scoped),
        };

        let Some(cache) = cache else {
            debug!("Creating transient {} from binding {}", binding.service, binding.id);
            return (binding.factory)(self);
        };

        if let Some(instance) = cache.read().get(&binding.id).cloned() {
            return Ok(instance);
        }

        // The factory may resolve other services, so it runs without holding the lock
        debug!(
            "Creating {} {} from binding {}",
            binding.lifetime, binding.service, binding.id
        );
        let instance = (binding.factory)(self)?;
        Ok(cache
            .write()
            .entry(binding.id)
            .or_insert(instance)
            .clone())
    }
}

fn downcast<T: Service>(instance: Arc<dyn Service>) -> DiResult<Arc<T>> {
    let actual = Service::type_name(&*instance);
    instance.downcast_arc::<T>().map_err(|_| DiError::TypeMismatch {
        expected: std::any::type_name::<T>(),
        actual,
    })
}

impl ServiceProvider for Container {
    fn has_service_by_type_id(&self, type_id: TypeId) -> bool {
        self.inner
            .by_service
            .read()
            .get(&type_id)
            .map_or(false, |ids| !ids.is_empty())
    }

    fn has_named_service_by_type_id(&self, type_id: TypeId, name: &str) -> bool {
        self.bindings(type_id)
            .iter()
            .any(|binding| binding.metadata.matches_name(Some(name)))
    }
}

impl Default for Container {
    fn default() -> Self {
        Container::builder().build()
    }
}
