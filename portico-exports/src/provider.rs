//! The export provider façade

use portico_di::ServiceType;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::contract::normalize_requested;
use crate::error::{ExportError, Result};
use crate::export::{AnyExport, Export, ExportWithView};
use crate::metadata::Metadata;
use crate::registry::{BindingRegistry, Instance, RegisteredBinding};
use crate::view::ViewRegistry;

/// A registered export described without resolving it
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub service: ServiceType,
    /// Normalized contract name
    pub contract_name: Option<String>,
    /// Export metadata stored on the binding
    pub metadata: Option<Metadata>,
}

/// Resolves services by type, contract name and metadata over a [`BindingRegistry`]
///
/// Every entry point folds an empty contract name and the container's
/// default-name sentinel into "no contract" before matching. The provider
/// keeps no state besides the registry and the views it was configured with;
/// exports are created fresh on every call.
pub struct ExportProvider<R> {
    registry: Arc<R>,
    views: Arc<ViewRegistry>,
}

impl<R: BindingRegistry> ExportProvider<R> {
    /// Create a provider without metadata views
    pub fn new(registry: R) -> Self {
        Self::with_views(registry, ViewRegistry::new())
    }

    /// Create a provider that can project into the registered views
    pub fn with_views(registry: R, views: ViewRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            views: Arc::new(views),
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn views(&self) -> &ViewRegistry {
        &self.views
    }

    /// The single export of `T` for the contract
    ///
    /// Fails with [`ExportError::Resolution`] when zero or several bindings match.
    pub fn get_exported_value<T: Send + Sync + 'static>(
        &self,
        contract: Option<&str>,
    ) -> Result<Arc<T>> {
        let service = ServiceType::of::<T>();
        let contract = normalize_requested(contract);
        trace!("Resolving {} with contract {:?}", service, contract);

        let instance = self.registry.resolve(service, contract)?;
        downcast::<T>(instance)
    }

    /// The single export of `T` for the contract, or `None` unless exactly one binding matches
    ///
    /// Several matches yield `None`, not the first match. Errors raised while
    /// constructing the single match are still returned.
    pub fn get_exported_value_or_default<T: Send + Sync + 'static>(
        &self,
        contract: Option<&str>,
    ) -> Result<Option<Arc<T>>> {
        self.single_or_none::<T>(contract)
    }

    /// Found/value lookup: `Some` exactly when one binding matches
    ///
    /// Same matching and result as [`ExportProvider::get_exported_value_or_default`];
    /// both names are kept so callers can use either the default-value or the
    /// try-get spelling.
    pub fn try_get_exported_value<T: Send + Sync + 'static>(
        &self,
        contract: Option<&str>,
    ) -> Result<Option<Arc<T>>> {
        self.single_or_none::<T>(contract)
    }

    /// Every export of `T` for the contract, in registration order
    pub fn get_exported_values<T: Send + Sync + 'static>(
        &self,
        contract: Option<&str>,
    ) -> Result<Vec<Arc<T>>> {
        self.get_exported_values_of(ServiceType::of::<T>(), contract)?
            .into_iter()
            .map(downcast::<T>)
            .collect()
    }

    /// Every export of `service` for the contract, in registration order
    pub fn get_exported_values_of(
        &self,
        service: ServiceType,
        contract: Option<&str>,
    ) -> Result<Vec<Instance>> {
        let contract = normalize_requested(contract);
        let values = self.registry.resolve_all(service, contract)?;
        debug!(
            "Resolved {} value(s) of {} with contract {:?}",
            values.len(),
            service,
            contract
        );
        Ok(values)
    }

    /// Lazy exports of `service` for the contract
    ///
    /// Fails when a matching binding carries export metadata that cannot be read.
    pub fn get_exports_of(
        &self,
        service: ServiceType,
        contract: Option<&str>,
    ) -> Result<Vec<AnyExport>> {
        self.matching(service, contract)
            .into_iter()
            .map(|binding| {
                let registry = Arc::clone(&self.registry);
                let metadata = binding.export_metadata()?;
                Ok(Export::new(
                    move || registry.resolve_binding(&binding),
                    metadata,
                ))
            })
            .collect()
    }

    /// Lazy typed exports of `T` for the contract
    ///
    /// Fails when a matching binding carries export metadata that cannot be read.
    pub fn get_exports<T: Send + Sync + 'static>(
        &self,
        contract: Option<&str>,
    ) -> Result<Vec<Export<T>>> {
        self.matching(ServiceType::of::<T>(), contract)
            .into_iter()
            .map(|binding| self.typed_export::<T>(binding))
            .collect()
    }

    /// Lazy typed exports of `T` with metadata projected into the view `V`
    ///
    /// Fails with [`ExportError::UnsupportedOperation`] before looking at any
    /// binding when `V` was not registered with this provider.
    pub fn get_exports_with_view<T, V>(
        &self,
        contract: Option<&str>,
    ) -> Result<Vec<ExportWithView<T, V>>>
    where
        T: Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        self.views.ensure_supported::<V>("get_exports_with_view")?;

        self.get_exports::<T>(contract)?
            .into_iter()
            .map(|export| export.with_view::<V>(&self.views))
            .collect()
    }

    /// Describe the exports of `service` without resolving them
    pub fn service_info(&self, service: ServiceType) -> Result<Vec<ServiceInfo>> {
        self.registry
            .bindings(service)
            .iter()
            .map(|binding| {
                Ok(ServiceInfo {
                    service,
                    contract_name: binding.contract_name().map(str::to_string),
                    metadata: binding.export_metadata()?,
                })
            })
            .collect()
    }

    fn matching(&self, service: ServiceType, contract: Option<&str>) -> Vec<R::Binding> {
        let contract = normalize_requested(contract);
        let matching = self.registry.matching(service, contract);
        debug!(
            "{} binding(s) of {} match contract {:?}",
            matching.len(),
            service,
            contract
        );
        matching
    }

    fn typed_export<T: Send + Sync + 'static>(&self, binding: R::Binding) -> Result<Export<T>> {
        let registry = Arc::clone(&self.registry);
        let metadata = binding.export_metadata()?;
        Ok(Export::new(
            move || registry.resolve_binding(&binding).and_then(downcast::<T>),
            metadata,
        ))
    }

    fn single_or_none<T: Send + Sync + 'static>(
        &self,
        contract: Option<&str>,
    ) -> Result<Option<Arc<T>>> {
        let mut matching = self.matching(ServiceType::of::<T>(), contract);
        if matching.len() != 1 {
            return Ok(None);
        }

        let instance = self.registry.resolve_binding(&matching.remove(0))?;
        downcast::<T>(instance).map(Some)
    }
}

impl<R> Clone for ExportProvider<R> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            views: Arc::clone(&self.views),
        }
    }
}

impl<R> fmt::Debug for ExportProvider<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportProvider")
            .field("registry", &std::any::type_name::<R>())
            .field("views", &self.views)
            .finish()
    }
}

fn downcast<T: Send + Sync + 'static>(instance: Instance) -> Result<Arc<T>> {
    instance.downcast::<T>().map_err(|_| ExportError::TypeMismatch {
        expected: std::any::type_name::<T>(),
        actual: "an instance of another type".to_string(),
    })
}
