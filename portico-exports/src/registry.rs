//! Binding registry capability
//!
//! The export provider talks to a container only through [`BindingRegistry`].
//! A container adapter supplies binding enumeration and resolution of one
//! specific binding; single and multi lookups by contract name have default
//! implementations on top of those two, which adapters may replace with the
//! container's native lookups.

use portico_di::ServiceType;
use std::any::Any;
use std::sync::Arc;

use crate::contract;
use crate::error::{ExportError, Result};
use crate::metadata::Metadata;

/// A resolved instance whose concrete type is only known at runtime
pub type Instance = Arc<dyn Any + Send + Sync>;

/// What the export provider needs to know about one binding
pub trait RegisteredBinding: Clone + Send + Sync + 'static {
    /// The binding name as stored by the container, possibly the default-name sentinel
    fn name(&self) -> Option<&str>;

    /// Metadata stored under [`contract::EXPORT_METADATA_KEY`], if any
    ///
    /// A value stored under the key that is not metadata is an error, not `None`.
    fn export_metadata(&self) -> Result<Option<Metadata>>;

    /// Normalized contract name of the binding
    fn contract_name(&self) -> Option<&str> {
        contract::normalize(self.name())
    }
}

/// Binding introspection and resolution offered by a container
pub trait BindingRegistry: Send + Sync + 'static {
    type Binding: RegisteredBinding;

    /// All bindings for `service`, in the container's enumeration order
    fn bindings(&self, service: ServiceType) -> Vec<Self::Binding>;

    /// Resolve exactly this binding, never one of its siblings
    fn resolve_binding(&self, binding: &Self::Binding) -> Result<Instance>;

    /// Resolve the single binding of `service` with the given normalized contract
    fn resolve(&self, service: ServiceType, contract: Option<&str>) -> Result<Instance> {
        let mut matching = self.matching(service, contract);
        match matching.len() {
            0 => Err(ExportError::not_found(service.name(), contract)),
            1 => self.resolve_binding(&matching.remove(0)),
            count => Err(ExportError::ambiguous(service.name(), contract, count)),
        }
    }

    /// Resolve every binding of `service` with the given normalized contract
    fn resolve_all(&self, service: ServiceType, contract: Option<&str>) -> Result<Vec<Instance>> {
        self.matching(service, contract)
            .iter()
            .map(|binding| self.resolve_binding(binding))
            .collect()
    }

    /// Bindings of `service` whose normalized name equals `contract`
    fn matching(&self, service: ServiceType, contract: Option<&str>) -> Vec<Self::Binding> {
        self.bindings(service)
            .into_iter()
            .filter(|binding| contract::matches(binding.name(), contract))
            .collect()
    }
}
