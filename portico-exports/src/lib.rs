//! Export provider for Portico
//!
//! Resolves services from a container by type, optional contract name and
//! metadata. Lookups hand out either values or lazy [`Export`]s that carry
//! the metadata of their binding, optionally projected into a typed
//! [`MetadataView`].
//!
//! The provider only depends on the [`BindingRegistry`] capability; the
//! `portico-di` container implements it out of the box.
//!
//! ```
//! use portico_di::ContainerBuilder;
//! use portico_exports::prelude::*;
//!
//! let mut builder = ContainerBuilder::new();
//! builder.bind_transient(|_| String::from("default")).register();
//! builder
//!     .bind_transient(|_| String::from("audited"))
//!     .exported_as("audit")
//!     .register();
//!
//! let provider = ExportProvider::new(builder.build());
//! let audited = provider.get_exported_value::<String>(Some("audit")).unwrap();
//! assert_eq!(*audited, "audited");
//! ```

pub mod adapter;
pub mod contract;
pub mod error;
pub mod export;
pub mod metadata;
pub mod provider;
pub mod registry;
pub mod view;

pub use adapter::ExportBindingExt;
pub use contract::{CONTRACT_NAME_KEY, DEFAULT_BINDING_NAME, EXPORT_METADATA_KEY};
pub use error::{ExportError, ResolutionFailure, Result};
pub use export::{AnyExport, Export, ExportWithView};
pub use metadata::{Metadata, MetadataBuilder};
pub use portico_di::ServiceType;
pub use provider::{ExportProvider, ServiceInfo};
pub use registry::{BindingRegistry, Instance, RegisteredBinding};
pub use view::{project, MetadataView, ViewProjector, ViewRegistry};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::{
        Export, ExportBindingExt, ExportError, ExportProvider, ExportWithView, Metadata,
        MetadataView, ServiceType, ViewRegistry,
    };
}
