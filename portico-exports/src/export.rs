//! Lazy exports
//!
//! An [`Export`] pairs a deferred accessor with the metadata of the binding
//! it came from. The accessor runs on the first call to [`Export::value`];
//! a successful result is kept and returned by later calls, a failure is
//! returned as-is and the next call tries again. Concurrent first calls wait
//! while one of them runs the accessor, so it succeeds at most once.

use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::metadata::Metadata;
use crate::view::ViewRegistry;

/// Deferred accessor producing an export's value
pub type Accessor<T> = Arc<dyn Fn() -> Result<Arc<T>> + Send + Sync>;

/// A lazily resolved value with attached metadata
pub struct Export<T: ?Sized> {
    accessor: Accessor<T>,
    value: OnceCell<Arc<T>>,
    metadata: Metadata,
}

/// An export whose value type is only known at runtime
pub type AnyExport = Export<dyn Any + Send + Sync>;

impl<T: ?Sized + Send + Sync + 'static> Export<T> {
    /// Create an export; missing metadata becomes empty metadata
    pub fn new<F>(accessor: F, metadata: Option<Metadata>) -> Self
    where
        F: Fn() -> Result<Arc<T>> + Send + Sync + 'static,
    {
        Self::from_accessor(Arc::new(accessor), metadata)
    }

    pub fn from_accessor(accessor: Accessor<T>, metadata: Option<Metadata>) -> Self {
        Self {
            accessor,
            value: OnceCell::new(),
            metadata: metadata.unwrap_or_default(),
        }
    }

    /// Resolve the value, running the accessor on first use
    pub fn value(&self) -> Result<Arc<T>> {
        self.value
            .get_or_try_init(|| (self.accessor)())
            .map(Arc::clone)
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn is_value_created(&self) -> bool {
        self.value.get().is_some()
    }

    /// Attach a projection of this export's metadata
    pub fn with_view<V: Send + Sync + 'static>(
        self,
        views: &ViewRegistry,
    ) -> Result<ExportWithView<T, V>> {
        let view = views.project::<V>(&self.metadata)?;
        Ok(ExportWithView { export: self, view })
    }
}

impl<T: ?Sized> Clone for Export<T> {
    fn clone(&self) -> Self {
        Self {
            accessor: self.accessor.clone(),
            value: self.value.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Export<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Export")
            .field("value_type", &std::any::type_name::<T>())
            .field("is_value_created", &self.value.get().is_some())
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// An export whose metadata has been projected into the view `V`
pub struct ExportWithView<T: ?Sized, V> {
    export: Export<T>,
    view: Arc<V>,
}

impl<T: ?Sized + Send + Sync + 'static, V> ExportWithView<T, V> {
    pub fn value(&self) -> Result<Arc<T>> {
        self.export.value()
    }

    /// The projected metadata
    pub fn metadata(&self) -> &V {
        &self.view
    }

    /// The metadata the view was projected from
    pub fn raw_metadata(&self) -> &Metadata {
        self.export.metadata()
    }

    pub fn is_value_created(&self) -> bool {
        self.export.is_value_created()
    }

    pub fn into_export(self) -> Export<T> {
        self.export
    }
}

impl<T: ?Sized, V> Clone for ExportWithView<T, V> {
    fn clone(&self) -> Self {
        Self {
            export: self.export.clone(),
            view: self.view.clone(),
        }
    }
}

impl<T: ?Sized, V: fmt::Debug> fmt::Debug for ExportWithView<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportWithView")
            .field("export", &self.export)
            .field("view", &self.view)
            .finish()
    }
}
