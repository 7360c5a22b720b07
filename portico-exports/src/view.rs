//! Metadata views
//!
//! A view is a typed, read-only projection of [`Metadata`]. Each view type
//! states how it is built from metadata by implementing [`MetadataView`]
//! (usually through [`metadata_view!`](crate::metadata_view)); a
//! [`ViewRegistry`] records which views an export provider may project into.

use serde::de::DeserializeOwned;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{ExportError, Result};
use crate::metadata::Metadata;

/// A typed projection of export metadata
pub trait MetadataView: Sized + Send + Sync + 'static {
    /// Build the view from metadata
    fn project(view: &ViewProjector<'_>) -> Result<Self>;
}

/// Read access to metadata while projecting a view
pub struct ViewProjector<'a> {
    metadata: &'a Metadata,
    view: &'static str,
}

impl<'a> ViewProjector<'a> {
    pub fn new<V: MetadataView>(metadata: &'a Metadata) -> Self {
        Self {
            metadata,
            view: std::any::type_name::<V>(),
        }
    }

    pub fn metadata(&self) -> &'a Metadata {
        self.metadata
    }

    /// A member with no default: the key must be present
    pub fn required<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        match self.metadata.try_get(key) {
            Some(_) => self.convert(key),
            None => Err(ExportError::MetadataView {
                view: self.view,
                key: key.to_string(),
                reason: "is missing and has no default".to_string(),
            }),
        }
    }

    /// A member with a declared default, used when the key is missing
    pub fn or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T> {
        match self.metadata.try_get(key) {
            Some(_) => self.convert(key),
            None => Ok(default),
        }
    }

    /// A member that may be absent
    pub fn optional<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.metadata.try_get(key) {
            Some(_) => self.convert(key).map(Some),
            None => Ok(None),
        }
    }

    fn convert<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.metadata.get_as(key).map_err(|e| match e {
            ExportError::MetadataView { key, reason, .. } => ExportError::MetadataView {
                view: self.view,
                key,
                reason: format!("has the wrong shape: {}", reason),
            },
            other => other,
        })
    }
}

/// Project metadata into a view
pub fn project<V: MetadataView>(metadata: &Metadata) -> Result<V> {
    V::project(&ViewProjector::new::<V>(metadata))
}

type Projection = Arc<dyn Fn(&Metadata) -> Result<Arc<dyn Any + Send + Sync>> + Send + Sync>;

/// The views an export provider can project into
///
/// Populated while configuring the provider; asking for a view that was never
/// registered is reported as [`ExportError::UnsupportedOperation`].
#[derive(Clone, Default)]
pub struct ViewRegistry {
    projections: HashMap<TypeId, Projection>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view using its [`MetadataView`] implementation
    pub fn register<V: MetadataView>(&mut self) -> &mut Self {
        self.register_with::<V, _>(project::<V>)
    }

    /// Register a view with an explicit projection function
    pub fn register_with<V, F>(&mut self, projection: F) -> &mut Self
    where
        V: Send + Sync + 'static,
        F: Fn(&Metadata) -> Result<V> + Send + Sync + 'static,
    {
        self.projections.insert(
            TypeId::of::<V>(),
            Arc::new(move |metadata| {
                projection(metadata).map(|view| Arc::new(view) as Arc<dyn Any + Send + Sync>)
            }),
        );
        self
    }

    /// Builder-style variant of [`ViewRegistry::register`]
    pub fn with<V: MetadataView>(mut self) -> Self {
        self.register::<V>();
        self
    }

    pub fn supports<V: 'static>(&self) -> bool {
        self.projections.contains_key(&TypeId::of::<V>())
    }

    /// Fail fast when `V` has no registered projection
    pub fn ensure_supported<V: 'static>(&self, operation: &'static str) -> Result<()> {
        if self.supports::<V>() {
            Ok(())
        } else {
            Err(self.unsupported::<V>(operation))
        }
    }

    fn unsupported<V: 'static>(&self, operation: &'static str) -> ExportError {
        ExportError::UnsupportedOperation {
            operation,
            reason: format!(
                "no projection registered for metadata view {}",
                std::any::type_name::<V>()
            ),
        }
    }

    /// Project metadata through the registered projection for `V`
    pub fn project<V: Send + Sync + 'static>(&self, metadata: &Metadata) -> Result<Arc<V>> {
        let Some(projection) = self.projections.get(&TypeId::of::<V>()) else {
            return Err(self.unsupported::<V>("project"));
        };
        projection(metadata)?
            .downcast::<V>()
            .map_err(|_| ExportError::TypeMismatch {
                expected: std::any::type_name::<V>(),
                actual: "a different view type".to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.projections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projections.is_empty()
    }
}

impl fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRegistry")
            .field("views", &self.projections.len())
            .finish()
    }
}

/// Declare a metadata view struct together with its [`MetadataView`] implementation
///
/// Each member names its metadata key; `or <expr>` declares a default used
/// when the key is missing. Members without a default are required.
///
/// ```
/// use portico_exports::metadata_view;
///
/// metadata_view! {
///     #[derive(Debug)]
///     pub struct PluginView {
///         name: String = "Name";
///         priority: i64 = "Priority" or 0;
///     }
/// }
/// ```
#[macro_export]
macro_rules! metadata_view {
    (@member $view:ident, $key:literal) => {
        $view.required($key)?
    };
    (@member $view:ident, $key:literal, $default:expr) => {
        $view.or($key, $default)?
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $field:ident : $ty:ty = $key:literal $( or $default:expr )? ; )*
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( pub $field: $ty, )*
        }

        impl $crate::view::MetadataView for $name {
            fn project(view: &$crate::view::ViewProjector<'_>) -> $crate::Result<Self> {
                Ok(Self {
                    $( $field: $crate::metadata_view!(@member view, $key $(, $default)?), )*
                })
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    metadata_view! {
        #[derive(Debug, PartialEq)]
        struct RequiredName {
            name: String = "Name";
        }
    }

    metadata_view! {
        #[derive(Debug, PartialEq)]
        struct DefaultedName {
            name: String = "Name" or "none".to_string();
            weight: f64 = "Weight" or 1.0;
        }
    }

    struct Tagged {
        tags: Option<Vec<String>>,
    }

    impl MetadataView for Tagged {
        fn project(view: &ViewProjector<'_>) -> Result<Self> {
            Ok(Self {
                tags: view.optional("Tags")?,
            })
        }
    }

    fn without_name() -> Metadata {
        Metadata::builder().with("Other", 1).build()
    }

    #[test]
    fn test_required_member_missing() {
        let result = project::<RequiredName>(&without_name());
        match result {
            Err(ExportError::MetadataView { key, view, .. }) => {
                assert_eq!(key, "Name");
                assert!(view.ends_with("RequiredName"));
            }
            other => panic!("expected MetadataView error, got {:?}", other),
        }
    }

    #[test]
    fn test_default_member_missing() {
        let view = project::<DefaultedName>(&without_name()).unwrap();
        assert_eq!(view.name, "none");
        assert_eq!(view.weight, 1.0);
    }

    #[test]
    fn test_present_values_win_over_defaults() {
        let metadata = Metadata::builder()
            .with("Name", "console")
            .with("Weight", 2.5)
            .build();
        let view = project::<DefaultedName>(&metadata).unwrap();
        assert_eq!(view.name, "console");
        assert_eq!(view.weight, 2.5);
    }

    #[test]
    fn test_wrong_shape_fails_even_with_default() {
        let metadata = Metadata::builder().with("Name", 12).build();
        assert!(matches!(
            project::<DefaultedName>(&metadata),
            Err(ExportError::MetadataView { .. })
        ));
    }

    #[test]
    fn test_optional_member() {
        let view = project::<Tagged>(&Metadata::empty()).unwrap();
        assert_eq!(view.tags, None);

        let metadata = Metadata::builder()
            .with("Tags", serde_json::json!(["x"]))
            .build();
        let view = project::<Tagged>(&metadata).unwrap();
        assert_eq!(view.tags, Some(vec!["x".to_string()]));
    }

    #[test]
    fn test_registry_support() {
        let mut registry = ViewRegistry::new();
        registry.register::<DefaultedName>();

        assert!(registry.supports::<DefaultedName>());
        assert!(!registry.supports::<RequiredName>());

        let view = registry.project::<DefaultedName>(&without_name()).unwrap();
        assert_eq!(view.name, "none");

        assert!(matches!(
            registry.project::<RequiredName>(&without_name()),
            Err(ExportError::UnsupportedOperation { .. })
        ));
    }

    #[test]
    fn test_register_with_closure() {
        let mut registry = ViewRegistry::new().with::<RequiredName>();
        registry.register_with(|metadata: &Metadata| Ok(metadata.len()));

        assert_eq!(registry.len(), 2);
        let count = registry.project::<usize>(&without_name()).unwrap();
        assert_eq!(*count, 1);
    }
}
