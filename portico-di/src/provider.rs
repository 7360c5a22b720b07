//! Service provider interfaces

use std::any::TypeId;

/// Registration queries answered without creating instances
pub trait ServiceProvider: Send + Sync {
    /// Check if any binding is registered for a type ID
    fn has_service_by_type_id(&self, type_id: TypeId) -> bool;

    /// Check if a binding with the given name is registered for a type ID
    fn has_named_service_by_type_id(&self, type_id: TypeId, name: &str) -> bool;

    fn has_service<T: 'static>(&self) -> bool
    where
        Self: Sized,
    {
        self.has_service_by_type_id(TypeId::of::<T>())
    }

    fn has_named_service<T: 'static>(&self, name: &str) -> bool
    where
        Self: Sized,
    {
        self.has_named_service_by_type_id(TypeId::of::<T>(), name)
    }
}
