//! Error types for the DI container

use crate::binding::BindingId;
use thiserror::Error;

/// Result type alias for DI operations
pub type DiResult<T> = Result<T, DiError>;

/// Errors that can occur during DI operations
#[derive(Error, Debug)]
pub enum DiError {
    /// No binding matches the requested service and name
    #[error("Service not found: {service_type}{}", display_name(.name))]
    ServiceNotFound {
        service_type: String,
        name: Option<String>,
    },

    /// More than one binding matches a request that needs exactly one
    #[error("Ambiguous binding: {count} bindings match {service_type}{}", display_name(.name))]
    AmbiguousBinding {
        service_type: String,
        name: Option<String>,
        count: usize,
    },

    /// A binding id does not belong to this container
    #[error("Binding not found: {0}")]
    BindingNotFound(BindingId),

    /// Service creation failed
    #[error("Failed to create service: {service_type}: {reason}")]
    ServiceCreationFailed {
        service_type: String,
        reason: String,
    },

    /// Instance produced by a binding is not of the requested type
    #[error("Type mismatch: expected {expected}, binding produced {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// Configuration error
    #[cfg(feature = "config")]
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("DI error: {0}")]
    Other(String),
}

fn display_name(name: &Option<String>) -> String {
    match name {
        Some(name) => format!(" (named '{}')", name),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_include_binding_name() {
        let err = DiError::ServiceNotFound {
            service_type: "Logger".to_string(),
            name: Some("console".to_string()),
        };
        assert_eq!(err.to_string(), "Service not found: Logger (named 'console')");

        let err = DiError::AmbiguousBinding {
            service_type: "Logger".to_string(),
            name: None,
            count: 2,
        };
        assert_eq!(err.to_string(), "Ambiguous binding: 2 bindings match Logger");
    }
}
