//! Export provider error types

use portico_di::DiError;
use std::fmt;
use thiserror::Error;

/// Type alias for export provider results
pub type Result<T> = std::result::Result<T, ExportError>;

/// Why a strict single-value lookup failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionFailure {
    /// No registration matched
    NotFound,
    /// Several registrations matched
    Ambiguous { count: usize },
}

impl fmt::Display for ResolutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionFailure::NotFound => write!(f, "no matching export"),
            ResolutionFailure::Ambiguous { count } => {
                write!(f, "{} matching exports where exactly one is required", count)
            }
        }
    }
}

/// Errors raised by the export provider
#[derive(Error, Debug)]
pub enum ExportError {
    /// A lookup that requires exactly one match found zero or several
    #[error("Cannot resolve {service}{}: {failure}", display_contract(.contract))]
    Resolution {
        /// Requested service type
        service: String,
        /// Requested contract name, after normalization
        contract: Option<String>,
        /// Zero or several matches
        failure: ResolutionFailure,
    },

    /// Direct metadata access for a missing key
    #[error("Metadata key not found: {key}")]
    MetadataKeyNotFound {
        /// The missing key
        key: String,
    },

    /// Metadata could not be projected into a view
    #[error("Cannot project metadata into {view}: key '{key}' {reason}")]
    MetadataView {
        /// View type name
        view: &'static str,
        /// Offending key
        key: String,
        /// What went wrong with the key
        reason: String,
    },

    /// A binding stores something under the export metadata key that cannot be read as metadata
    #[error("Invalid export metadata on {binding}: {reason}")]
    InvalidExportMetadata {
        /// The offending binding
        binding: String,
        /// What was found instead
        reason: String,
    },

    /// The requested operation is not available with the current configuration
    #[error("Unsupported operation {operation}: {reason}")]
    UnsupportedOperation {
        /// Operation name
        operation: &'static str,
        /// Missing capability
        reason: String,
    },

    /// A resolved instance is not of the requested type
    #[error("Type mismatch: expected {expected}, resolved {actual}")]
    TypeMismatch {
        /// Requested type
        expected: &'static str,
        /// Type produced by the container
        actual: String,
    },

    /// The underlying container failed while producing an instance
    #[error(transparent)]
    Container(#[from] DiError),
}

impl ExportError {
    /// True for the zero-match case of a strict lookup
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ExportError::Resolution {
                failure: ResolutionFailure::NotFound,
                ..
            }
        )
    }

    /// True for any failed strict lookup, whether nothing or too much matched
    pub fn is_resolution_error(&self) -> bool {
        matches!(self, ExportError::Resolution { .. })
    }

    pub(crate) fn not_found(service: &str, contract: Option<&str>) -> Self {
        ExportError::Resolution {
            service: service.to_string(),
            contract: contract.map(str::to_string),
            failure: ResolutionFailure::NotFound,
        }
    }

    pub(crate) fn ambiguous(service: &str, contract: Option<&str>, count: usize) -> Self {
        ExportError::Resolution {
            service: service.to_string(),
            contract: contract.map(str::to_string),
            failure: ResolutionFailure::Ambiguous { count },
        }
    }
}

fn display_contract(contract: &Option<String>) -> String {
    match contract {
        Some(contract) => format!(" with contract '{}'", contract),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_error_kinds() {
        let missing = ExportError::not_found("Logger", None);
        assert!(missing.is_not_found());
        assert!(missing.is_resolution_error());
        assert_eq!(missing.to_string(), "Cannot resolve Logger: no matching export");

        let ambiguous = ExportError::ambiguous("Logger", Some("A"), 2);
        assert!(!ambiguous.is_not_found());
        assert!(ambiguous.is_resolution_error());
        let message = ambiguous.to_string();
        assert!(message.starts_with("Cannot resolve Logger with contract 'A': "));
        assert!(message.ends_with("2 matching exports where exactly one is required"));
    }
}
