//! Contract names
//!
//! "No contract" has exactly one representation on this side of the
//! container boundary: `None`. Containers may mark unnamed bindings with
//! [`DEFAULT_BINDING_NAME`], and callers may pass an empty string; both are
//! folded into `None` before any comparison.

pub use portico_di::DEFAULT_BINDING_NAME;

/// Key under which a binding stores the metadata surfaced on its exports
pub const EXPORT_METADATA_KEY: &str = "ExportMetadata";

/// Metadata key holding the contract name of a named export
pub const CONTRACT_NAME_KEY: &str = "ContractName";

/// Map a binding name as reported by the container to a contract name
pub fn normalize(name: Option<&str>) -> Option<&str> {
    match name {
        Some(DEFAULT_BINDING_NAME) => None,
        other => other,
    }
}

/// Normalize a contract name supplied by a caller
///
/// Like [`normalize`], and additionally treats the empty string as "no contract".
pub fn normalize_requested(name: Option<&str>) -> Option<&str> {
    match normalize(name) {
        Some("") => None,
        other => other,
    }
}

/// Whether a binding named `binding_name` satisfies a normalized request
pub fn matches(binding_name: Option<&str>, requested: Option<&str>) -> bool {
    normalize(binding_name) == requested
}
