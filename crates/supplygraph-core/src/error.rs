//! Error types for ontology operations.
//!
//! Unknown ids and rejected writes surface synchronously with the offending
//! id and field. Unmatched queries and over-capacity locations are not errors:
//! the former degrade to a low-confidence answer, the latter are reported as
//! [`CapacityWarning`](crate::types::CapacityWarning)s.

use thiserror::Error;

/// Result type for ontology operations.
pub type Result<T> = std::result::Result<T, OntologyError>;

/// Errors that can occur while reading or building the ontology.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OntologyError {
    /// Unknown entity or location id.
    #[error("Entity not found: {id}")]
    NotFound { id: String },

    /// Referential-integrity violation, malformed record, or invariant breach on insert.
    #[error("Validation failed for {id} ({field}): {reason}")]
    Validation {
        id: String,
        field: String,
        reason: String,
    },

    /// I/O errors (wrapped).
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for OntologyError {
    fn from(e: std::io::Error) -> Self {
        OntologyError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for OntologyError {
    fn from(e: serde_json::Error) -> Self {
        OntologyError::Serialization(e.to_string())
    }
}

// Convenience constructors
impl OntologyError {
    pub fn not_found(id: impl Into<String>) -> Self {
        OntologyError::NotFound { id: id.into() }
    }

    pub fn validation(
        id: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        OntologyError::Validation {
            id: id.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, OntologyError::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, OntologyError::Validation { .. })
    }
}
