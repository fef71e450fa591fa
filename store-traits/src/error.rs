use thiserror::Error;

/// Shared error taxonomy for episode storage backends.
///
/// The fallback orchestrator inspects these variants to decide whether a
/// failed primary attempt may be retried against the local store:
/// `Validation` and `NotFound` are terminal, everything else counts as a
/// backend failure and triggers exactly one fallback hop.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Input rejected before any I/O was attempted
    #[error("Validation failed: {field} - {message}")]
    Validation { field: String, message: String },

    /// Backend is not configured or not reachable
    #[error("Backend not available: {0}")]
    Unavailable(String),

    /// Backend accepted the request but the operation failed
    #[error("Backend operation failed: {0}")]
    Backend(String),

    /// The referenced episode no longer exists
    #[error("Episode not found: {id}")]
    NotFound { id: String },

    /// The operation exceeded its deadline
    #[error("Operation timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Shorthand for a validation failure on a named field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether a fallback hop to the local store is allowed after this error.
    ///
    /// Validation failures would fail identically everywhere, and a missing
    /// record is a statement about the data, not about the backend.
    pub fn is_fallback_eligible(&self) -> bool {
        !matches!(
            self,
            StoreError::Validation { .. } | StoreError::NotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_and_not_found_are_terminal() {
        assert!(!StoreError::validation("title", "must not be empty").is_fallback_eligible());
        assert!(!StoreError::NotFound {
            id: "abc".to_string()
        }
        .is_fallback_eligible());
    }

    #[test]
    fn backend_failures_are_fallback_eligible() {
        assert!(StoreError::Backend("HTTP 503".to_string()).is_fallback_eligible());
        assert!(StoreError::Unavailable("no credentials".to_string()).is_fallback_eligible());
        assert!(StoreError::Timeout { seconds: 30 }.is_fallback_eligible());
    }
}
