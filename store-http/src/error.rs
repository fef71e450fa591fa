//! Error types for remote episode stores

use store_traits::error::StoreError;
use thiserror::Error;

/// Remote store errors
#[derive(Error, Debug)]
pub enum RemoteStoreError {
    /// API request returned a non-success status
    #[error("API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse an API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Backend credentials or endpoint are placeholders
    #[error("Backend not configured: {0}")]
    NotConfigured(String),

    /// Store error
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for remote store operations
pub type Result<T> = std::result::Result<T, RemoteStoreError>;

impl From<RemoteStoreError> for StoreError {
    fn from(error: RemoteStoreError) -> Self {
        match error {
            RemoteStoreError::ApiError {
                status_code,
                message,
            } => StoreError::Backend(format!("API error (status {}): {}", status_code, message)),
            RemoteStoreError::ParseError(msg) => {
                StoreError::Backend(format!("Parse error: {}", msg))
            }
            RemoteStoreError::NotConfigured(msg) => StoreError::Unavailable(msg),
            RemoteStoreError::Store(e) => e,
        }
    }
}
