//! Error types for biblib-storage

use thiserror::Error;

/// Result type alias for biblib-storage operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in biblib-storage
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StoreError {
    /// The addressed user or library does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// A uniqueness rule would be violated
    #[error("conflict: {0}")]
    Conflict(String),

    /// The configured URL names no supported backend
    #[error("unsupported database url: {0}")]
    UnsupportedUrl(String),

    /// A stored row could not be turned back into a domain value
    #[error("corrupt row: {0}")]
    Corrupt(String),

    /// Error from biblib-core
    #[error("Core error: {0}")]
    Core(#[from] biblib_core::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Whether the error is caused by the request rather than the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(self, StoreError::NotFound(_) | StoreError::Conflict(_))
    }
}
