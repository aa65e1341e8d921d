//! Error types for biblib-core

use thiserror::Error;

/// Result type alias for biblib-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in biblib-core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A library id was neither a slug nor a hyphenated UUID
    #[error("Invalid library id: {0}")]
    InvalidLibraryId(String),

    /// A document identifier was empty after trimming
    #[error("Invalid bibcode: {0:?}")]
    InvalidBibcode(String),

    /// A user id was not a non-negative integer
    #[error("Invalid user id: {0}")]
    InvalidUserId(String),

    /// Request content failed validation
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation, when known
        field: Option<String>,
        /// What went wrong
        message: String,
    },
}

impl Error {
    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Error::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a new validation error with a field name.
    pub fn validation_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }
}
