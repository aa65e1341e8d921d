//! Error types for biblib-cli

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for biblib-cli operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in biblib-cli
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Configuration could not be located, parsed, or applied
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or socket error, with the path or address involved
    #[error("I/O error at {path}: {source}")]
    Io {
        /// File or address being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Error from biblib-storage
    #[error("Storage error: {0}")]
    Store(#[from] biblib_storage::StoreError),

    /// Error from biblib-auth
    #[error("Auth error: {0}")]
    Auth(#[from] biblib_auth::AuthError),
}

impl Error {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Wraps an I/O error with the path it concerns.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
