//! # biblib-storage
//!
//! Storage backends for biblib.
//!
//! This crate provides:
//! - The [`LibraryStore`] abstraction used by the API layer
//! - An in-memory backend (tests and local development)
//! - A SQLite backend via `sqlx`
//!
//! Use [`connect`] to open whichever backend a [`StoreConfig`] names.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod database;
pub mod error;
pub mod memory;
pub mod traits;

use std::sync::Arc;

pub use database::SqliteStore;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use traits::LibraryStore;

/// Database URL that selects the in-memory backend.
pub const MEMORY_URL: &str = "memory";

/// Backend selection and pool sizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// `"memory"` or a `sqlite:` URL.
    pub url: String,
    /// Upper bound on pooled connections (SQLite only).
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: MEMORY_URL.to_string(),
            max_connections: 5,
        }
    }
}

/// Opens the backend named by `config.url`.
pub async fn connect(config: &StoreConfig) -> StoreResult<Arc<dyn LibraryStore>> {
    if config.url == MEMORY_URL {
        return Ok(Arc::new(MemoryStore::new()));
    }
    let store = SqliteStore::connect(&config.url, config.max_connections).await?;
    Ok(Arc::new(store))
}
