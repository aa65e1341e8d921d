//! Shared handler state.

use std::sync::Arc;

use biblib_storage::LibraryStore;

/// State every handler receives.
#[derive(Clone)]
pub struct AppState {
    /// The configured storage backend.
    pub store: Arc<dyn LibraryStore>,
}

impl AppState {
    /// Wraps a store.
    pub fn new(store: Arc<dyn LibraryStore>) -> Self {
        Self { store }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store.backend_name())
            .finish()
    }
}
