//! biblib Core: shared ids, domain model, and errors.
//!
//! This crate provides the foundational types used across all biblib crates.
//! It has no internal biblib dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`ids`]: User and library identifiers
//! - [`model`]: Libraries, documents, and their update inputs

#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod error;
pub mod ids;
pub mod model;

mod proptests;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use ids::{Bibcode, LibraryId, UserId};
pub use model::{
    DEFAULT_DESCRIPTION, DocumentAction, Library, LibraryPatch, NewLibrary, User,
};
