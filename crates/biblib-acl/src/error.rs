//! Error types for biblib-acl

use thiserror::Error;

use crate::enforcement::Action;

/// Result type alias for biblib-acl operations
pub type Result<T> = std::result::Result<T, AclError>;

/// Errors that can occur in biblib-acl
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AclError {
    /// The requester lacks the permission the action needs
    #[error("forbidden: {action:?}")]
    Forbidden {
        /// The refused action
        action: Action,
    },

    /// A permission name was not one of read, write, admin, owner
    #[error("unknown permission: {0}")]
    UnknownPermission(String),
}
