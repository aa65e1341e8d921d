//! # biblib-acl
//!
//! Access control for biblib libraries.
//!
//! This crate implements the permission model:
//! - Permission levels (read, write, admin, owner) and the stored flag set
//! - Resolving what a requester may do with a library (owner, grantee,
//!   public visitor, or anonymous)
//! - Authorizing individual actions against that resolution

#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod enforcement;
pub mod error;
pub mod policy;

pub use enforcement::{Access, Action, Requester, authorize, resolve};
pub use error::{AclError, Result};
pub use policy::{Permission, PermissionSet};
