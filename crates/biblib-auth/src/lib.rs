//! Gateway identity handling for biblib.
//!
//! Tokens are validated upstream; the gateway forwards the caller's absolute
//! uid in a request header. This crate turns that header into a typed
//! identity.
//!
//! Provides:
//! - [`AuthenticatedUser`]: Identity extracted from the user-id header
//! - [`MaybeUser`]: Extractor for endpoints that also serve anonymous callers
//! - [`AuthLayer`] / [`AuthService`]: Tower middleware that parses the header
//! - [`AuthConfig`]: Configuration for the auth layer
//! - [`AuthError`]: Auth-specific error types

mod error;
mod middleware;
mod user;

pub use error::AuthError;
pub use middleware::{AuthLayer, AuthService};
pub use user::{AuthenticatedUser, MaybeUser, user_from_parts};

/// Header the gateway uses for the absolute uid.
pub const DEFAULT_USER_HEADER: &str = "X-Adsws-Uid";

/// Configuration for the auth middleware.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// Name of the header carrying the absolute uid.
    pub user_header: http::HeaderName,
}

impl AuthConfig {
    /// Builds a config for the named header.
    pub fn new(user_header: &str) -> Result<Self, AuthError> {
        let user_header = http::HeaderName::from_bytes(user_header.as_bytes())
            .map_err(|_| AuthError::InvalidHeaderName(user_header.to_string()))?;
        Ok(Self { user_header })
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            user_header: http::HeaderName::from_static("x-adsws-uid"),
        }
    }
}
