//! Request identity and its axum extractors.

use axum::extract::FromRequestParts;
use biblib_core::UserId;
use http::request::Parts;

use crate::AuthError;

/// A caller identified by the gateway.
///
/// Stored in HTTP request extensions by [`AuthLayer`](crate::AuthLayer).
/// As an extractor it rejects requests without a user with
/// [`AuthError::MissingUser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Absolute uid from the gateway header.
    pub uid: UserId,
}

/// Extract the `AuthenticatedUser` from HTTP request `Parts`, if present.
pub fn user_from_parts(parts: &Parts) -> Option<&AuthenticatedUser> {
    parts.extensions.get::<AuthenticatedUser>()
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        user_from_parts(parts).copied().ok_or(AuthError::MissingUser)
    }
}

/// The caller if one was identified, `None` for anonymous requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaybeUser(pub Option<AuthenticatedUser>);

impl MaybeUser {
    /// The caller's uid, if any.
    pub fn uid(&self) -> Option<UserId> {
        self.0.map(|u| u.uid)
    }
}

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(user_from_parts(parts).copied()))
    }
}
