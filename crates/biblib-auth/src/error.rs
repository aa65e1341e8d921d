//! Auth-specific error types.

use axum::response::{IntoResponse, Response};
use http::StatusCode;

/// Errors that can occur while establishing the caller's identity.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The endpoint needs a user but the header was absent.
    #[error("You did not supply enough user information.")]
    MissingUser,

    /// The header was present but not a valid absolute uid.
    #[error("invalid user id header: {0}")]
    InvalidUserId(String),

    /// The configured header name is not a valid HTTP header name.
    #[error("invalid header name: {0}")]
    InvalidHeaderName(String),
}

impl AuthError {
    /// Whether this error should result in a 4xx (vs. a 500).
    pub fn is_client_error(&self) -> bool {
        matches!(self, AuthError::MissingUser | AuthError::InvalidUserId(_))
    }

    /// HTTP status for the error.
    pub fn status(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), axum::Json(body)).into_response()
    }
}
