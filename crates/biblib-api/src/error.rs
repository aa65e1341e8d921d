//! API error type and the stock error messages clients rely on.
//!
//! Every failure leaves the service as `{"error": "<message>"}`. The
//! messages below are stable and are matched verbatim by clients, so they
//! are exposed as constants and reused by the handlers and the tests.
//!
//! Internal failures log their details server-side and answer with a
//! generic message.

use axum::Json;
use axum::response::{IntoResponse, Response};
use biblib_acl::AclError;
use biblib_auth::AuthError;
use biblib_storage::StoreError;
use http::StatusCode;

/// Result type alias for handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// A status code paired with one of the stock messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockError {
    /// HTTP status sent with the message.
    pub status: StatusCode,
    /// Message sent in the `error` field.
    pub message: &'static str,
}

/// Unknown library, or a library the caller may not touch.
pub const NO_PERMISSION_ERROR: StockError = StockError {
    status: StatusCode::FORBIDDEN,
    message: "You do not have the correct permissions or this library does not exist.",
};

/// The owner already has a library with this name.
pub const DUPLICATE_LIBRARY_NAME_ERROR: StockError = StockError {
    status: StatusCode::CONFLICT,
    message: "Library name given already exists and must be unique.",
};

/// A user-scoped endpoint was called without the user header.
pub const MISSING_USERNAME_ERROR: StockError = StockError {
    status: StatusCode::BAD_REQUEST,
    message: "You did not supply enough user information.",
};

/// A body field had the wrong type or the body was not JSON.
pub const WRONG_TYPE_ERROR: StockError = StockError {
    status: StatusCode::BAD_REQUEST,
    message: "You passed the wrong type for the parameter.",
};

/// A document request named no bibcodes.
pub const MISSING_DOCUMENT_ERROR: StockError = StockError {
    status: StatusCode::BAD_REQUEST,
    message: "You did not supply any documents.",
};

/// A permission change targeted a uid the service has never seen.
pub const API_MISSING_USER_ERROR: StockError = StockError {
    status: StatusCode::NOT_FOUND,
    message: "That user does not exist in the database.",
};

/// Something broke on our side.
pub const INTERNAL_ERROR: StockError = StockError {
    status: StatusCode::INTERNAL_SERVER_ERROR,
    message: "An internal error occurred.",
};

/// Error returned by handlers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    /// HTTP status.
    pub status: StatusCode,
    /// Message sent in the `error` field.
    pub message: String,
}

impl ApiError {
    /// Builds an error with a custom message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Logs `err` and returns the generic internal error.
    pub fn internal(context: &str, err: &dyn std::error::Error) -> Self {
        tracing::error!(error = %err, "{context}");
        INTERNAL_ERROR.into()
    }
}

impl From<StockError> for ApiError {
    fn from(stock: StockError) -> Self {
        Self::new(stock.status, stock.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ============================================================================
// Conversions from lower layers
// ============================================================================

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            // A missing library is reported exactly like a forbidden one.
            StoreError::NotFound(_) => NO_PERMISSION_ERROR.into(),
            StoreError::Conflict(_) => DUPLICATE_LIBRARY_NAME_ERROR.into(),
            other => ApiError::internal("storage failure", &other),
        }
    }
}

impl From<AclError> for ApiError {
    fn from(err: AclError) -> Self {
        match err {
            AclError::UnknownPermission(_) => WRONG_TYPE_ERROR.into(),
            _ => NO_PERMISSION_ERROR.into(),
        }
    }
}

impl From<biblib_core::Error> for ApiError {
    fn from(err: biblib_core::Error) -> Self {
        match err {
            biblib_core::Error::InvalidLibraryId(_) => NO_PERMISSION_ERROR.into(),
            _ => WRONG_TYPE_ERROR.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingUser => MISSING_USERNAME_ERROR.into(),
            other => ApiError::new(other.status(), other.to_string()),
        }
    }
}
