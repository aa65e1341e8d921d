//! Request body extraction.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::error::{ApiError, WRONG_TYPE_ERROR};

/// JSON request body, parsed whatever `Content-Type` the client sent.
///
/// Gateway clients often send JSON labelled as form data, so the header is
/// ignored. Anything that is not JSON of the expected shape answers with
/// [`WRONG_TYPE_ERROR`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::new(rejection.status(), rejection.body_text()))?;
        serde_json::from_slice(&bytes).map(JsonBody).map_err(|err| {
            tracing::debug!(error = %err, "rejected request body");
            WRONG_TYPE_ERROR.into()
        })
    }
}
