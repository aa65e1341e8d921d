//! Tower middleware that reads the gateway's user-id header.
//!
//! `AuthLayer` and `AuthService` wrap any inner service. A well-formed
//! header becomes an [`AuthenticatedUser`] in the request extensions; a
//! missing header passes through so endpoints can serve anonymous callers;
//! a malformed header is refused with 400.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::response::IntoResponse;
use biblib_core::UserId;
use http::Request;
use tower::{Layer, Service};

use crate::{AuthConfig, AuthError, AuthenticatedUser};

/// Tower `Layer` that wraps services with user-id header parsing.
#[derive(Clone, Debug, Default)]
pub struct AuthLayer {
    config: AuthConfig,
}

impl AuthLayer {
    /// Create a new auth layer with the given config.
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            config: self.config.clone(),
        }
    }
}

/// Tower `Service` that identifies the caller before forwarding requests.
#[derive(Clone, Debug)]
pub struct AuthService<S> {
    inner: S,
    config: AuthConfig,
}

impl<S> Service<Request<Body>> for AuthService<S>
where
    S: Service<Request<Body>, Error = Infallible> + Clone + Send + 'static,
    S::Response: IntoResponse,
    S::Future: Send,
{
    type Response = axum::response::Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let identified = identify(&req, &self.config);

        Box::pin(async move {
            match identified {
                Ok(Some(user)) => {
                    req.extensions_mut().insert(user);
                }
                Ok(None) => {}
                Err(auth_err) => {
                    tracing::warn!(error = %auth_err, "rejecting request with bad user header");
                    return Ok(auth_err.into_response());
                }
            }
            let resp = inner
                .call(req)
                .await
                .unwrap_or_else(|infallible| match infallible {});
            Ok(resp.into_response())
        })
    }
}

/// Parse the configured header, if present.
fn identify(
    req: &Request<Body>,
    config: &AuthConfig,
) -> Result<Option<AuthenticatedUser>, AuthError> {
    let Some(value) = req.headers().get(&config.user_header) else {
        return Ok(None);
    };
    let raw = value
        .to_str()
        .map_err(|_| AuthError::InvalidUserId("<non-ascii>".to_string()))?;
    let uid: UserId = raw
        .parse()
        .map_err(|_| AuthError::InvalidUserId(raw.to_string()))?;
    Ok(Some(AuthenticatedUser { uid }))
}
