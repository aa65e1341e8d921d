//! Router assembly and the serve loop.

use std::future::Future;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use biblib_auth::{AuthConfig, AuthLayer};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::routes::{ROUTES, resources};
use crate::state::AppState;

/// Builds the full biblib router.
///
/// Layers, outermost first: request tracing, then user-header parsing.
pub fn build_router(state: AppState, auth: AuthConfig) -> Router {
    let router = ROUTES
        .iter()
        .fold(Router::new(), |router, route| {
            router.route(route.path, (route.handlers)())
        })
        .route("/resources", get(resources::list_resources));

    router
        .layer(AuthLayer::new(auth))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, _span: &tracing::Span| {
                        let status = response.status();
                        if status.is_success() {
                            tracing::debug!(status = %status, latency_ms = latency.as_millis(), "request finished");
                        } else {
                            tracing::warn!(status = %status, latency_ms = latency.as_millis(), "request failed");
                        }
                    },
                ),
        )
        .with_state(state)
}

/// Serves `app` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "biblib API listening");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown requested"),
        Err(err) => {
            tracing::error!(error = %err, "failed to listen for ctrl-c; shutting down");
        }
    }
}
