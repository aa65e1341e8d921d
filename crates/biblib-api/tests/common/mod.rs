//! Common test utilities for the biblib HTTP suites.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use biblib_api::{AppState, build_router};
use biblib_auth::AuthConfig;
use biblib_storage::{LibraryStore, MemoryStore};
use serde_json::Value;
use tower::ServiceExt;

/// Test harness wrapping a router over a fresh in-memory store.
pub struct TestApp {
    /// The router under test.
    pub router: Router,
    /// Direct handle on the backing store.
    pub store: Arc<dyn LibraryStore>,
}

impl TestApp {
    /// Creates an app backed by an empty `MemoryStore`.
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// Creates an app over the given store.
    pub fn with_store(store: Arc<dyn LibraryStore>) -> Self {
        let router = build_router(AppState::new(store.clone()), AuthConfig::default());
        Self { router, store }
    }

    /// Sends one request; `uid` becomes the user header when present.
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        uid: Option<u64>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(uid) = uid {
            builder = builder.header("X-Adsws-Uid", uid.to_string());
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        (status, read_json(response).await)
    }

    /// Sends `body` as JSON text without a `Content-Type` header.
    pub async fn send_untyped(
        &self,
        method: &str,
        uri: &str,
        uid: u64,
        body: Value,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("X-Adsws-Uid", uid.to_string())
            .body(Body::from(body.to_string()))
            .expect("request");
        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        (status, read_json(response).await)
    }

    /// Creates a library as `uid` and returns its id.
    pub async fn create_library(&self, uid: u64, body: Value) -> String {
        let (status, json) = self.send("POST", "/libraries", Some(uid), Some(body)).await;
        assert_eq!(status, StatusCode::OK, "create failed: {json}");
        json["id"].as_str().expect("id").to_string()
    }
}

/// Reads a response body as JSON; an empty body reads as `null`.
pub async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("json")
}
