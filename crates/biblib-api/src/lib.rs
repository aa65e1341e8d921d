//! # biblib-api
//!
//! The biblib REST surface.
//!
//! This crate provides:
//! - [`build_router`]: the axum router with tracing and user-header layers
//! - Handlers for `/libraries`, `/documents`, `/permissions` and `/resources`
//! - [`ApiError`]: the `{"error": ...}` response type and its stock messages
//! - [`serve`]: run a router on a bound listener until shutdown
//!
//! Every route is declared once in [`routes::ROUTES`]; the router and the
//! `/resources` introspection table are both built from it.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod error;
pub mod extract;
pub mod routes;
pub mod server;
pub mod state;
pub mod types;

pub use error::{ApiError, ApiResult};
pub use extract::JsonBody;
pub use server::{build_router, serve, shutdown_signal};
pub use state::AppState;
