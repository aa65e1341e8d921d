//! Route registry and handlers.
//!
//! [`ROUTES`] is the single declaration of every endpoint: its axum path,
//! its rule in the `<converter:name>` notation clients see in `/resources`,
//! the methods it answers, the gateway scopes it needs, and its rate limit.

use axum::routing::{MethodRouter, get, post};
use biblib_acl::{Access, Requester, resolve};
use biblib_core::{Library, LibraryId};

use crate::error::ApiResult;
use crate::state::AppState;

pub mod documents;
pub mod libraries;
pub mod permissions;
pub mod resources;

/// Requests per period the gateway allows each route by default.
pub const DEFAULT_RATE_LIMIT: u32 = 1000;

/// Rate limit period in seconds (one day).
pub const RATE_LIMIT_PERIOD: u32 = 60 * 60 * 24;

/// Scope the gateway checks for account-bound endpoints.
pub const USER_SCOPE: &str = "user";

/// One endpoint of the service.
#[derive(Debug, Clone, Copy)]
pub struct RouteDef {
    /// axum path pattern.
    pub path: &'static str,
    /// Rule as advertised by `/resources`.
    pub rule: &'static str,
    /// Methods the route answers.
    pub methods: &'static [&'static str],
    /// Gateway scopes required; empty for public endpoints.
    pub scopes: &'static [&'static str],
    /// Human-readable summary.
    pub description: &'static str,
    /// `(requests, period_seconds)`.
    pub rate_limit: (u32, u32),
    /// Builds the handlers.
    pub handlers: fn() -> MethodRouter<AppState>,
}

/// Every endpoint except `/resources` itself.
pub static ROUTES: &[RouteDef] = &[
    RouteDef {
        path: "/libraries",
        rule: "/libraries",
        methods: &["GET", "POST"],
        scopes: &[USER_SCOPE],
        description: "List the caller's libraries or create a new one.",
        rate_limit: (DEFAULT_RATE_LIMIT, RATE_LIMIT_PERIOD),
        handlers: || get(libraries::list_libraries).post(libraries::create_library),
    },
    RouteDef {
        path: "/libraries/{library}",
        rule: "/libraries/<string:library>",
        methods: &["GET"],
        scopes: &[],
        description: "Documents and metadata of a single library.",
        rate_limit: (DEFAULT_RATE_LIMIT, RATE_LIMIT_PERIOD),
        handlers: || get(libraries::view_library),
    },
    RouteDef {
        path: "/documents/{library}",
        rule: "/documents/<string:library>",
        methods: &["POST", "PUT", "DELETE"],
        scopes: &[USER_SCOPE],
        description: "Add or remove documents, update metadata, or delete a library.",
        rate_limit: (DEFAULT_RATE_LIMIT, RATE_LIMIT_PERIOD),
        handlers: || {
            post(documents::modify_documents)
                .put(documents::update_metadata)
                .delete(documents::delete_library)
        },
    },
    RouteDef {
        path: "/permissions/{library}",
        rule: "/permissions/<string:library>",
        methods: &["GET", "POST"],
        scopes: &[USER_SCOPE],
        description: "List or change who may access a library.",
        rate_limit: (DEFAULT_RATE_LIMIT, RATE_LIMIT_PERIOD),
        handlers: || get(permissions::list_permissions).post(permissions::modify_permission),
    },
];

/// Loads a library and resolves what `requester` may do with it.
///
/// Malformed and unknown ids fail the same way as forbidden ones.
pub(crate) async fn load_library(
    state: &AppState,
    requester: Requester,
    raw_id: &str,
) -> ApiResult<(Library, Access)> {
    let id = LibraryId::parse(raw_id)?;
    let library = state.store.get_library(&id).await?;
    let grants = match requester.uid() {
        Some(uid) => state.store.get_permissions(uid, &id).await?,
        None => None,
    };
    let access = resolve(requester, grants.as_ref(), library.public);
    Ok((library, access))
}
