//! `/permissions/<library>` handlers.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Path, State};
use biblib_acl::{Action, Requester, authorize};
use biblib_auth::AuthenticatedUser;

use crate::error::{API_MISSING_USER_ERROR, ApiResult};
use crate::extract::JsonBody;
use crate::routes::load_library;
use crate::state::AppState;
use crate::types::{PermissionChangeRequest, PermissionChangeResponse};

/// One `{"<uid>": ["owner", ...]}` entry.
pub type PermissionEntry = BTreeMap<String, Vec<&'static str>>;

/// `GET /permissions/<library>`: every grant on the library.
pub async fn list_permissions(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(library): Path<String>,
) -> ApiResult<Json<Vec<PermissionEntry>>> {
    let (library, access) = load_library(&state, Requester::User(user.uid), &library).await?;
    authorize(&access, Action::ViewPermissions)?;

    let entries = state
        .store
        .list_permissions(&library.id)
        .await?
        .into_iter()
        .map(|(uid, grant)| BTreeMap::from([(uid.to_string(), grant.names())]))
        .collect();
    Ok(Json(entries))
}

/// `POST /permissions/<library>`: grant or revoke one permission for a user.
pub async fn modify_permission(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(library): Path<String>,
    JsonBody(change): JsonBody<PermissionChangeRequest>,
) -> ApiResult<Json<PermissionChangeResponse>> {
    let (library, access) = load_library(&state, Requester::User(user.uid), &library).await?;
    authorize(&access, Action::ModifyPermission(change.permission))?;

    if state.store.find_user(change.uid).await?.is_none() {
        return Err(API_MISSING_USER_ERROR.into());
    }
    let grant = state
        .store
        .set_permission(change.uid, &library.id, change.permission, change.value)
        .await?;
    tracing::info!(
        by = %user.uid,
        target = %change.uid,
        library = %library.id,
        permission = %change.permission,
        value = change.value,
        "permission changed"
    );
    Ok(Json(PermissionChangeResponse::new(change.uid, &grant)))
}
