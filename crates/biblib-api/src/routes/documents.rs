//! `/documents/<library>` handlers: document changes, metadata, deletion.

use axum::Json;
use axum::extract::{Path, State};
use biblib_acl::{Action, Requester, authorize};
use biblib_auth::AuthenticatedUser;
use biblib_core::{DocumentAction, LibraryPatch};
use serde_json::{Map, Value};

use crate::error::{ApiResult, WRONG_TYPE_ERROR};
use crate::extract::JsonBody;
use crate::routes::load_library;
use crate::state::AppState;
use crate::types::{DocumentsRequest, DocumentsResponse};

/// `POST /documents/<library>`: add or remove bibcodes.
pub async fn modify_documents(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(library): Path<String>,
    JsonBody(body): JsonBody<DocumentsRequest>,
) -> ApiResult<Json<DocumentsResponse>> {
    let action = body.action;
    let bibcodes = body.bibcodes()?;

    let (library, access) = load_library(&state, Requester::User(user.uid), &library).await?;
    let needed = match action {
        DocumentAction::Add => Action::AddDocuments,
        DocumentAction::Remove => Action::RemoveDocuments,
    };
    authorize(&access, needed)?;

    let (_, changed) = state
        .store
        .update_documents(&library.id, action, &bibcodes)
        .await?;
    tracing::debug!(library = %library.id, ?action, changed, "documents updated");
    Ok(Json(DocumentsResponse::new(action, changed)))
}

/// `PUT /documents/<library>`: change name, description, or visibility.
///
/// Answers with the fields that were supplied, at their new values.
pub async fn update_metadata(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(library): Path<String>,
    JsonBody(patch): JsonBody<LibraryPatch>,
) -> ApiResult<Json<Map<String, Value>>> {
    if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(WRONG_TYPE_ERROR.into());
    }

    let (library, access) = load_library(&state, Requester::User(user.uid), &library).await?;
    authorize(&access, Action::UpdateMetadata)?;

    let updated = state.store.update_metadata(&library.id, &patch).await?;
    let mut changed = Map::new();
    if patch.name.is_some() {
        changed.insert("name".into(), Value::from(updated.name));
    }
    if patch.description.is_some() {
        changed.insert("description".into(), Value::from(updated.description));
    }
    if patch.public.is_some() {
        changed.insert("public".into(), Value::from(updated.public));
    }
    Ok(Json(changed))
}

/// `DELETE /documents/<library>`: remove the library; owner only.
pub async fn delete_library(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(library): Path<String>,
) -> ApiResult<Json<Map<String, Value>>> {
    let (library, access) = load_library(&state, Requester::User(user.uid), &library).await?;
    authorize(&access, Action::DeleteLibrary)?;

    state.store.delete_library(&library.id).await?;
    tracing::info!(uid = %user.uid, library = %library.id, "library deleted");
    Ok(Json(Map::new()))
}
