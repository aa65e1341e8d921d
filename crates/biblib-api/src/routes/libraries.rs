//! `/libraries` handlers.

use axum::Json;
use axum::extract::{Path, State};
use biblib_acl::{Action, Requester, authorize};
use biblib_auth::{AuthenticatedUser, MaybeUser};
use biblib_core::NewLibrary;

use crate::error::ApiResult;
use crate::extract::JsonBody;
use crate::routes::load_library;
use crate::state::AppState;
use crate::types::{
    CreateLibraryRequest, CreateLibraryResponse, LibraryListResponse, LibrarySummary,
    LibraryViewResponse,
};

/// `GET /libraries`: every library the caller holds a permission on.
pub async fn list_libraries(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<LibraryListResponse>> {
    state.store.ensure_user(user.uid).await?;
    let libraries = state
        .store
        .list_libraries(user.uid)
        .await?
        .iter()
        .map(|(lib, grant)| LibrarySummary::new(lib, grant.highest()))
        .collect();
    Ok(Json(LibraryListResponse { libraries }))
}

/// `POST /libraries`: create a library owned by the caller.
pub async fn create_library(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    JsonBody(body): JsonBody<CreateLibraryRequest>,
) -> ApiResult<Json<CreateLibraryResponse>> {
    let documents = match body.bibcode {
        Some(input) => input.into_bibcodes()?,
        None => Vec::new(),
    };
    let input = NewLibrary {
        name: body.name,
        description: body.description,
        public: body.public,
        documents,
    };

    state.store.ensure_user(user.uid).await?;
    let library = state.store.create_library(user.uid, input).await?;
    tracing::info!(uid = %user.uid, library = %library.id, name = %library.name, "library created");
    Ok(Json(library.into()))
}

/// `GET /libraries/<library>`: documents and metadata, for anyone who may
/// view the library.
pub async fn view_library(
    State(state): State<AppState>,
    caller: MaybeUser,
    Path(library): Path<String>,
) -> ApiResult<Json<LibraryViewResponse>> {
    let requester = Requester::from(caller.uid());
    let (library, access) = load_library(&state, requester, &library).await?;
    authorize(&access, Action::ViewLibrary)?;

    let permission = if access.via_public { None } else { access.level };
    let metadata = LibrarySummary::new(&library, permission);
    Ok(Json(LibraryViewResponse {
        documents: library.documents,
        metadata,
    }))
}
