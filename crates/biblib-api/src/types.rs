//! Request and response bodies.

use biblib_acl::{Permission, PermissionSet};
use biblib_core::{Bibcode, DocumentAction, Library, LibraryId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ApiResult, MISSING_DOCUMENT_ERROR};

/// One bibcode or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BibcodeInput {
    /// A single bibcode.
    One(String),
    /// Several bibcodes.
    Many(Vec<String>),
}

impl BibcodeInput {
    /// Validates every entry.
    pub fn into_bibcodes(self) -> ApiResult<Vec<Bibcode>> {
        let raw = match self {
            BibcodeInput::One(code) => vec![code],
            BibcodeInput::Many(codes) => codes,
        };
        Ok(raw.iter().map(Bibcode::new).collect::<Result<_, _>>()?)
    }
}

/// `POST /libraries` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateLibraryRequest {
    /// Requested name.
    pub name: Option<String>,
    /// Requested description.
    pub description: Option<String>,
    /// Requested visibility.
    pub public: Option<bool>,
    /// Documents to seed the library with.
    pub bibcode: Option<BibcodeInput>,
}

/// `POST /libraries` response.
#[derive(Debug, Clone, Serialize)]
pub struct CreateLibraryResponse {
    /// Name as stored.
    pub name: String,
    /// Library slug.
    pub id: LibraryId,
    /// Description as stored.
    pub description: String,
    /// Visibility.
    pub public: bool,
    /// Documents the library starts with.
    pub bibcode: Vec<Bibcode>,
}

impl From<Library> for CreateLibraryResponse {
    fn from(lib: Library) -> Self {
        Self {
            name: lib.name,
            id: lib.id,
            description: lib.description,
            public: lib.public,
            bibcode: lib.documents,
        }
    }
}

/// Library metadata as listed and viewed.
#[derive(Debug, Clone, Serialize)]
pub struct LibrarySummary {
    /// Name.
    pub name: String,
    /// Library slug.
    pub id: LibraryId,
    /// Description.
    pub description: String,
    /// Visibility.
    pub public: bool,
    /// Document count.
    pub num_documents: usize,
    /// Creation time.
    pub date_created: DateTime<Utc>,
    /// Last change.
    pub date_last_modified: DateTime<Utc>,
    /// The caller's strongest permission; absent for public-only access.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission: Option<Permission>,
}

impl LibrarySummary {
    /// Summarises `lib` as seen by a caller holding `permission`.
    pub fn new(lib: &Library, permission: Option<Permission>) -> Self {
        Self {
            name: lib.name.clone(),
            id: lib.id,
            description: lib.description.clone(),
            public: lib.public,
            num_documents: lib.num_documents(),
            date_created: lib.date_created,
            date_last_modified: lib.date_last_modified,
            permission,
        }
    }
}

/// `GET /libraries` response.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryListResponse {
    /// Every library the caller holds a permission on.
    pub libraries: Vec<LibrarySummary>,
}

/// `GET /libraries/<library>` response.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryViewResponse {
    /// Documents in insertion order.
    pub documents: Vec<Bibcode>,
    /// Library metadata.
    pub metadata: LibrarySummary,
}

/// `POST /documents/<library>` body.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentsRequest {
    /// Bibcodes to add or remove.
    pub bibcode: Option<BibcodeInput>,
    /// Whether to add or remove them.
    pub action: DocumentAction,
}

impl DocumentsRequest {
    /// The validated, non-empty bibcode list.
    pub fn bibcodes(self) -> ApiResult<Vec<Bibcode>> {
        let bibcodes = self
            .bibcode
            .ok_or(MISSING_DOCUMENT_ERROR)?
            .into_bibcodes()?;
        if bibcodes.is_empty() {
            return Err(MISSING_DOCUMENT_ERROR.into());
        }
        Ok(bibcodes)
    }
}

/// `POST /documents/<library>` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentsResponse {
    /// Count after an add.
    NumberAdded(usize),
    /// Count after a remove.
    NumberRemoved(usize),
}

impl DocumentsResponse {
    /// Pairs a changed count with the action that produced it.
    pub fn new(action: DocumentAction, changed: usize) -> Self {
        match action {
            DocumentAction::Add => DocumentsResponse::NumberAdded(changed),
            DocumentAction::Remove => DocumentsResponse::NumberRemoved(changed),
        }
    }
}

/// `POST /permissions/<library>` body.
#[derive(Debug, Clone, Deserialize)]
pub struct PermissionChangeRequest {
    /// Whose grant changes.
    pub uid: UserId,
    /// Which flag changes.
    pub permission: Permission,
    /// Grant (`true`) or revoke (`false`).
    pub value: bool,
}

/// `POST /permissions/<library>` response.
#[derive(Debug, Clone, Serialize)]
pub struct PermissionChangeResponse {
    /// Whose grant changed.
    pub uid: UserId,
    /// The flags now held, strongest first.
    pub permissions: Vec<&'static str>,
}

impl PermissionChangeResponse {
    /// Reports `set` for `uid`.
    pub fn new(uid: UserId, set: &PermissionSet) -> Self {
        Self {
            uid,
            permissions: set.names(),
        }
    }
}
