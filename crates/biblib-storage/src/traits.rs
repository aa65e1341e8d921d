//! The storage abstraction shared by all backends.

use async_trait::async_trait;
use biblib_acl::{Permission, PermissionSet};
use biblib_core::{Bibcode, DocumentAction, Library, LibraryId, LibraryPatch, NewLibrary, User, UserId};

use crate::StoreResult;

/// Persistence for users, libraries, and per-user library permissions.
///
/// Implementations must keep a library and its permission rows consistent:
/// creating a library records its owner grant, deleting it removes every
/// grant.
#[async_trait]
pub trait LibraryStore: Send + Sync {
    /// Returns the user, creating it on first sight.
    async fn ensure_user(&self, uid: UserId) -> StoreResult<User>;

    /// Looks a user up without creating it.
    async fn find_user(&self, uid: UserId) -> StoreResult<Option<User>>;

    /// Creates a library owned by `owner`.
    ///
    /// Missing fields are defaulted via [`NewLibrary::resolve_defaults`].
    /// Fails with `Conflict` if the owner already has a library of that name
    /// and with `NotFound` if the owner is unknown.
    async fn create_library(&self, owner: UserId, input: NewLibrary) -> StoreResult<Library>;

    /// Fetches a library.
    async fn get_library(&self, id: &LibraryId) -> StoreResult<Library>;

    /// Every library `uid` holds any permission on, oldest first.
    async fn list_libraries(&self, uid: UserId) -> StoreResult<Vec<(Library, PermissionSet)>>;

    /// Adds or removes documents; returns the updated library and how many
    /// documents changed.
    async fn update_documents(
        &self,
        id: &LibraryId,
        action: DocumentAction,
        bibcodes: &[Bibcode],
    ) -> StoreResult<(Library, usize)>;

    /// Applies a metadata patch; a rename is checked against the owner's
    /// other libraries.
    async fn update_metadata(&self, id: &LibraryId, patch: &LibraryPatch) -> StoreResult<Library>;

    /// Deletes a library and all of its grants.
    async fn delete_library(&self, id: &LibraryId) -> StoreResult<()>;

    /// The grant `uid` holds on a library, if any.
    async fn get_permissions(
        &self,
        uid: UserId,
        id: &LibraryId,
    ) -> StoreResult<Option<PermissionSet>>;

    /// All grants on a library.
    async fn list_permissions(&self, id: &LibraryId) -> StoreResult<Vec<(UserId, PermissionSet)>>;

    /// Sets or clears one flag of `uid`'s grant.
    ///
    /// A grant whose flags all end up false is removed.
    async fn set_permission(
        &self,
        uid: UserId,
        id: &LibraryId,
        permission: Permission,
        value: bool,
    ) -> StoreResult<PermissionSet>;

    /// Cheap liveness probe.
    async fn health_check(&self) -> StoreResult<()>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}
