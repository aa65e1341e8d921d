//! In-memory implementation of [`LibraryStore`].
//!
//! All state sits behind one `tokio::sync::RwLock`, so every mutation is
//! atomic with respect to other callers in the same process. Nothing
//! survives a restart.

use std::collections::HashMap;

use async_trait::async_trait;
use biblib_acl::{Permission, PermissionSet};
use biblib_core::{Bibcode, DocumentAction, Library, LibraryId, LibraryPatch, NewLibrary, User, UserId};
use tokio::sync::RwLock;

use crate::{LibraryStore, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<UserId, User>,
    /// Library plus its creation sequence number, for stable ordering.
    libraries: HashMap<LibraryId, (u64, Library)>,
    grants: HashMap<(UserId, LibraryId), PermissionSet>,
    next_seq: u64,
}

impl Inner {
    fn library_mut(&mut self, id: &LibraryId) -> StoreResult<&mut Library> {
        self.libraries
            .get_mut(id)
            .map(|(_, lib)| lib)
            .ok_or_else(|| StoreError::NotFound(format!("library {id}")))
    }

    fn owner_of(&self, id: &LibraryId) -> Option<UserId> {
        self.grants
            .iter()
            .find(|((_, lib), set)| lib == id && set.owner)
            .map(|((uid, _), _)| *uid)
    }

    fn owned_names(&self, owner: UserId) -> impl Iterator<Item = (&LibraryId, &str)> {
        self.grants
            .iter()
            .filter(move |((uid, _), set)| *uid == owner && set.owner)
            .filter_map(move |((_, id), _)| self.libraries.get(id))
            .map(|(_, lib)| (&lib.id, lib.name.as_str()))
    }
}

/// Non-durable store for tests and local development.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LibraryStore for MemoryStore {
    async fn ensure_user(&self, uid: UserId) -> StoreResult<User> {
        let mut inner = self.inner.write().await;
        let user = inner.users.entry(uid).or_insert_with(|| User::new(uid));
        Ok(user.clone())
    }

    async fn find_user(&self, uid: UserId) -> StoreResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&uid).cloned())
    }

    async fn create_library(&self, owner: UserId, input: NewLibrary) -> StoreResult<Library> {
        let mut inner = self.inner.write().await;
        if !inner.users.contains_key(&owner) {
            return Err(StoreError::NotFound(format!("user {owner}")));
        }

        let owned: Vec<&str> = inner.owned_names(owner).map(|(_, name)| name).collect();
        let library = Library::create(input.resolve_defaults(owned.iter().copied()));
        if owned.contains(&library.name.as_str()) {
            return Err(StoreError::Conflict(format!(
                "library named {:?} already exists",
                library.name
            )));
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner
            .grants
            .insert((owner, library.id), PermissionSet::owner());
        inner.libraries.insert(library.id, (seq, library.clone()));
        Ok(library)
    }

    async fn get_library(&self, id: &LibraryId) -> StoreResult<Library> {
        self.inner
            .read()
            .await
            .libraries
            .get(id)
            .map(|(_, lib)| lib.clone())
            .ok_or_else(|| StoreError::NotFound(format!("library {id}")))
    }

    async fn list_libraries(&self, uid: UserId) -> StoreResult<Vec<(Library, PermissionSet)>> {
        let inner = self.inner.read().await;
        let mut found: Vec<(u64, Library, PermissionSet)> = inner
            .grants
            .iter()
            .filter(|((holder, _), _)| *holder == uid)
            .filter_map(|((_, id), set)| {
                inner
                    .libraries
                    .get(id)
                    .map(|(seq, lib)| (*seq, lib.clone(), *set))
            })
            .collect();
        found.sort_by_key(|(seq, _, _)| *seq);
        Ok(found.into_iter().map(|(_, lib, set)| (lib, set)).collect())
    }

    async fn update_documents(
        &self,
        id: &LibraryId,
        action: DocumentAction,
        bibcodes: &[Bibcode],
    ) -> StoreResult<(Library, usize)> {
        let mut inner = self.inner.write().await;
        let library = inner.library_mut(id)?;
        let changed = match action {
            DocumentAction::Add => library.add_documents(bibcodes),
            DocumentAction::Remove => library.remove_documents(bibcodes),
        };
        Ok((library.clone(), changed))
    }

    async fn update_metadata(&self, id: &LibraryId, patch: &LibraryPatch) -> StoreResult<Library> {
        let mut inner = self.inner.write().await;
        if !inner.libraries.contains_key(id) {
            return Err(StoreError::NotFound(format!("library {id}")));
        }
        if let (Some(name), Some(owner)) = (&patch.name, inner.owner_of(id)) {
            let name = name.trim();
            if inner
                .owned_names(owner)
                .any(|(other, existing)| other != id && existing == name)
            {
                return Err(StoreError::Conflict(format!(
                    "library named {name:?} already exists"
                )));
            }
        }
        let library = inner.library_mut(id)?;
        library.apply_patch(patch);
        Ok(library.clone())
    }

    async fn delete_library(&self, id: &LibraryId) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.libraries.remove(id).is_none() {
            return Err(StoreError::NotFound(format!("library {id}")));
        }
        inner.grants.retain(|(_, lib), _| lib != id);
        Ok(())
    }

    async fn get_permissions(
        &self,
        uid: UserId,
        id: &LibraryId,
    ) -> StoreResult<Option<PermissionSet>> {
        Ok(self.inner.read().await.grants.get(&(uid, *id)).copied())
    }

    async fn list_permissions(&self, id: &LibraryId) -> StoreResult<Vec<(UserId, PermissionSet)>> {
        let inner = self.inner.read().await;
        if !inner.libraries.contains_key(id) {
            return Err(StoreError::NotFound(format!("library {id}")));
        }
        let mut grants: Vec<(UserId, PermissionSet)> = inner
            .grants
            .iter()
            .filter(|((_, lib), _)| lib == id)
            .map(|((uid, _), set)| (*uid, *set))
            .collect();
        grants.sort_by_key(|(uid, _)| *uid);
        Ok(grants)
    }

    async fn set_permission(
        &self,
        uid: UserId,
        id: &LibraryId,
        permission: Permission,
        value: bool,
    ) -> StoreResult<PermissionSet> {
        let mut inner = self.inner.write().await;
        if !inner.users.contains_key(&uid) {
            return Err(StoreError::NotFound(format!("user {uid}")));
        }
        if !inner.libraries.contains_key(id) {
            return Err(StoreError::NotFound(format!("library {id}")));
        }
        let key = (uid, *id);
        let mut set = inner.grants.get(&key).copied().unwrap_or_default();
        set.set(permission, value);
        if set.is_empty() {
            inner.grants.remove(&key);
        } else {
            inner.grants.insert(key, set);
        }
        Ok(set)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
