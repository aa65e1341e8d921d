//! Resolving a requester's access to a library and authorizing actions.
//!
//! Resolution looks only at the requester's stored grant and the library's
//! visibility. A public library is readable by everyone, signed in or not,
//! but visibility never confers write or admin rights.

use biblib_core::UserId;
use serde::Serialize;

use crate::policy::{Permission, PermissionSet};
use crate::{AclError, Result};

/// Who is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requester {
    /// No user id was supplied.
    Anonymous,
    /// A user identified by the gateway.
    User(UserId),
}

impl Requester {
    /// The user id, when there is one.
    pub fn uid(&self) -> Option<UserId> {
        match self {
            Requester::Anonymous => None,
            Requester::User(uid) => Some(*uid),
        }
    }
}

impl From<Option<UserId>> for Requester {
    fn from(uid: Option<UserId>) -> Self {
        uid.map_or(Requester::Anonymous, Requester::User)
    }
}

/// Something a requester wants to do with a library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Action {
    /// Read documents and metadata.
    ViewLibrary,
    /// Append documents.
    AddDocuments,
    /// Remove documents.
    RemoveDocuments,
    /// Change name, description, or visibility.
    UpdateMetadata,
    /// Delete the library.
    DeleteLibrary,
    /// List who holds which permission.
    ViewPermissions,
    /// Grant or revoke the given permission for another user.
    ModifyPermission(Permission),
}

impl Action {
    /// Minimum level the action needs, or `None` if nobody may do it.
    pub fn required(&self) -> Option<Permission> {
        match self {
            Action::ViewLibrary => Some(Permission::Read),
            Action::AddDocuments | Action::RemoveDocuments => Some(Permission::Write),
            Action::UpdateMetadata | Action::ViewPermissions => Some(Permission::Admin),
            Action::DeleteLibrary => Some(Permission::Owner),
            Action::ModifyPermission(Permission::Read | Permission::Write) => {
                Some(Permission::Admin)
            }
            Action::ModifyPermission(Permission::Admin) => Some(Permission::Owner),
            Action::ModifyPermission(Permission::Owner) => None,
        }
    }
}

/// Outcome of resolving a requester against a library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    /// Strongest level held, counting public visibility as read.
    pub level: Option<Permission>,
    /// True when the only access comes from the library being public.
    pub via_public: bool,
}

impl Access {
    /// No access at all.
    pub const NONE: Access = Access {
        level: None,
        via_public: false,
    };

    /// True when the requester may at least view.
    pub fn can_view(&self) -> bool {
        self.level.is_some()
    }
}

/// Works out what `requester` holds on a library.
///
/// `grants` is the stored flag set for the requester, if any; anonymous
/// requesters never carry one.
pub fn resolve(requester: Requester, grants: Option<&PermissionSet>, public: bool) -> Access {
    let held = match requester {
        Requester::Anonymous => None,
        Requester::User(_) => grants.and_then(PermissionSet::highest),
    };
    match held {
        Some(level) => Access {
            level: Some(level),
            via_public: false,
        },
        None if public => Access {
            level: Some(Permission::Read),
            via_public: true,
        },
        None => Access::NONE,
    }
}

/// Checks `action` against a resolved access.
pub fn authorize(access: &Access, action: Action) -> Result<()> {
    match (access.level, action.required()) {
        (Some(held), Some(needed)) if held >= needed => Ok(()),
        _ => Err(AclError::Forbidden { action }),
    }
}
