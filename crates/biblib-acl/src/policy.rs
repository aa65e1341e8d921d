//! Permission levels and the per-library flag set stored for each user.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AclError;

/// A permission level, ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// View the library.
    Read,
    /// Add and remove documents.
    Write,
    /// Change metadata and grant read/write.
    Admin,
    /// Everything, including deleting the library and granting admin.
    Owner,
}

impl Permission {
    /// All levels, weakest first.
    pub const ALL: [Permission; 4] = [
        Permission::Read,
        Permission::Write,
        Permission::Admin,
        Permission::Owner,
    ];

    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::Admin => "admin",
            Permission::Owner => "owner",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = AclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "read" => Ok(Permission::Read),
            "write" => Ok(Permission::Write),
            "admin" => Ok(Permission::Admin),
            "owner" => Ok(Permission::Owner),
            other => Err(AclError::UnknownPermission(other.to_string())),
        }
    }
}

/// The four flags stored for one (user, library) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionSet {
    /// May view.
    pub read: bool,
    /// May edit documents.
    pub write: bool,
    /// May administer.
    pub admin: bool,
    /// Owns the library.
    pub owner: bool,
}

impl PermissionSet {
    /// The grant recorded for a library's creator.
    pub fn owner() -> Self {
        Self {
            read: true,
            write: true,
            admin: true,
            owner: true,
        }
    }

    /// A set holding exactly one flag.
    pub fn only(permission: Permission) -> Self {
        let mut set = Self::default();
        set.set(permission, true);
        set
    }

    /// Reads one flag.
    pub fn has(&self, permission: Permission) -> bool {
        match permission {
            Permission::Read => self.read,
            Permission::Write => self.write,
            Permission::Admin => self.admin,
            Permission::Owner => self.owner,
        }
    }

    /// Writes one flag.
    pub fn set(&mut self, permission: Permission, value: bool) {
        match permission {
            Permission::Read => self.read = value,
            Permission::Write => self.write = value,
            Permission::Admin => self.admin = value,
            Permission::Owner => self.owner = value,
        }
    }

    /// True when no flag is set.
    pub fn is_empty(&self) -> bool {
        !(self.read || self.write || self.admin || self.owner)
    }

    /// Strongest flag held, if any.
    pub fn highest(&self) -> Option<Permission> {
        Permission::ALL.into_iter().rev().find(|p| self.has(*p))
    }

    /// Names of the flags held, strongest first.
    pub fn names(&self) -> Vec<&'static str> {
        Permission::ALL
            .into_iter()
            .rev()
            .filter(|p| self.has(*p))
            .map(|p| p.as_str())
            .collect()
    }
}
