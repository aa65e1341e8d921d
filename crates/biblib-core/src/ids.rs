//! Identifier types for users, libraries, and documents.
//!
//! Library ids are UUIDs internally. On the wire they travel as a 22
//! character, URL-safe, unpadded base64 encoding of the UUID bytes (the
//! "slug"), which is what appears in `/libraries/<library>` URLs.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::{Error, Result};

// ============================================================================
// UserId
// ============================================================================

/// Absolute user id asserted by the upstream identity service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Wraps a raw absolute uid.
    pub const fn new(uid: u64) -> Self {
        Self(uid)
    }

    /// Returns the raw absolute uid.
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UserId {
    fn from(uid: u64) -> Self {
        Self(uid)
    }
}

impl FromStr for UserId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| Error::InvalidUserId(s.to_string()))
    }
}

// ============================================================================
// LibraryId
// ============================================================================

/// Unique identifier for a library.
///
/// Displays and serializes as its slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LibraryId(Uuid);

impl LibraryId {
    /// Creates a new random library id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a library id from a UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Encodes the id as a URL-safe slug.
    ///
    /// # Examples
    ///
    /// ```
    /// use biblib_core::LibraryId;
    ///
    /// let id = LibraryId::new();
    /// assert_eq!(id.to_slug().len(), 22);
    /// assert_eq!(LibraryId::parse(&id.to_slug()).unwrap(), id);
    /// ```
    pub fn to_slug(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0.as_bytes())
    }

    /// Parses either a slug or a hyphenated UUID.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(uuid) = Uuid::parse_str(s) {
            return Ok(Self(uuid));
        }
        let bytes = URL_SAFE_NO_PAD
            .decode(s)
            .map_err(|_| Error::InvalidLibraryId(s.to_string()))?;
        let uuid = Uuid::from_slice(&bytes).map_err(|_| Error::InvalidLibraryId(s.to_string()))?;
        Ok(Self(uuid))
    }
}

impl Default for LibraryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LibraryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_slug())
    }
}

impl FromStr for LibraryId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Uuid> for LibraryId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Serialize for LibraryId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_slug())
    }
}

impl<'de> Deserialize<'de> for LibraryId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Bibcode
// ============================================================================

/// An opaque document identifier, usually a 19 character ADS bibcode.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Bibcode(String);

impl Bibcode {
    /// Creates a bibcode, trimming surrounding whitespace.
    ///
    /// ```
    /// use biblib_core::Bibcode;
    ///
    /// assert_eq!(Bibcode::new(" 2015ApJ...800..001A ").unwrap().as_str(), "2015ApJ...800..001A");
    /// assert!(Bibcode::new("   ").is_err());
    /// ```
    pub fn new(s: impl AsRef<str>) -> Result<Self> {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidBibcode(s.as_ref().to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the bibcode as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Bibcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Bibcode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}
