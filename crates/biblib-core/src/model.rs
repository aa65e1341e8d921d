//! Domain model: users, libraries, and the inputs that change them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::ids::{Bibcode, LibraryId, UserId};

/// Description given to libraries created without one.
pub const DEFAULT_DESCRIPTION: &str = "My ADS library";

/// A user known to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Absolute uid from the identity service.
    pub uid: UserId,
    /// When the user was first seen.
    pub date_created: DateTime<Utc>,
}

impl User {
    /// Creates a user first seen now.
    pub fn new(uid: UserId) -> Self {
        Self {
            uid,
            date_created: Utc::now(),
        }
    }
}

// ============================================================================
// Library
// ============================================================================

/// A named, ordered, duplicate-free collection of bibcodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    /// Library identity.
    pub id: LibraryId,
    /// Name, unique per owner.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Whether anyone may view the library.
    pub public: bool,
    /// Documents in insertion order.
    pub documents: Vec<Bibcode>,
    /// Creation time.
    pub date_created: DateTime<Utc>,
    /// Last time documents or metadata changed.
    pub date_last_modified: DateTime<Utc>,
}

impl Library {
    /// Builds a fresh library from fully-resolved creation input.
    pub fn create(input: NewLibrary) -> Self {
        let now = Utc::now();
        let mut library = Self {
            id: LibraryId::new(),
            name: input.name.unwrap_or_default(),
            description: input.description.unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            public: input.public.unwrap_or(false),
            documents: Vec::new(),
            date_created: now,
            date_last_modified: now,
        };
        library.push_unique(&input.documents);
        library
    }

    /// Number of documents held.
    pub fn num_documents(&self) -> usize {
        self.documents.len()
    }

    /// Appends the bibcodes not already present.
    ///
    /// Returns how many were added.
    pub fn add_documents(&mut self, bibcodes: &[Bibcode]) -> usize {
        let added = self.push_unique(bibcodes);
        if added > 0 {
            self.touch();
        }
        added
    }

    /// Removes every listed bibcode that is present.
    ///
    /// Returns how many were removed.
    pub fn remove_documents(&mut self, bibcodes: &[Bibcode]) -> usize {
        let doomed: HashSet<&Bibcode> = bibcodes.iter().collect();
        let before = self.documents.len();
        self.documents.retain(|b| !doomed.contains(b));
        let removed = before - self.documents.len();
        if removed > 0 {
            self.touch();
        }
        removed
    }

    /// Overwrites the metadata fields present in `patch`.
    pub fn apply_patch(&mut self, patch: &LibraryPatch) {
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(public) = patch.public {
            self.public = public;
        }
        if !patch.is_empty() {
            self.touch();
        }
    }

    fn push_unique(&mut self, bibcodes: &[Bibcode]) -> usize {
        let mut seen: HashSet<Bibcode> = self.documents.iter().cloned().collect();
        let mut added = 0;
        for bibcode in bibcodes {
            if seen.insert(bibcode.clone()) {
                self.documents.push(bibcode.clone());
                added += 1;
            }
        }
        added
    }

    fn touch(&mut self) {
        let now = Utc::now();
        if now > self.date_last_modified {
            self.date_last_modified = now;
        }
    }
}

// ============================================================================
// Inputs
// ============================================================================

/// Input for creating a library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewLibrary {
    /// Requested name; blank or missing gets a generated one.
    pub name: Option<String>,
    /// Requested description.
    pub description: Option<String>,
    /// Requested visibility.
    pub public: Option<bool>,
    /// Documents to seed the library with.
    #[serde(default)]
    pub documents: Vec<Bibcode>,
}

impl NewLibrary {
    /// Fills in missing fields.
    ///
    /// `owned_names` are the names of the libraries the owner already has. A
    /// generated name starts at "Untitled Library {count + 1}" and counts up
    /// until it is free, so only an explicitly given name can collide.
    ///
    /// ```
    /// use biblib_core::NewLibrary;
    ///
    /// let resolved = NewLibrary::default().resolve_defaults(["Job", "Untitled Library 3"]);
    /// assert_eq!(resolved.name.as_deref(), Some("Untitled Library 4"));
    /// assert_eq!(resolved.public, Some(false));
    /// ```
    pub fn resolve_defaults<'a>(
        mut self,
        owned_names: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let given = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        let name = match given {
            Some(name) => name,
            None => {
                let taken: HashSet<&str> = owned_names.into_iter().collect();
                let mut n = taken.len() + 1;
                let mut candidate = untitled_name(n);
                while taken.contains(candidate.as_str()) {
                    n += 1;
                    candidate = untitled_name(n);
                }
                candidate
            }
        };
        self.name = Some(name);
        if self.description.is_none() {
            self.description = Some(DEFAULT_DESCRIPTION.to_string());
        }
        if self.public.is_none() {
            self.public = Some(false);
        }
        self
    }
}

fn untitled_name(n: usize) -> String {
    format!("Untitled Library {n}")
}

/// Metadata update for an existing library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryPatch {
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New visibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
}

impl LibraryPatch {
    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.public.is_none()
    }
}

/// What to do with the bibcodes in a document request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentAction {
    /// Append to the library.
    Add,
    /// Remove from the library.
    Remove,
}
