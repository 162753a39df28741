//! Registry records: repositories and tags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A container repository within the registry project.
///
/// Identity is the numeric `id`; the name is what retention rules key on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Registry-assigned repository id.
    pub id: u64,

    /// Repository name (empty for the project's root repository).
    pub name: String,

    /// Full repository path (e.g. `group/app/cache`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Pull location (e.g. `registry.example.com/group/app/cache`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Repository {
    /// Creates a repository record with only the required fields.
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            path: None,
            location: None,
        }
    }

    /// Sets the repository path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Returns a human-readable label, falling back to the path or id when
    /// the name is empty.
    #[must_use]
    pub fn label(&self) -> String {
        if !self.name.is_empty() {
            return self.name.clone();
        }
        self.path
            .clone()
            .unwrap_or_else(|| format!("#{}", self.id))
    }
}

/// A tag as returned by the tag list endpoint.
///
/// The list endpoint does not carry `created_at`; a detail fetch turns a
/// `TagRef` into a [`Tag`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    /// Tag name.
    pub name: String,
}

impl TagRef {
    /// Creates a tag reference.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A tag with its creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name, unique within its repository.
    pub name: String,

    /// Id of the owning repository.
    pub repository_id: u64,

    /// Creation instant, normalised to UTC.
    pub created_at: DateTime<Utc>,

    /// Manifest digest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,

    /// Total size of the image in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_size: Option<u64>,
}

impl Tag {
    /// Creates a tag with the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, repository_id: u64, created_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            repository_id,
            created_at,
            digest: None,
            total_size: None,
        }
    }

    /// Creates a tag from an RFC 3339 timestamp such as
    /// `2024-01-01T12:00:00.000Z` or `2024-01-01T12:00:00+02:00`.
    ///
    /// The instant is converted to UTC, so tags from registries that report
    /// different offsets still compare correctly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimestamp`] if the timestamp cannot be parsed.
    ///
    /// # Examples
    ///
    /// ```
    /// use regcull_core::Tag;
    ///
    /// let a = Tag::parse("a", 1, "2024-01-01T12:00:00Z").unwrap();
    /// let b = Tag::parse("b", 1, "2024-01-01T14:00:00+02:00").unwrap();
    /// assert_eq!(a.created_at, b.created_at);
    /// ```
    pub fn parse(name: impl Into<String>, repository_id: u64, created_at: &str) -> Result<Self> {
        let name = name.into();
        let parsed = DateTime::parse_from_rfc3339(created_at.trim()).map_err(|source| {
            Error::InvalidTimestamp {
                tag: name.clone(),
                value: created_at.to_string(),
                source,
            }
        })?;
        Ok(Self::new(name, repository_id, parsed.with_timezone(&Utc)))
    }

    /// Sets the manifest digest.
    #[must_use]
    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.digest = Some(digest.into());
        self
    }

    /// Sets the total image size.
    #[must_use]
    pub const fn with_total_size(mut self, size: u64) -> Self {
        self.total_size = Some(size);
        self
    }
}
