//! Registry API payloads.
//!
//! These mirror the JSON the container registry API returns. Required fields
//! are validated when converting into the `regcull_core` records, so a
//! missing or malformed `created_at` surfaces as a typed error rather than
//! travelling further as raw JSON.

use serde::Deserialize;

use regcull_core::{Repository, Tag, TagRef};

use crate::error::{RegistryError, Result};

/// Entry of the repository list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryEntry {
    /// Repository id.
    pub id: Option<u64>,
    /// Repository name.
    #[serde(default)]
    pub name: Option<String>,
    /// Full repository path.
    #[serde(default)]
    pub path: Option<String>,
    /// Pull location.
    #[serde(default)]
    pub location: Option<String>,
}

impl TryFrom<RepositoryEntry> for Repository {
    type Error = RegistryError;

    fn try_from(entry: RepositoryEntry) -> Result<Self> {
        let id = entry.id.ok_or_else(|| RegistryError::MalformedPayload {
            message: format!(
                "repository entry without id (path: {})",
                entry.path.as_deref().unwrap_or("unknown")
            ),
        })?;

        Ok(Self {
            id,
            // The project's root repository has an empty name.
            name: entry.name.unwrap_or_default(),
            path: entry.path,
            location: entry.location,
        })
    }
}

/// Entry of the tag list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TagEntry {
    /// Tag name.
    pub name: Option<String>,
}

impl TryFrom<TagEntry> for TagRef {
    type Error = RegistryError;

    fn try_from(entry: TagEntry) -> Result<Self> {
        entry
            .name
            .filter(|name| !name.is_empty())
            .map(Self::new)
            .ok_or_else(|| RegistryError::MalformedPayload {
                message: "tag entry without name".to_string(),
            })
    }
}

/// Tag detail payload.
#[derive(Debug, Clone, Deserialize)]
pub struct TagDetail {
    /// Tag name.
    pub name: Option<String>,
    /// Creation timestamp (RFC 3339).
    pub created_at: Option<String>,
    /// Manifest digest.
    #[serde(default)]
    pub digest: Option<String>,
    /// Total image size in bytes.
    #[serde(default)]
    pub total_size: Option<u64>,
}

impl TagDetail {
    /// Validates the payload into a [`Tag`] of the given repository.
    ///
    /// `requested` is the tag name used in the request; it fills in for a
    /// payload that omits the name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::MalformedPayload`] if `created_at` is
    /// missing or not a valid RFC 3339 timestamp.
    pub fn into_tag(self, repository_id: u64, requested: &str) -> Result<Tag> {
        let name = self.name.unwrap_or_else(|| requested.to_string());
        let created_at = self
            .created_at
            .ok_or_else(|| RegistryError::MalformedPayload {
                message: format!("tag {name} in repository {repository_id} has no created_at"),
            })?;

        let mut tag = Tag::parse(name, repository_id, &created_at)?;
        if let Some(digest) = self.digest {
            tag = tag.with_digest(digest);
        }
        if let Some(size) = self.total_size {
            tag = tag.with_total_size(size);
        }
        Ok(tag)
    }
}
