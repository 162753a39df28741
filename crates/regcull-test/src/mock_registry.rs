//! In-memory registry for orchestrator tests.
//!
//! [`MockRegistry`] serves repositories and tags from memory, applies
//! deletions to its state, and records every call in order so tests can
//! assert exactly which requests a cleanup run issued.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use parking_lot::Mutex;

use regcull_core::{Repository, Tag, TagRef};
use regcull_registry::{RegistryApi, RegistryError, Result, StatusCode};

/// A call received by [`MockRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCall {
    /// `list_repositories`.
    ListRepositories,
    /// `list_tags`.
    ListTags {
        /// Repository id.
        repository_id: u64,
        /// Requested page.
        page: u32,
        /// Requested page size.
        per_page: u32,
    },
    /// `get_tag_detail`.
    GetTagDetail {
        /// Repository id.
        repository_id: u64,
        /// Tag name.
        tag: String,
    },
    /// `delete_tag`.
    DeleteTag {
        /// Repository id.
        repository_id: u64,
        /// Tag name.
        tag: String,
    },
    /// `delete_repository`.
    DeleteRepository {
        /// Repository id.
        repository_id: u64,
    },
}

impl RegistryCall {
    /// Returns the repository the call targets, if any.
    #[must_use]
    pub const fn repository_id(&self) -> Option<u64> {
        match self {
            Self::ListRepositories => None,
            Self::ListTags { repository_id, .. }
            | Self::GetTagDetail { repository_id, .. }
            | Self::DeleteTag { repository_id, .. }
            | Self::DeleteRepository { repository_id } => Some(*repository_id),
        }
    }

    /// Returns true for calls that change registry state.
    #[must_use]
    pub const fn is_mutating(&self) -> bool {
        matches!(self, Self::DeleteTag { .. } | Self::DeleteRepository { .. })
    }
}

#[derive(Debug, Default)]
struct State {
    repositories: Vec<Repository>,
    tags: BTreeMap<u64, Vec<Tag>>,
}

/// In-memory [`RegistryApi`] implementation.
#[derive(Debug, Default)]
pub struct MockRegistry {
    state: Mutex<State>,
    calls: Mutex<Vec<RegistryCall>>,
    fail_repository_listing: bool,
    failing_tag_listings: BTreeSet<u64>,
    vanished_repositories: BTreeSet<u64>,
    vanished_tags: BTreeSet<(u64, String)>,
    tag_delete_statuses: BTreeMap<(u64, String), StatusCode>,
    repository_delete_status: Option<StatusCode>,
}

impl MockRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a repository with its tags, in fetch order.
    #[must_use]
    pub fn with_repository(self, repository: Repository, tags: Vec<Tag>) -> Self {
        {
            let mut state = self.state.lock();
            state.tags.insert(repository.id, tags);
            state.repositories.push(repository);
        }
        self
    }

    /// Makes `list_repositories` fail with a transport error.
    #[must_use]
    pub const fn failing_repository_listing(mut self) -> Self {
        self.fail_repository_listing = true;
        self
    }

    /// Makes `list_tags` fail with a transport error for a repository.
    #[must_use]
    pub fn failing_tag_listing(mut self, repository_id: u64) -> Self {
        self.failing_tag_listings.insert(repository_id);
        self
    }

    /// Keeps a repository in the repository listing but answers its tag
    /// listing with `NotFound`.
    #[must_use]
    pub fn with_vanished_repository(mut self, repository_id: u64) -> Self {
        self.vanished_repositories.insert(repository_id);
        self
    }

    /// Keeps a tag in listings but answers its detail fetch with `NotFound`.
    #[must_use]
    pub fn with_vanished_tag(mut self, repository_id: u64, tag: impl Into<String>) -> Self {
        self.vanished_tags.insert((repository_id, tag.into()));
        self
    }

    /// Answers the deletion of a tag with the given status.
    ///
    /// Non-success statuses leave the tag in place.
    #[must_use]
    pub fn with_tag_delete_status(
        mut self,
        repository_id: u64,
        tag: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        self.tag_delete_statuses
            .insert((repository_id, tag.into()), status);
        self
    }

    /// Answers repository deletions with the given status instead of
    /// `202 Accepted`.
    #[must_use]
    pub const fn with_repository_delete_status(mut self, status: StatusCode) -> Self {
        self.repository_delete_status = Some(status);
        self
    }

    /// Returns every call received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RegistryCall> {
        self.calls.lock().clone()
    }

    /// Returns the calls that targeted a repository.
    #[must_use]
    pub fn calls_for(&self, repository_id: u64) -> Vec<RegistryCall> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.repository_id() == Some(repository_id))
            .cloned()
            .collect()
    }

    /// Returns the delete calls received so far.
    #[must_use]
    pub fn mutating_calls(&self) -> Vec<RegistryCall> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.is_mutating())
            .cloned()
            .collect()
    }

    /// Returns the names of the tags a repository currently holds.
    #[must_use]
    pub fn tag_names(&self, repository_id: u64) -> Vec<String> {
        self.state
            .lock()
            .tags
            .get(&repository_id)
            .map(|tags| tags.iter().map(|t| t.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Returns true if the repository still exists.
    #[must_use]
    pub fn has_repository(&self, repository_id: u64) -> bool {
        self.state
            .lock()
            .repositories
            .iter()
            .any(|r| r.id == repository_id)
    }

    fn record(&self, call: RegistryCall) {
        self.calls.lock().push(call);
    }

    fn transport_error(what: &str) -> RegistryError {
        RegistryError::HttpError {
            status: 503,
            message: format!("{what} unavailable"),
        }
    }
}

#[async_trait]
impl RegistryApi for MockRegistry {
    async fn list_repositories(&self) -> Result<Vec<Repository>> {
        self.record(RegistryCall::ListRepositories);

        if self.fail_repository_listing {
            return Err(Self::transport_error("repository listing"));
        }

        Ok(self.state.lock().repositories.clone())
    }

    async fn list_tags(&self, repository_id: u64, page: u32, per_page: u32) -> Result<Vec<TagRef>> {
        self.record(RegistryCall::ListTags {
            repository_id,
            page,
            per_page,
        });

        if self.failing_tag_listings.contains(&repository_id) {
            return Err(Self::transport_error("tag listing"));
        }

        let not_found = || RegistryError::NotFound {
            resource: format!("repository {repository_id}"),
        };

        if self.vanished_repositories.contains(&repository_id) {
            return Err(not_found());
        }

        let state = self.state.lock();
        let tags = state.tags.get(&repository_id).ok_or_else(not_found)?;

        let per_page = per_page.max(1) as usize;
        let start = (page.max(1) as usize - 1).saturating_mul(per_page);
        Ok(tags
            .iter()
            .skip(start)
            .take(per_page)
            .map(|t| TagRef::new(t.name.clone()))
            .collect())
    }

    async fn get_tag_detail(&self, repository_id: u64, tag_name: &str) -> Result<Tag> {
        self.record(RegistryCall::GetTagDetail {
            repository_id,
            tag: tag_name.to_string(),
        });

        let not_found = || RegistryError::NotFound {
            resource: format!("tag {tag_name} in repository {repository_id}"),
        };

        if self
            .vanished_tags
            .contains(&(repository_id, tag_name.to_string()))
        {
            return Err(not_found());
        }

        self.state
            .lock()
            .tags
            .get(&repository_id)
            .and_then(|tags| tags.iter().find(|t| t.name == tag_name).cloned())
            .ok_or_else(not_found)
    }

    async fn delete_tag(&self, repository_id: u64, tag_name: &str) -> Result<StatusCode> {
        self.record(RegistryCall::DeleteTag {
            repository_id,
            tag: tag_name.to_string(),
        });

        let status = self
            .tag_delete_statuses
            .get(&(repository_id, tag_name.to_string()))
            .copied()
            .unwrap_or(StatusCode::OK);

        if status.is_success() {
            if let Some(tags) = self.state.lock().tags.get_mut(&repository_id) {
                tags.retain(|t| t.name != tag_name);
            }
        }

        Ok(status)
    }

    async fn delete_repository(&self, repository_id: u64) -> Result<StatusCode> {
        self.record(RegistryCall::DeleteRepository { repository_id });

        let status = self
            .repository_delete_status
            .unwrap_or(StatusCode::ACCEPTED);

        if status.is_success() {
            let mut state = self.state.lock();
            state.repositories.retain(|r| r.id != repository_id);
            state.tags.remove(&repository_id);
        }

        Ok(status)
    }
}
