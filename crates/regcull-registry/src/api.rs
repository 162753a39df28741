//! Registry operations consumed by the cleanup orchestrator.

use std::future::Future;

use async_trait::async_trait;
use reqwest::StatusCode;

use regcull_core::{Repository, Tag, TagRef, MAX_TAGS_PER_PAGE};

use crate::error::Result;

/// Container registry operations needed to enforce retention policies.
///
/// Implemented over HTTP by [`crate::GitLabClient`]; tests use an in-memory
/// implementation.
#[async_trait]
pub trait RegistryApi: Send + Sync {
    /// Lists every repository of the project.
    async fn list_repositories(&self) -> Result<Vec<Repository>>;

    /// Lists one page of tags of a repository. Pages start at 1.
    async fn list_tags(&self, repository_id: u64, page: u32, per_page: u32)
        -> Result<Vec<TagRef>>;

    /// Fetches a tag's detail, including its creation time.
    ///
    /// Fails with [`crate::RegistryError::NotFound`] if the tag no longer exists.
    async fn get_tag_detail(&self, repository_id: u64, tag_name: &str) -> Result<Tag>;

    /// Deletes a tag and returns the registry's response status.
    async fn delete_tag(&self, repository_id: u64, tag_name: &str) -> Result<StatusCode>;

    /// Deletes a repository and returns the registry's response status.
    async fn delete_repository(&self, repository_id: u64) -> Result<StatusCode>;

    /// Lists all tags of a repository, following pages until an empty one.
    ///
    /// `per_page` is clamped to `1..=100`.
    async fn list_all_tags(&self, repository_id: u64, per_page: u32) -> Result<Vec<TagRef>> {
        let per_page = per_page.clamp(1, MAX_TAGS_PER_PAGE);
        let tags = collect_pages(|page| self.list_tags(repository_id, page, per_page)).await?;
        tracing::debug!(repository_id, count = tags.len(), "Listed tags");
        Ok(tags)
    }
}

/// Requests pages from 1 upwards and concatenates them, stopping at the
/// first empty page.
pub async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut + Send,
    Fut: Future<Output = Result<Vec<T>>> + Send,
    T: Send,
{
    let mut all = Vec::new();
    let mut page = 1;

    loop {
        let items = fetch(page).await?;
        if items.is_empty() {
            break;
        }

        all.extend(items);
        page += 1;
    }

    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;

    fn pages() -> Vec<Vec<u32>> {
        vec![vec![1, 2], vec![3], Vec::new(), vec![99]]
    }

    #[tokio::test]
    async fn test_collect_pages_stops_at_empty_page() {
        let pages = pages();
        let mut requested = Vec::new();

        let items = collect_pages(|page| {
            requested.push(page);
            let items = pages[page as usize - 1].clone();
            async move { Ok(items) }
        })
        .await
        .unwrap();

        assert_eq!(items, [1, 2, 3]);
        assert_eq!(requested, [1, 2, 3]);
    }

    #[tokio::test]
    async fn test_collect_pages_propagates_errors() {
        let result: Result<Vec<u32>> = collect_pages(|page| async move {
            if page == 2 {
                Err(RegistryError::HttpError {
                    status: 500,
                    message: "boom".to_string(),
                })
            } else {
                Ok(vec![page])
            }
        })
        .await;

        assert!(matches!(result, Err(RegistryError::HttpError { status: 500, .. })));
    }
}
