//! Tests for the paginated tag listing provided by `RegistryApi`.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use regcull_core::{Repository, Tag, TagRef};
use regcull_registry::{RegistryApi, RegistryError, Result, StatusCode};

/// Serves `total` tags in pages and records every requested page.
struct PagedTags {
    total: usize,
    requests: Mutex<Vec<(u32, u32)>>,
    fail_on_page: Option<u32>,
}

impl PagedTags {
    fn new(total: usize) -> Self {
        Self {
            total,
            requests: Mutex::new(Vec::new()),
            fail_on_page: None,
        }
    }
}

#[async_trait]
impl RegistryApi for PagedTags {
    async fn list_repositories(&self) -> Result<Vec<Repository>> {
        Ok(vec![Repository::new(1, "app")])
    }

    async fn list_tags(&self, _repository_id: u64, page: u32, per_page: u32) -> Result<Vec<TagRef>> {
        self.requests.lock().push((page, per_page));

        if self.fail_on_page == Some(page) {
            return Err(RegistryError::HttpError {
                status: 502,
                message: "bad gateway".to_string(),
            });
        }

        let per_page = per_page as usize;
        let start = (page as usize - 1) * per_page;
        let end = (start + per_page).min(self.total);
        Ok((start..end.max(start))
            .map(|i| TagRef::new(format!("tag-{i}")))
            .collect())
    }

    async fn get_tag_detail(&self, repository_id: u64, tag_name: &str) -> Result<Tag> {
        Ok(Tag::new(tag_name, repository_id, Utc::now()))
    }

    async fn delete_tag(&self, _repository_id: u64, _tag_name: &str) -> Result<StatusCode> {
        Ok(StatusCode::OK)
    }

    async fn delete_repository(&self, _repository_id: u64) -> Result<StatusCode> {
        Ok(StatusCode::ACCEPTED)
    }
}

#[tokio::test]
async fn test_list_all_tags_follows_pages_until_empty() {
    let registry = PagedTags::new(250);

    let tags = registry.list_all_tags(1, 100).await.unwrap();

    assert_eq!(tags.len(), 250);
    assert_eq!(tags[0].name, "tag-0");
    assert_eq!(tags[249].name, "tag-249");
    assert_eq!(
        *registry.requests.lock(),
        vec![(1, 100), (2, 100), (3, 100), (4, 100)]
    );
}

#[tokio::test]
async fn test_list_all_tags_empty_repository() {
    let registry = PagedTags::new(0);

    let tags = registry.list_all_tags(1, 100).await.unwrap();

    assert!(tags.is_empty());
    assert_eq!(*registry.requests.lock(), vec![(1, 100)]);
}

#[tokio::test]
async fn test_list_all_tags_clamps_page_size() {
    let registry = PagedTags::new(5);

    registry.list_all_tags(1, 500).await.unwrap();
    registry.list_all_tags(1, 0).await.unwrap();

    let requests = registry.requests.lock();
    assert_eq!(requests[0], (1, 100));
    assert!(requests.iter().skip(2).all(|&(_, per_page)| per_page == 1));
}

#[tokio::test]
async fn test_list_all_tags_propagates_errors() {
    let mut registry = PagedTags::new(250);
    registry.fail_on_page = Some(2);

    let err = registry.list_all_tags(1, 100).await.unwrap_err();

    assert!(matches!(err, RegistryError::HttpError { status: 502, .. }));
    assert_eq!(registry.requests.lock().len(), 2);
}
