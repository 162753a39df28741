//! HTTP client for the GitLab container registry API.
//!
//! Endpoints live under `projects/{project}/registry/repositories` relative
//! to the configured API base URL.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use regcull_core::{Repository, Tag, TagRef};

use crate::api::{collect_pages, RegistryApi};
use crate::config::{RegistryAuth, RegistryConfig};
use crate::error::{RegistryError, Result};
use crate::wire::{RepositoryEntry, TagDetail, TagEntry};

/// Header GitLab reads access tokens from.
const PRIVATE_TOKEN: &str = "private-token";

/// Page size used for repository listing.
const REPOSITORIES_PER_PAGE: u32 = 100;

/// Client for the GitLab container registry API.
#[derive(Debug)]
pub struct GitLabClient {
    config: RegistryConfig,
    base: Url,
    http: reqwest::Client,
}

impl GitLabClient {
    /// Creates a new registry client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid, the project is empty, or
    /// the HTTP client cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use regcull_registry::{GitLabClient, RegistryAuth, RegistryConfig};
    ///
    /// let config = RegistryConfig::new("https://gitlab.example.com/api/v4")
    ///     .with_project("group/app")
    ///     .with_auth(RegistryAuth::private_token("glpat-xxxx"));
    /// let client = GitLabClient::new(config)?;
    /// # Ok::<(), regcull_registry::RegistryError>(())
    /// ```
    pub fn new(config: RegistryConfig) -> Result<Self> {
        let base = Url::parse(&config.url).map_err(|_| RegistryError::InvalidUrl {
            url: config.url.clone(),
        })?;
        if base.cannot_be_a_base() {
            return Err(RegistryError::InvalidUrl {
                url: config.url.clone(),
            });
        }
        if config.project.trim().is_empty() {
            return Err(RegistryError::InvalidUrl {
                url: format!("{} (missing project)", config.url),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| RegistryError::ConnectionFailed {
                url: config.url.clone(),
                source: e,
            })?;

        Ok(Self { config, base, http })
    }

    /// Returns the registry configuration.
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Builds an endpoint URL below the project's registry repositories.
    ///
    /// Every segment is percent-encoded, so project paths such as
    /// `group/app` become a single `group%2Fapp` segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| RegistryError::InvalidUrl {
                    url: self.config.url.clone(),
                })?;
            path.pop_if_empty()
                .extend(["projects", self.config.project.as_str(), "registry", "repositories"])
                .extend(segments);
        }
        Ok(url)
    }

    /// Sends a GET request and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: Vec<(&'static str, u32)>,
        resource: impl FnOnce() -> String + Send,
    ) -> Result<T> {
        let response = self
            .http
            .get(url)
            .headers(self.auth_headers()?)
            .query(&query)
            .send()
            .await?;

        let response = Self::check_status(response, resource).await?;
        let body = response.bytes().await?;
        decode_json(&body)
    }

    /// Sends a DELETE request and returns the response status.
    async fn delete(&self, url: Url) -> Result<StatusCode> {
        let response = self
            .http
            .delete(url)
            .headers(self.auth_headers()?)
            .send()
            .await?;

        Ok(response.status())
    }

    /// Maps non-success statuses of read requests to errors.
    async fn check_status(
        response: Response,
        resource: impl FnOnce() -> String + Send,
    ) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, resource, body))
    }

    /// Creates authentication headers based on configuration.
    fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        match &self.config.auth {
            RegistryAuth::None => {}
            RegistryAuth::PrivateToken { token } => {
                headers.insert(
                    PRIVATE_TOKEN,
                    HeaderValue::from_str(token).map_err(|_| {
                        RegistryError::AuthenticationFailed {
                            message: "Invalid private token".to_string(),
                        }
                    })?,
                );
            }
            RegistryAuth::Bearer { token } => {
                headers.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                        RegistryError::AuthenticationFailed {
                            message: "Invalid token".to_string(),
                        }
                    })?,
                );
            }
        }

        // Keep credentials out of debug output of the request.
        for value in headers.values_mut() {
            value.set_sensitive(true);
        }

        Ok(headers)
    }
}

/// Classifies a non-success status of a read request.
///
/// `404` means the resource is gone; `401` and `403` are credential problems.
fn status_error(
    status: StatusCode,
    resource: impl FnOnce() -> String,
    body: String,
) -> RegistryError {
    match status {
        StatusCode::NOT_FOUND => RegistryError::NotFound {
            resource: resource(),
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RegistryError::AuthenticationFailed {
            message: format!("{status} for {}", resource()),
        },
        _ => RegistryError::HttpError {
            status: status.as_u16(),
            message: body,
        },
    }
}

/// Decodes a JSON response body.
fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(Into::into)
}

#[async_trait]
impl RegistryApi for GitLabClient {
    async fn list_repositories(&self) -> Result<Vec<Repository>> {
        let url = self.endpoint(&[])?;
        let project = self.config.project.as_str();

        let entries: Vec<RepositoryEntry> = collect_pages(|page| {
            self.get_json(
                url.clone(),
                vec![("page", page), ("per_page", REPOSITORIES_PER_PAGE)],
                move || format!("project {project}"),
            )
        })
        .await?;

        let repositories = entries
            .into_iter()
            .map(Repository::try_from)
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(count = repositories.len(), "Listed repositories");
        Ok(repositories)
    }

    async fn list_tags(
        &self,
        repository_id: u64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<TagRef>> {
        let id = repository_id.to_string();
        let url = self.endpoint(&[&id, "tags"])?;

        let entries: Vec<TagEntry> = self
            .get_json(url, vec![("page", page), ("per_page", per_page)], || {
                format!("repository {repository_id}")
            })
            .await?;

        entries.into_iter().map(TagRef::try_from).collect()
    }

    async fn get_tag_detail(&self, repository_id: u64, tag_name: &str) -> Result<Tag> {
        let id = repository_id.to_string();
        let url = self.endpoint(&[&id, "tags", tag_name])?;

        let detail: TagDetail = self
            .get_json(url, Vec::new(), || {
                format!("tag {tag_name} in repository {repository_id}")
            })
            .await?;

        detail.into_tag(repository_id, tag_name)
    }

    async fn delete_tag(&self, repository_id: u64, tag_name: &str) -> Result<StatusCode> {
        let id = repository_id.to_string();
        let url = self.endpoint(&[&id, "tags", tag_name])?;
        self.delete(url).await
    }

    async fn delete_repository(&self, repository_id: u64) -> Result<StatusCode> {
        let id = repository_id.to_string();
        let url = self.endpoint(&[&id])?;
        self.delete(url).await
    }
}
