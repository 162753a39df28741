//! Cleanup orchestration.
//!
//! The [`Orchestrator`] walks every repository of the registry once and
//! drives it to a terminal state:
//!
//! ```text
//! ignored, no size report ──────────────────────────────▶ Skipped
//! list tags ─┬─ repository gone (404) ──────────────────▶ Skipped
//!            ├─ empty + delete_empty_repositories ──────▶ DeletedEmpty
//!            ├─ ignored (size report) ─ fetch details ──▶ Skipped
//!            ├─ empty ──────────────────────────────────▶ TagsProcessed
//!            └─ fetch details ─ evaluate ─ delete tags ─▶ TagsProcessed
//! any other registry read error ────────────────────────▶ Failed
//! ```
//!
//! Repositories are processed sequentially and each decision depends only on
//! the repository's own tags. Individual deletion failures are recorded and
//! never stop the run.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use regcull_core::{
    evaluate, select_policy, CleanupDecision, Repository, RetentionPolicy, RunConfiguration, Tag,
    TagRef,
};
use regcull_registry::{RegistryApi, RegistryError, StatusCode};

use crate::error::{CleanupError, Result};
use crate::report::{
    DeletionStatus, RepositoryOutcome, RepositoryReport, RunReport, SkipReason, TagDeletion,
};

/// Applies retention policies to every repository of a registry.
///
/// # Examples
///
/// ```rust,no_run
/// use regcull_cleanup::Orchestrator;
/// use regcull_core::RunConfiguration;
/// use regcull_registry::{GitLabClient, RegistryConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GitLabClient::new(
///     RegistryConfig::new("https://gitlab.example.com/api/v4").with_project("42"),
/// )?;
/// let config = RunConfiguration::default().with_important("cache", 500);
///
/// let report = Orchestrator::new(client, config)?.run().await?;
/// println!("{} tags deleted", report.summary.tags_deleted);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Orchestrator<R> {
    registry: R,
    config: RunConfiguration,
}

impl<R: RegistryApi> Orchestrator<R> {
    /// Creates an orchestrator over a registry client.
    ///
    /// # Errors
    ///
    /// Returns [`CleanupError::InvalidConfig`] if the configuration fails
    /// validation.
    pub fn new(registry: R, config: RunConfiguration) -> Result<Self> {
        config.validate()?;
        Ok(Self { registry, config })
    }

    /// Returns the registry client.
    pub const fn registry(&self) -> &R {
        &self.registry
    }

    /// Returns the run configuration.
    pub const fn config(&self) -> &RunConfiguration {
        &self.config
    }

    /// Runs a cleanup pass, measuring tag ages against the current time.
    ///
    /// # Errors
    ///
    /// Returns [`CleanupError::ListRepositories`] if the repository list
    /// cannot be fetched. Every other failure is recorded in the report.
    pub async fn run(&self) -> Result<RunReport> {
        self.run_at(Utc::now()).await
    }

    /// Runs a cleanup pass, measuring tag ages against `now`.
    ///
    /// # Errors
    ///
    /// Returns [`CleanupError::ListRepositories`] if the repository list
    /// cannot be fetched.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<RunReport> {
        let dry_run = self.config.dry_run;
        let mut report = RunReport::new(dry_run, Utc::now());

        info!(dry_run, "Fetching all repositories");
        let repositories = self
            .registry
            .list_repositories()
            .await
            .map_err(CleanupError::ListRepositories)?;

        info!(
            count = repositories.len(),
            repositories = ?repositories.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            "Found repositories"
        );

        for repository in repositories {
            let outcome = match self.process_repository(&repository, now).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!(
                        repository = %repository.label(),
                        repository_id = repository.id,
                        error = %err,
                        "Failed to process repository, continuing with the next one"
                    );
                    RepositoryOutcome::Failed {
                        error: err.to_string(),
                    }
                }
            };
            report.push(RepositoryReport {
                repository,
                outcome,
            });
        }

        report.finished_at = Utc::now();

        let summary = &report.summary;
        info!(
            dry_run,
            repositories_processed = summary.repositories_processed,
            repositories_skipped = summary.repositories_skipped,
            repositories_failed = summary.repositories_failed,
            empty_repositories_deleted = summary.empty_repositories_deleted,
            tags_kept = summary.tags_kept,
            tags_deleted = summary.tags_deleted,
            tags_failed = summary.tags_failed,
            "Cleanup finished"
        );

        Ok(report)
    }

    /// Drives one repository to its terminal state.
    ///
    /// Registry read errors are returned; deletion failures are recorded in
    /// the outcome.
    async fn process_repository(
        &self,
        repository: &Repository,
        now: DateTime<Utc>,
    ) -> std::result::Result<RepositoryOutcome, RegistryError> {
        let name = repository.name.as_str();
        let label = repository.label();

        if self.config.skips_entirely(name) {
            info!(repository = %label, "Repository is ignored, skipping");
            return Ok(RepositoryOutcome::Skipped {
                reason: SkipReason::Ignored,
                tag_count: None,
                total_size: None,
            });
        }

        info!(repository = %label, repository_id = repository.id, "Processing repository");

        let tag_refs = match self
            .registry
            .list_all_tags(repository.id, self.config.tags_per_page)
            .await
        {
            Ok(tag_refs) => tag_refs,
            Err(err) if err.is_not_found() => {
                info!(repository = %label, "Repository vanished after listing, skipping");
                return Ok(RepositoryOutcome::Skipped {
                    reason: SkipReason::Vanished,
                    tag_count: None,
                    total_size: None,
                });
            }
            Err(err) => return Err(err),
        };

        if self.config.delete_empty_repositories && tag_refs.is_empty() {
            let deletion = self.delete_empty_repository(repository).await;
            return Ok(RepositoryOutcome::DeletedEmpty { deletion });
        }

        info!(repository = %label, count = tag_refs.len(), "Found tags");

        // Ignored repositories that get here are only measured for the size report.
        let Some(policy) = select_policy(name, &self.config) else {
            let (tags, _) = self.fetch_tag_details(repository, &tag_refs).await?;
            let total_size: u64 = tags.iter().filter_map(|tag| tag.total_size).sum();
            info!(
                repository = %label,
                tag_count = tags.len(),
                total_size,
                "Repository is ignored, reporting size only"
            );
            return Ok(RepositoryOutcome::Skipped {
                reason: SkipReason::IgnoredSizeReport,
                tag_count: Some(tags.len()),
                total_size: Some(total_size),
            });
        };

        if tag_refs.is_empty() {
            info!(repository = %label, "Repository has no tags, nothing to clean");
            return Ok(RepositoryOutcome::TagsProcessed {
                policy,
                decision: CleanupDecision::empty(repository.clone()),
                deletions: Vec::new(),
                vanished: Vec::new(),
            });
        }

        let (tags, vanished) = self.fetch_tag_details(repository, &tag_refs).await?;

        if let RetentionPolicy::KeepNewest { count } = policy {
            if count < 0 {
                warn!(repository = %label, count, "Negative keep count, keeping no tags");
            }
        }

        let evaluation = evaluate(tags, &policy, now);
        let decision = CleanupDecision::from_evaluation(repository.clone(), evaluation);

        info!(
            repository = %label,
            policy = %policy,
            keep = decision.tags_kept.len(),
            delete = decision.tags_to_delete.len(),
            "Evaluated retention policy"
        );
        debug!(
            repository = %label,
            tags_to_keep = ?decision.kept_names(),
            tags_to_delete = ?decision.delete_names(),
            "Retention decision"
        );

        let deletions = self.delete_tags(repository, &decision.tags_to_delete).await;

        Ok(RepositoryOutcome::TagsProcessed {
            policy,
            decision,
            deletions,
            vanished,
        })
    }

    /// Fetches the detail of every listed tag, in list order.
    ///
    /// Tags that vanished since the listing are returned separately.
    async fn fetch_tag_details(
        &self,
        repository: &Repository,
        tag_refs: &[TagRef],
    ) -> std::result::Result<(Vec<Tag>, Vec<String>), RegistryError> {
        let mut tags = Vec::with_capacity(tag_refs.len());
        let mut vanished = Vec::new();

        for tag_ref in tag_refs {
            match self
                .registry
                .get_tag_detail(repository.id, &tag_ref.name)
                .await
            {
                Ok(tag) => {
                    info!(
                        repository = %repository.label(),
                        tag = %tag.name,
                        created_at = %tag.created_at,
                        "Found tag"
                    );
                    tags.push(tag);
                }
                Err(err) if err.is_not_found() => {
                    debug!(
                        repository = %repository.label(),
                        tag = %tag_ref.name,
                        "Tag vanished before its detail was fetched, skipping"
                    );
                    vanished.push(tag_ref.name.clone());
                }
                Err(err) => return Err(err),
            }
        }

        Ok((tags, vanished))
    }

    /// Deletes (or simulates deleting) tags in order, never stopping early.
    async fn delete_tags(&self, repository: &Repository, tags: &[Tag]) -> Vec<TagDeletion> {
        let mut deletions = Vec::with_capacity(tags.len());

        for tag in tags {
            let status = if self.config.dry_run {
                info!(
                    repository = %repository.label(),
                    tag = %tag.name,
                    "[Dry Run] Would delete tag"
                );
                DeletionStatus::Simulated
            } else {
                let status = classify(self.registry.delete_tag(repository.id, &tag.name).await);
                if status.is_success() {
                    info!(repository = %repository.label(), tag = %tag.name, "Deleted tag");
                } else {
                    warn!(
                        repository = %repository.label(),
                        tag = %tag.name,
                        result = ?status,
                        "Failed to delete tag"
                    );
                }
                status
            };

            deletions.push(TagDeletion {
                tag: tag.name.clone(),
                status,
            });
        }

        deletions
    }

    /// Deletes (or simulates deleting) a repository without tags.
    async fn delete_empty_repository(&self, repository: &Repository) -> DeletionStatus {
        let label = repository.label();
        info!(repository = %label, "Repository is empty, deleting");

        if self.config.dry_run {
            info!(repository = %label, "[Dry Run] Would delete repository");
            return DeletionStatus::Simulated;
        }

        let status = classify(self.registry.delete_repository(repository.id).await);
        if status.is_success() {
            info!(repository = %label, "Deleted repository");
        } else {
            warn!(repository = %label, result = ?status, "Failed to delete repository");
        }
        status
    }
}

/// Classifies the result of a delete call.
///
/// A transport error counts as a failed deletion, like a non-success status.
fn classify(result: std::result::Result<StatusCode, RegistryError>) -> DeletionStatus {
    match result {
        Ok(status) => DeletionStatus::from_status(status),
        Err(err) => DeletionStatus::Failed {
            status: None,
            message: err.to_string(),
        },
    }
}
