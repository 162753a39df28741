//! Run reports: per-repository outcomes and aggregated counts.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use regcull_core::{CleanupDecision, Repository, RetentionPolicy};
use regcull_registry::StatusCode;

/// Why a repository was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Ignored; no calls were made for it.
    Ignored,
    /// Ignored, but its tags were measured for the size report.
    IgnoredSizeReport,
    /// The repository was gone by the time its tags were listed.
    Vanished,
}

/// Result of a single tag or repository deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum DeletionStatus {
    /// The registry accepted the deletion.
    Deleted {
        /// Response status code.
        status: u16,
    },
    /// Dry run: the deletion was planned but not performed.
    Simulated,
    /// The deletion failed.
    Failed {
        /// Response status code, if a response was received.
        status: Option<u16>,
        /// Failure description.
        message: String,
    },
}

impl DeletionStatus {
    /// Classifies a delete response: any 2xx status is a success.
    #[must_use]
    pub fn from_status(status: StatusCode) -> Self {
        if status.is_success() {
            Self::Deleted {
                status: status.as_u16(),
            }
        } else {
            Self::Failed {
                status: Some(status.as_u16()),
                message: status.to_string(),
            }
        }
    }

    /// Returns true for performed or simulated deletions.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Deletion result for one tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagDeletion {
    /// Tag name.
    pub tag: String,
    /// Deletion result.
    #[serde(flatten)]
    pub status: DeletionStatus,
}

/// Terminal state of a repository in a cleanup run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RepositoryOutcome {
    /// The repository was ignored.
    Skipped {
        /// Why it was skipped.
        reason: SkipReason,
        /// Number of tags, when measured for the size report.
        tag_count: Option<usize>,
        /// Sum of the tags' reported sizes in bytes, when measured.
        total_size: Option<u64>,
    },

    /// The repository had no tags and was deleted (or would have been).
    DeletedEmpty {
        /// Deletion result.
        deletion: DeletionStatus,
    },

    /// The retention policy was evaluated and its deletions executed.
    TagsProcessed {
        /// The policy applied.
        policy: RetentionPolicy,
        /// Keep/delete partition of the repository's tags.
        decision: CleanupDecision,
        /// Deletion results, in deletion order.
        deletions: Vec<TagDeletion>,
        /// Tags listed but gone by the time their detail was fetched.
        vanished: Vec<String>,
    },

    /// A registry read failed; the rest of the repository was abandoned.
    Failed {
        /// Failure description.
        error: String,
    },
}

/// Outcome for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryReport {
    /// The repository.
    pub repository: Repository,
    /// What happened to it.
    pub outcome: RepositoryOutcome,
}

/// Aggregated counts of a cleanup run.
///
/// Under dry run, simulated deletions count as deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Repositories returned by the registry.
    pub repositories_total: usize,
    /// Repositories that reached `TagsProcessed` or `DeletedEmpty`.
    pub repositories_processed: usize,
    /// Ignored repositories.
    pub repositories_skipped: usize,
    /// Repositories abandoned after a registry error.
    pub repositories_failed: usize,
    /// Empty repositories deleted.
    pub empty_repositories_deleted: usize,
    /// Empty repositories whose deletion failed.
    pub empty_repositories_failed: usize,
    /// Tags retained by policy.
    pub tags_kept: usize,
    /// Tags deleted.
    pub tags_deleted: usize,
    /// Tags whose deletion failed.
    pub tags_failed: usize,
    /// Tags that disappeared between listing and detail fetch.
    pub tags_vanished: usize,
    /// Tags held by ignored repositories measured for the size report.
    pub ignored_tags: usize,
    /// Bytes held by ignored repositories measured for the size report.
    pub ignored_total_size: u64,
}

impl RunSummary {
    /// Adds one repository outcome to the counts.
    pub fn record(&mut self, outcome: &RepositoryOutcome) {
        self.repositories_total += 1;

        match outcome {
            RepositoryOutcome::Skipped {
                tag_count,
                total_size,
                ..
            } => {
                self.repositories_skipped += 1;
                self.ignored_tags += tag_count.unwrap_or(0);
                self.ignored_total_size += total_size.unwrap_or(0);
            }
            RepositoryOutcome::DeletedEmpty { deletion } => {
                self.repositories_processed += 1;
                if deletion.is_success() {
                    self.empty_repositories_deleted += 1;
                } else {
                    self.empty_repositories_failed += 1;
                }
            }
            RepositoryOutcome::TagsProcessed {
                decision,
                deletions,
                vanished,
                ..
            } => {
                self.repositories_processed += 1;
                self.tags_kept += decision.tags_kept.len();
                self.tags_vanished += vanished.len();
                for deletion in deletions {
                    if deletion.status.is_success() {
                        self.tags_deleted += 1;
                    } else {
                        self.tags_failed += 1;
                    }
                }
            }
            RepositoryOutcome::Failed { .. } => self.repositories_failed += 1,
        }
    }

    /// Returns true if any deletion or repository failed.
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.repositories_failed > 0 || self.empty_repositories_failed > 0 || self.tags_failed > 0
    }
}

/// Full report of a cleanup run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Unique id of the run.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
    /// Whether deletions were simulated.
    pub dry_run: bool,
    /// Aggregated counts.
    pub summary: RunSummary,
    /// Per-repository outcomes, in processing order.
    pub repositories: Vec<RepositoryReport>,
}

impl RunReport {
    /// Starts an empty report.
    #[must_use]
    pub fn new(dry_run: bool, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id: Uuid::now_v7(),
            started_at,
            finished_at: started_at,
            dry_run,
            summary: RunSummary::default(),
            repositories: Vec::new(),
        }
    }

    /// Appends a repository outcome and updates the summary.
    pub fn push(&mut self, report: RepositoryReport) {
        self.summary.record(&report.outcome);
        self.repositories.push(report);
    }

    /// Returns the outcome recorded for a repository name.
    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<&RepositoryOutcome> {
        self.repositories
            .iter()
            .find(|r| r.repository.name == name)
            .map(|r| &r.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use regcull_core::Tag;

    fn processed(kept: usize, deletions: Vec<DeletionStatus>) -> RepositoryOutcome {
        let now = Utc::now();
        let repository = Repository::new(1, "app");
        RepositoryOutcome::TagsProcessed {
            policy: RetentionPolicy::keep_newest(1),
            decision: CleanupDecision {
                repository,
                tags_kept: (0..kept).map(|i| Tag::new(format!("k{i}"), 1, now)).collect(),
                tags_to_delete: Vec::new(),
                empty: false,
            },
            deletions: deletions
                .into_iter()
                .enumerate()
                .map(|(i, status)| TagDeletion {
                    tag: format!("d{i}"),
                    status,
                })
                .collect(),
            vanished: vec!["gone".to_string()],
        }
    }

    #[test]
    fn test_from_status() {
        assert_eq!(
            DeletionStatus::from_status(StatusCode::OK),
            DeletionStatus::Deleted { status: 200 }
        );
        assert!(DeletionStatus::from_status(StatusCode::ACCEPTED).is_success());
        assert!(!DeletionStatus::from_status(StatusCode::FORBIDDEN).is_success());
        assert!(DeletionStatus::Simulated.is_success());
    }

    #[test]
    fn test_summary_record() {
        let mut summary = RunSummary::default();
        summary.record(&RepositoryOutcome::Skipped {
            reason: SkipReason::Ignored,
            tag_count: None,
            total_size: None,
        });
        summary.record(&RepositoryOutcome::Skipped {
            reason: SkipReason::IgnoredSizeReport,
            tag_count: Some(3),
            total_size: Some(1_500),
        });
        summary.record(&RepositoryOutcome::DeletedEmpty {
            deletion: DeletionStatus::Deleted { status: 202 },
        });
        summary.record(&RepositoryOutcome::DeletedEmpty {
            deletion: DeletionStatus::Failed {
                status: Some(500),
                message: "boom".to_string(),
            },
        });
        summary.record(&processed(
            2,
            vec![
                DeletionStatus::Deleted { status: 200 },
                DeletionStatus::Failed {
                    status: Some(403),
                    message: "403 Forbidden".to_string(),
                },
            ],
        ));
        summary.record(&RepositoryOutcome::Failed {
            error: "timeout".to_string(),
        });

        assert_eq!(
            summary,
            RunSummary {
                repositories_total: 6,
                repositories_processed: 3,
                repositories_skipped: 2,
                repositories_failed: 1,
                empty_repositories_deleted: 1,
                empty_repositories_failed: 1,
                tags_kept: 2,
                tags_deleted: 1,
                tags_failed: 1,
                tags_vanished: 1,
                ignored_tags: 3,
                ignored_total_size: 1_500,
            }
        );
        assert!(summary.has_failures());
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let outcome = RepositoryOutcome::DeletedEmpty {
            deletion: DeletionStatus::Simulated,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["state"], "deleted_empty");
        assert_eq!(json["deletion"]["result"], "simulated");
    }

    #[test]
    fn test_tag_deletion_flattens_status() {
        let deletion = TagDeletion {
            tag: "v1".to_string(),
            status: DeletionStatus::Deleted { status: 200 },
        };
        let json = serde_json::to_value(&deletion).unwrap();
        assert_eq!(json["tag"], "v1");
        assert_eq!(json["result"], "deleted");
        assert_eq!(json["status"], 200);
    }
}
