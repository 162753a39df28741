//! Per-repository cleanup decisions.

use serde::Serialize;

use crate::evaluator::Evaluation;
use crate::model::{Repository, Tag};

/// What a cleanup run decided for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupDecision {
    /// The repository the decision applies to.
    pub repository: Repository,

    /// Tags retained by the policy.
    pub tags_kept: Vec<Tag>,

    /// Tags to delete, in deletion order.
    pub tags_to_delete: Vec<Tag>,

    /// True if the repository had no tags.
    pub empty: bool,
}

impl CleanupDecision {
    /// Builds a decision from a policy evaluation.
    #[must_use]
    pub fn from_evaluation(repository: Repository, evaluation: Evaluation) -> Self {
        let empty = evaluation.is_empty();
        Self {
            repository,
            tags_kept: evaluation.kept,
            tags_to_delete: evaluation.to_delete,
            empty,
        }
    }

    /// Builds the decision for a repository without tags.
    #[must_use]
    pub const fn empty(repository: Repository) -> Self {
        Self {
            repository,
            tags_kept: Vec::new(),
            tags_to_delete: Vec::new(),
            empty: true,
        }
    }

    /// Returns the names of the tags to delete.
    #[must_use]
    pub fn delete_names(&self) -> Vec<&str> {
        self.tags_to_delete.iter().map(|t| t.name.as_str()).collect()
    }

    /// Returns the names of the kept tags.
    #[must_use]
    pub fn kept_names(&self) -> Vec<&str> {
        self.tags_kept.iter().map(|t| t.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_from_evaluation() {
        let now = Utc::now();
        let evaluation = Evaluation {
            kept: vec![Tag::new("a", 1, now)],
            to_delete: vec![Tag::new("b", 1, now)],
        };
        let decision = CleanupDecision::from_evaluation(Repository::new(1, "r"), evaluation);

        assert!(!decision.empty);
        assert_eq!(decision.kept_names(), ["a"]);
        assert_eq!(decision.delete_names(), ["b"]);
    }

    #[test]
    fn test_empty() {
        let decision = CleanupDecision::empty(Repository::new(1, "r"));
        assert!(decision.empty);
        assert!(decision.tags_kept.is_empty());
        assert!(decision.tags_to_delete.is_empty());
    }
}
