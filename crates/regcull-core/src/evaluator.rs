//! Retention policy evaluation.
//!
//! [`evaluate`] partitions a repository's tags into the ones a policy keeps
//! and the ones it deletes. It is a pure function of its inputs: the caller
//! supplies `now`, so the same tags and instant always produce the same
//! partition.

use chrono::{DateTime, Utc};

use crate::model::Tag;
use crate::policy::RetentionPolicy;

const SECONDS_PER_DAY: i64 = 86_400;

/// Result of evaluating a retention policy over a repository's tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Tags the policy retains.
    pub kept: Vec<Tag>,

    /// Tags the policy marks for deletion, in deletion order.
    pub to_delete: Vec<Tag>,
}

impl Evaluation {
    /// Returns the total number of evaluated tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kept.len() + self.to_delete.len()
    }

    /// Returns true if no tags were evaluated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty() && self.to_delete.is_empty()
    }
}

/// Partitions `tags` into kept and deleted sets under `policy`.
///
/// - [`RetentionPolicy::KeepNewest`]: tags are stable-sorted by `created_at`
///   descending (ties keep fetch order). The first `count` are kept and the
///   rest deleted; a negative count keeps nothing.
/// - [`RetentionPolicy::MaxAge`]: a tag is deleted when its age in whole days,
///   rounded down, is strictly greater than `days`. Fetch order is preserved
///   in both sets.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use regcull_core::{evaluate, RetentionPolicy, Tag};
///
/// let now = Utc::now();
/// let tags = vec![
///     Tag::new("old", 1, now - Duration::days(3)),
///     Tag::new("new", 1, now - Duration::days(1)),
/// ];
///
/// let evaluation = evaluate(tags, &RetentionPolicy::keep_newest(1), now);
/// assert_eq!(evaluation.kept[0].name, "new");
/// assert_eq!(evaluation.to_delete[0].name, "old");
/// ```
#[must_use]
pub fn evaluate(tags: Vec<Tag>, policy: &RetentionPolicy, now: DateTime<Utc>) -> Evaluation {
    match *policy {
        RetentionPolicy::KeepNewest { count } => keep_newest(tags, count),
        RetentionPolicy::MaxAge { days } => max_age(tags, days, now),
    }
}

/// Returns the age of `created_at` at `now` in whole days, rounded down.
///
/// Timestamps in the future yield negative ages.
#[must_use]
pub fn age_in_days(created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - created_at).num_seconds().div_euclid(SECONDS_PER_DAY)
}

fn keep_newest(mut tags: Vec<Tag>, count: i64) -> Evaluation {
    // `sort_by` is stable, so equal timestamps stay in fetch order.
    tags.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let keep = usize::try_from(count.max(0))
        .unwrap_or(usize::MAX)
        .min(tags.len());
    let to_delete = tags.split_off(keep);

    Evaluation {
        kept: tags,
        to_delete,
    }
}

fn max_age(tags: Vec<Tag>, days: i64, now: DateTime<Utc>) -> Evaluation {
    let (to_delete, kept) = tags
        .into_iter()
        .partition(|tag| age_in_days(tag.created_at, now) > days);

    Evaluation { kept, to_delete }
}
