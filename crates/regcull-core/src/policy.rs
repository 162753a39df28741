//! Retention policies and per-repository policy selection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::RunConfiguration;

/// Rule deciding which tags of a repository survive a cleanup pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RetentionPolicy {
    /// Keep the `count` most recently created tags and delete the rest.
    ///
    /// A negative count keeps nothing.
    KeepNewest {
        /// Number of tags to keep.
        count: i64,
    },

    /// Delete tags whose age in whole days exceeds `days`.
    MaxAge {
        /// Age threshold in days.
        days: i64,
    },
}

impl RetentionPolicy {
    /// Creates a keep-newest policy.
    #[must_use]
    pub const fn keep_newest(count: i64) -> Self {
        Self::KeepNewest { count }
    }

    /// Creates a max-age policy.
    #[must_use]
    pub const fn max_age(days: i64) -> Self {
        Self::MaxAge { days }
    }
}

impl fmt::Display for RetentionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeepNewest { count } => write!(f, "keep newest {count}"),
            Self::MaxAge { days } => write!(f, "max age {days} days"),
        }
    }
}

/// Selects the retention policy for a repository.
///
/// Returns `None` for ignored repositories, which are never evaluated.
/// Repositories with a keep-count get [`RetentionPolicy::KeepNewest`];
/// everything else gets [`RetentionPolicy::MaxAge`] with the configured
/// threshold.
///
/// # Examples
///
/// ```
/// use regcull_core::{select_policy, RetentionPolicy, RunConfiguration};
///
/// let config = RunConfiguration::default()
///     .with_important("cache", 500)
///     .with_ignored("main")
///     .with_max_age_days(30);
///
/// assert_eq!(select_policy("cache", &config), Some(RetentionPolicy::keep_newest(500)));
/// assert_eq!(select_policy("feature-x", &config), Some(RetentionPolicy::max_age(30)));
/// assert_eq!(select_policy("main", &config), None);
/// ```
#[must_use]
pub fn select_policy(name: &str, config: &RunConfiguration) -> Option<RetentionPolicy> {
    if config.is_ignored(name) {
        return None;
    }

    Some(config.important.get(name).map_or_else(
        || RetentionPolicy::max_age(config.max_age_days),
        |&count| RetentionPolicy::keep_newest(count),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignored_wins_over_important() {
        let config = RunConfiguration::default()
            .with_important("cache", 10)
            .with_ignored("cache");
        assert_eq!(select_policy("cache", &config), None);
    }

    #[test]
    fn test_selection_is_exact_match() {
        let config = RunConfiguration::default().with_important("cache", 10);
        assert_eq!(
            select_policy("cache-old", &config),
            Some(RetentionPolicy::max_age(30))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(RetentionPolicy::keep_newest(5).to_string(), "keep newest 5");
        assert_eq!(RetentionPolicy::max_age(30).to_string(), "max age 30 days");
    }

    #[test]
    fn test_serialize_tagged() {
        let json = serde_json::to_value(RetentionPolicy::keep_newest(3)).unwrap();
        assert_eq!(json["type"], "keep_newest");
        assert_eq!(json["count"], 3);
    }
}
