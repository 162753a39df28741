//! Run configuration: policy tables and run flags.
//!
//! A [`RunConfiguration`] is built once (from defaults, a YAML file and
//! command-line overrides) and handed to the orchestrator by value.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default age threshold for repositories without a keep-count.
pub const DEFAULT_MAX_AGE_DAYS: i64 = 30;

/// Largest page size the registry API accepts for tag listing.
pub const MAX_TAGS_PER_PAGE: u32 = 100;

/// Configuration for a single cleanup run.
///
/// # Examples
///
/// ```
/// use regcull_core::RunConfiguration;
///
/// let config = RunConfiguration::default()
///     .with_important("cache", 500)
///     .with_ignored("main")
///     .with_dry_run(false);
///
/// assert_eq!(config.important.get("cache"), Some(&500));
/// assert!(config.is_ignored("main"));
/// assert!(!config.dry_run);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfiguration {
    /// Repositories retained by count: name → number of newest tags to keep.
    pub important: BTreeMap<String, i64>,

    /// Repositories never evaluated or cleaned.
    pub ignored: BTreeSet<String>,

    /// List tags of ignored repositories to report their size.
    pub include_ignored_in_size_report: bool,

    /// Delete tags older than this many whole days.
    pub max_age_days: i64,

    /// Delete repositories that have no tags.
    pub delete_empty_repositories: bool,

    /// Report planned deletions without performing them.
    pub dry_run: bool,

    /// Page size used when listing tags.
    pub tags_per_page: u32,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self {
            important: BTreeMap::new(),
            ignored: BTreeSet::new(),
            include_ignored_in_size_report: true,
            max_age_days: DEFAULT_MAX_AGE_DAYS,
            delete_empty_repositories: true,
            dry_run: true,
            tags_per_page: MAX_TAGS_PER_PAGE,
        }
    }
}

impl RunConfiguration {
    /// Loads a configuration from a YAML file.
    ///
    /// Fields missing from the file keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&contents).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Adds a repository retained by keep-count.
    #[must_use]
    pub fn with_important(mut self, name: impl Into<String>, keep: i64) -> Self {
        self.important.insert(name.into(), keep);
        self
    }

    /// Adds an ignored repository.
    #[must_use]
    pub fn with_ignored(mut self, name: impl Into<String>) -> Self {
        self.ignored.insert(name.into());
        self
    }

    /// Sets whether ignored repositories are listed for the size report.
    #[must_use]
    pub const fn with_ignored_size_report(mut self, enabled: bool) -> Self {
        self.include_ignored_in_size_report = enabled;
        self
    }

    /// Sets the age threshold in days.
    #[must_use]
    pub const fn with_max_age_days(mut self, days: i64) -> Self {
        self.max_age_days = days;
        self
    }

    /// Sets whether empty repositories are deleted.
    #[must_use]
    pub const fn with_delete_empty_repositories(mut self, enabled: bool) -> Self {
        self.delete_empty_repositories = enabled;
        self
    }

    /// Sets dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets the tag listing page size.
    #[must_use]
    pub const fn with_tags_per_page(mut self, per_page: u32) -> Self {
        self.tags_per_page = per_page;
        self
    }

    /// Returns true if the repository is ignored.
    #[must_use]
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored.contains(name)
    }

    /// Returns true if the repository is ignored and must not even be listed.
    #[must_use]
    pub fn skips_entirely(&self, name: &str) -> bool {
        self.is_ignored(name) && !self.include_ignored_in_size_report
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the page size is outside
    /// `1..=100` or the age threshold is negative.
    pub fn validate(&self) -> Result<()> {
        if self.tags_per_page == 0 || self.tags_per_page > MAX_TAGS_PER_PAGE {
            return Err(Error::InvalidConfig {
                reason: format!(
                    "tags_per_page must be between 1 and {MAX_TAGS_PER_PAGE}, got {}",
                    self.tags_per_page
                ),
            });
        }

        if self.max_age_days < 0 {
            return Err(Error::InvalidConfig {
                reason: format!(
                    "max_age_days must not be negative, got {}",
                    self.max_age_days
                ),
            });
        }

        Ok(())
    }
}
