//! Policy arguments shared by the `run` and `check` commands.
//!
//! The effective [`RunConfiguration`] is layered: built-in defaults, then the
//! YAML file given with `--config`, then individual command-line flags.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::Args;

use regcull_core::RunConfiguration;

/// Retention policy arguments.
#[derive(Args, Debug, Default)]
pub struct PolicyArgs {
    /// YAML policy file (important/ignored repositories and run flags)
    #[arg(short, long, env = "REGCULL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Keep the COUNT newest tags of repository NAME (repeatable)
    #[arg(long = "keep", value_name = "NAME=COUNT", value_parser = parse_keep)]
    pub keep: Vec<(String, i64)>,

    /// Never clean repository NAME (repeatable)
    #[arg(long = "ignore", value_name = "NAME")]
    pub ignore: Vec<String>,

    /// Delete tags older than this many days in other repositories
    #[arg(long, value_name = "DAYS")]
    pub older_than_days: Option<i64>,

    /// Page size for tag listing (1-100)
    #[arg(long, value_name = "COUNT")]
    pub tags_per_page: Option<u32>,

    /// Delete repositories without tags
    #[arg(long, value_name = "BOOL", value_parser = BoolishValueParser::new())]
    pub delete_empty_repositories: Option<bool>,

    /// List the tags of ignored repositories for the size report
    #[arg(long, value_name = "BOOL", value_parser = BoolishValueParser::new())]
    pub report_ignored: Option<bool>,

    /// Perform deletions (the default is a dry run)
    #[arg(long, conflicts_with = "dry_run")]
    pub execute: bool,

    /// Only report what would be deleted
    #[arg(long)]
    pub dry_run: bool,
}

impl PolicyArgs {
    /// Builds and validates the effective run configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or the result
    /// fails validation.
    pub fn resolve(&self) -> Result<RunConfiguration> {
        let mut config = match &self.config {
            Some(path) => RunConfiguration::from_yaml_file(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
            None => RunConfiguration::default(),
        };

        for (name, count) in &self.keep {
            config.important.insert(name.clone(), *count);
        }
        config.ignored.extend(self.ignore.iter().cloned());

        if let Some(days) = self.older_than_days {
            config.max_age_days = days;
        }
        if let Some(per_page) = self.tags_per_page {
            config.tags_per_page = per_page;
        }
        if let Some(enabled) = self.delete_empty_repositories {
            config.delete_empty_repositories = enabled;
        }
        if let Some(enabled) = self.report_ignored {
            config.include_ignored_in_size_report = enabled;
        }

        if self.execute {
            config.dry_run = false;
        } else if self.dry_run {
            config.dry_run = true;
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

/// Parses a `NAME=COUNT` keep rule.
fn parse_keep(value: &str) -> std::result::Result<(String, i64), String> {
    let (name, count) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=COUNT, got '{value}'"))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing repository name in '{value}'"));
    }

    let count = count
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid count in '{value}': {e}"))?;

    Ok((name.to_string(), count))
}
