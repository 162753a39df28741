//! Check command implementation.
//!
//! Validates the layered policy configuration without contacting the
//! registry, and prints the policies a run would apply.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tracing::info;

use regcull_core::{select_policy, RetentionPolicy, RunConfiguration};

use super::policy::PolicyArgs;

/// Output format of the effective configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum CheckFormat {
    /// Human-readable overview
    #[default]
    Text,
    /// Effective configuration as YAML, usable as a `--config` file
    Yaml,
    /// Effective configuration as JSON
    Json,
}

/// Arguments for the check command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = CheckFormat::Text)]
    pub format: CheckFormat,
}

/// Runs the check command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, is invalid, or
/// cannot be serialized.
pub fn run(args: &CheckArgs) -> Result<()> {
    let config = args.policy.resolve()?;
    info!(
        important = config.important.len(),
        ignored = config.ignored.len(),
        "Configuration is valid"
    );

    let output = match args.format {
        CheckFormat::Text => render_overview(&config),
        CheckFormat::Yaml => {
            serde_yaml::to_string(&config).context("Failed to serialize configuration")?
        }
        CheckFormat::Json => {
            let mut json = serde_json::to_string_pretty(&config)
                .context("Failed to serialize configuration")?;
            json.push('\n');
            json
        }
    };

    print!("{output}");
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn render_overview(config: &RunConfiguration) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Configuration is valid.");
    let _ = writeln!(out);
    let mode = if config.dry_run {
        "dry run"
    } else {
        "execute (deletions enabled)"
    };
    let _ = writeln!(out, "Mode: {mode}");
    let _ = writeln!(
        out,
        "Default policy: {}",
        RetentionPolicy::max_age(config.max_age_days)
    );
    let _ = writeln!(
        out,
        "Delete empty repositories: {}",
        yes_no(config.delete_empty_repositories)
    );
    let _ = writeln!(
        out,
        "Report ignored repositories: {}",
        yes_no(config.include_ignored_in_size_report)
    );
    let _ = writeln!(out, "Tag page size: {}", config.tags_per_page);

    if !config.important.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Important repositories:");
        for name in config.important.keys() {
            match select_policy(name, config) {
                Some(policy) => {
                    let _ = writeln!(out, "  {name}: {policy}");
                }
                None => {
                    let _ = writeln!(out, "  {name}: ignored (listed in both tables)");
                }
            }
        }
    }

    if !config.ignored.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Ignored repositories:");
        for name in &config.ignored {
            let _ = writeln!(out, "  {name}");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overview_defaults() {
        let overview = render_overview(&RunConfiguration::default());

        assert!(overview.contains("Mode: dry run"));
        assert!(overview.contains("Default policy: max age 30 days"));
        assert!(overview.contains("Delete empty repositories: yes"));
        assert!(!overview.contains("Important repositories:"));
    }

    #[test]
    fn test_overview_lists_policies() {
        let config = RunConfiguration::default()
            .with_important("cache", 500)
            .with_important("main", 10)
            .with_ignored("main")
            .with_dry_run(false);

        let overview = render_overview(&config);

        assert!(overview.contains("Mode: execute"));
        assert!(overview.contains("  cache: keep newest 500"));
        assert!(overview.contains("  main: ignored (listed in both tables)"));
        assert!(overview.contains("Ignored repositories:\n  main\n"));
    }

    #[test]
    fn test_yaml_output_round_trips() {
        let config = RunConfiguration::default().with_important("cache", 500);
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: RunConfiguration = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
