//! Run command implementation.
//!
//! Applies retention policies to every repository of a project's container
//! registry and prints the run report.

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tracing::{info, warn};

use regcull_cleanup::{ConsoleReporter, JsonReporter, Orchestrator, Reporter};
use regcull_registry::GitLabClient;

use super::connection::ConnectionArgs;
use super::policy::PolicyArgs;

/// Report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// JSON run report
    Json,
}

/// Arguments for the run command.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// List every repository in the text report
    #[arg(short, long)]
    pub verbose: bool,
}

/// Runs the cleanup.
///
/// Individual deletion or repository failures are reported but do not make
/// the command fail.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration cannot be loaded or is invalid
/// - The registry client cannot be created
/// - The repository list cannot be fetched
/// - The report cannot be written
pub async fn execute(args: RunArgs) -> Result<()> {
    let config = args.policy.resolve()?;

    let registry_config = args.connection.registry_config()?;
    info!(
        api_url = %registry_config.url,
        project = %registry_config.project,
        dry_run = config.dry_run,
        "Starting registry cleanup"
    );
    if !config.dry_run {
        warn!("Dry run disabled, tags and repositories will be deleted");
    }

    let client = GitLabClient::new(registry_config).context("Failed to create registry client")?;
    let orchestrator = Orchestrator::new(client, config).context("Invalid configuration")?;

    let report = orchestrator.run().await.context("Cleanup aborted")?;

    reporter(args.format, args.verbose)
        .report(&report)
        .context("Failed to write report")?;

    if report.summary.has_failures() {
        warn!(
            repositories_failed = report.summary.repositories_failed,
            empty_repositories_failed = report.summary.empty_repositories_failed,
            tags_failed = report.summary.tags_failed,
            "Cleanup finished with failures"
        );
    }

    Ok(())
}

fn reporter(format: OutputFormat, verbose: bool) -> Box<dyn Reporter> {
    match format {
        OutputFormat::Text => Box::new(
            ConsoleReporter::new()
                .with_colors(io::stdout().is_terminal())
                .with_verbose(verbose),
        ),
        OutputFormat::Json => Box::new(JsonReporter::new().pretty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{Cli, Commands};
    use clap::Parser;

    fn parse_run(extra: &[&str]) -> RunArgs {
        let argv = [
            "regcull",
            "run",
            "--api-url",
            "https://gitlab.example.com/api/v4",
            "--project",
            "42",
        ]
        .into_iter()
        .chain(extra.iter().copied());

        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Run(args) => args,
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_run_args_defaults() {
        let args = parse_run(&[]);
        assert_eq!(args.format, OutputFormat::Text);
        assert!(!args.verbose);
        assert_eq!(args.connection.timeout, 30);
        assert!(args.policy.resolve().unwrap().dry_run);
    }

    #[test]
    fn test_run_args_json_execute() {
        let args = parse_run(&["--format", "json", "--execute", "--keep", "cache=500"]);
        assert_eq!(args.format, OutputFormat::Json);

        let config = args.policy.resolve().unwrap();
        assert!(!config.dry_run);
        assert_eq!(config.important.get("cache"), Some(&500));
    }

    #[test]
    fn test_bearer_requires_token() {
        let result = Cli::try_parse_from([
            "regcull",
            "run",
            "--api-url",
            "https://gitlab.example.com/api/v4",
            "--project",
            "42",
            "--bearer",
        ]);
        // GITLAB_ACCESS_TOKEN may be set in the environment.
        if std::env::var_os("GITLAB_ACCESS_TOKEN").is_none() {
            assert!(result.is_err());
        }
    }

    #[tokio::test]
    async fn test_execute_rejects_invalid_url() {
        let argv = [
            "regcull",
            "run",
            "--api-url",
            "not a url",
            "--project",
            "42",
        ];
        let Commands::Run(args) = Cli::try_parse_from(argv).unwrap().command else {
            panic!("expected run command");
        };

        let err = execute(args).await.unwrap_err();
        assert!(err.to_string().contains("Failed to create registry client"));
    }
}
