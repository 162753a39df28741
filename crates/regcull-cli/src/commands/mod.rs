//! CLI commands and argument parsing.

pub mod check;
pub mod connection;
pub mod policy;
pub mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Regcull - Retention policy cleanup for GitLab container registries
#[derive(Parser)]
#[command(name = "regcull")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Also append log output to this file (without colors)
    #[arg(long, global = true, env = "REGCULL_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Apply retention policies to every repository of a project's registry
    Run(run::RunArgs),

    /// Validate a policy configuration and print the effective policies
    Check(check::CheckArgs),

    /// Print version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_log_file_is_global() {
        let cli = Cli::try_parse_from(["regcull", "check", "--log-file", "cleanup.log"]).unwrap();
        assert_eq!(cli.log_file, Some(PathBuf::from("cleanup.log")));
        assert!(matches!(cli.command, Commands::Check(_)));
    }
}
