//! Run report rendering.
//!
//! This module provides formatters for cleanup run reports.

use std::fmt::Write as FmtWrite;
use std::io::{self, Write};

use crate::report::{DeletionStatus, RepositoryOutcome, RepositoryReport, RunReport, SkipReason};

/// Trait for reporting cleanup runs.
pub trait Reporter {
    /// Renders a run report to a string.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the report cannot be rendered.
    fn render(&self, report: &RunReport) -> io::Result<String>;

    /// Writes a run report to stdout.
    ///
    /// # Errors
    ///
    /// Returns an IO error if writing to output fails.
    fn report(&self, report: &RunReport) -> io::Result<()> {
        let rendered = self.render(report)?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(rendered.as_bytes())?;
        stdout.flush()
    }
}

/// Console reporter producing human-readable text.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    /// Whether to use colors.
    use_colors: bool,
    /// Whether to list every repository.
    verbose: bool,
}

impl ConsoleReporter {
    /// Creates a new console reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Sets whether to use colors.
    #[must_use]
    pub const fn with_colors(mut self, colors: bool) -> Self {
        self.use_colors = colors;
        self
    }

    /// Sets verbose mode.
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn deletion_label(&self, status: &DeletionStatus, dry_run_label: &str) -> String {
        match status {
            DeletionStatus::Deleted { .. } => self.paint("32", "deleted"),
            DeletionStatus::Simulated => self.paint("33", dry_run_label),
            DeletionStatus::Failed { message, .. } => {
                self.paint("31", &format!("failed ({message})"))
            }
        }
    }

    /// Formats one repository line, plus failed tag deletions beneath it.
    fn format_repository(&self, entry: &RepositoryReport) -> String {
        let name = entry.repository.label();
        let mut line = match &entry.outcome {
            RepositoryOutcome::Skipped {
                reason,
                tag_count,
                total_size,
            } => {
                let detail = match (reason, tag_count) {
                    (SkipReason::Vanished, _) => "vanished".to_string(),
                    (SkipReason::IgnoredSizeReport, Some(count)) => format!(
                        "ignored, {count} tags, {}",
                        format_size(total_size.unwrap_or(0))
                    ),
                    _ => "ignored".to_string(),
                };
                format!("  {name}: {}", self.paint("33", &format!("skipped ({detail})")))
            }
            RepositoryOutcome::DeletedEmpty { deletion } => format!(
                "  {name}: empty, {}",
                self.deletion_label(deletion, "would be deleted")
            ),
            RepositoryOutcome::TagsProcessed {
                policy,
                decision,
                deletions,
                vanished,
            } => {
                let failed = deletions.iter().filter(|d| !d.status.is_success()).count();
                let mut line = format!(
                    "  {name} [{policy}]: kept {}, deleted {}",
                    decision.tags_kept.len(),
                    deletions.len() - failed
                );
                if failed > 0 {
                    let _ = write!(line, ", {}", self.paint("31", &format!("{failed} failed")));
                }
                if !vanished.is_empty() {
                    let _ = write!(line, ", {} vanished", vanished.len());
                }
                line
            }
            RepositoryOutcome::Failed { error } => {
                format!("  {name}: {}", self.paint("31", &format!("failed: {error}")))
            }
        };

        if let RepositoryOutcome::TagsProcessed { deletions, .. } = &entry.outcome {
            for deletion in deletions.iter().filter(|d| !d.status.is_success()) {
                let _ = write!(
                    line,
                    "\n    {} {}",
                    deletion.tag,
                    self.deletion_label(&deletion.status, "")
                );
            }
        }

        line
    }
}

impl Reporter for ConsoleReporter {
    fn render(&self, report: &RunReport) -> io::Result<String> {
        let summary = &report.summary;
        let mut out = String::new();

        let title = if report.dry_run {
            "Cleanup summary (dry run)"
        } else {
            "Cleanup summary"
        };
        let _ = writeln!(out, "{title}");
        let _ = writeln!(out, "{}", "=".repeat(title.len()));

        if self.verbose {
            for entry in &report.repositories {
                let _ = writeln!(out, "{}", self.format_repository(entry));
            }
            let _ = writeln!(out);
        }

        let _ = writeln!(
            out,
            "Repositories: {} total, {} processed, {} skipped, {} failed",
            summary.repositories_total,
            summary.repositories_processed,
            summary.repositories_skipped,
            summary.repositories_failed
        );
        let _ = writeln!(
            out,
            "Empty repositories deleted: {} ({} failed)",
            summary.empty_repositories_deleted, summary.empty_repositories_failed
        );
        let _ = writeln!(
            out,
            "Tags: {} kept, {} deleted, {} failed, {} vanished",
            summary.tags_kept, summary.tags_deleted, summary.tags_failed, summary.tags_vanished
        );

        if summary.ignored_tags > 0 {
            let _ = writeln!(
                out,
                "Ignored repositories hold {} tags ({})",
                summary.ignored_tags,
                format_size(summary.ignored_total_size)
            );
        }

        if report.dry_run {
            let _ = writeln!(
                out,
                "{}",
                self.paint("33", "Dry run: no tags or repositories were deleted.")
            );
        }

        Ok(out)
    }
}

/// Formats a byte count with binary units.
#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// JSON reporter for scripting.
#[derive(Debug, Default)]
pub struct JsonReporter {
    pretty: bool,
}

impl JsonReporter {
    /// Creates a compact JSON reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    /// Enables pretty-printed output.
    #[must_use]
    pub const fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }
}

impl Reporter for JsonReporter {
    fn render(&self, report: &RunReport) -> io::Result<String> {
        let mut json = if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        }
        .map_err(io::Error::other)?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{RepositoryReport, TagDeletion};
    use chrono::Utc;
    use regcull_core::{CleanupDecision, Repository, RetentionPolicy, Tag};

    fn sample_report(dry_run: bool) -> RunReport {
        let now = Utc::now();
        let mut report = RunReport::new(dry_run, now);
        report.push(RepositoryReport {
            repository: Repository::new(1, "main"),
            outcome: RepositoryOutcome::Skipped {
                reason: SkipReason::IgnoredSizeReport,
                tag_count: Some(42),
                total_size: Some(3 * 1024 * 1024 * 1024 / 2),
            },
        });
        report.push(RepositoryReport {
            repository: Repository::new(3, "retired"),
            outcome: RepositoryOutcome::Skipped {
                reason: SkipReason::Vanished,
                tag_count: None,
                total_size: None,
            },
        });
        report.push(RepositoryReport {
            repository: Repository::new(2, "feature-x"),
            outcome: RepositoryOutcome::TagsProcessed {
                policy: RetentionPolicy::max_age(30),
                decision: CleanupDecision {
                    repository: Repository::new(2, "feature-x"),
                    tags_kept: vec![Tag::new("fresh", 2, now)],
                    tags_to_delete: vec![Tag::new("a", 2, now), Tag::new("b", 2, now)],
                    empty: false,
                },
                deletions: vec![
                    TagDeletion {
                        tag: "a".to_string(),
                        status: DeletionStatus::Deleted { status: 200 },
                    },
                    TagDeletion {
                        tag: "b".to_string(),
                        status: DeletionStatus::Failed {
                            status: Some(403),
                            message: "403 Forbidden".to_string(),
                        },
                    },
                ],
                vanished: Vec::new(),
            },
        });
        report
    }

    #[test]
    fn test_console_summary_without_colors() {
        let rendered = ConsoleReporter::new()
            .with_colors(false)
            .render(&sample_report(false))
            .unwrap();

        assert!(rendered.starts_with("Cleanup summary\n===============\n"));
        assert!(rendered.contains("Repositories: 3 total, 1 processed, 2 skipped, 0 failed"));
        assert!(rendered.contains("Ignored repositories hold 42 tags (1.5 GiB)"));
        assert!(rendered.contains("Tags: 1 kept, 1 deleted, 1 failed, 0 vanished"));
        assert!(!rendered.contains("\x1b["));
        assert!(!rendered.contains("feature-x"));
    }

    #[test]
    fn test_console_verbose_lists_repositories() {
        let rendered = ConsoleReporter::new()
            .with_colors(false)
            .with_verbose(true)
            .render(&sample_report(false))
            .unwrap();

        assert!(rendered.contains("  main: skipped (ignored, 42 tags, 1.5 GiB)"));
        assert!(rendered.contains("  retired: skipped (vanished)"));
        assert!(rendered.contains("  feature-x [max age 30 days]: kept 1, deleted 1, 1 failed"));
        assert!(rendered.contains("    b failed (403 Forbidden)"));
    }

    #[test]
    fn test_console_dry_run_banner() {
        let rendered = ConsoleReporter::new()
            .with_colors(false)
            .render(&sample_report(true))
            .unwrap();

        assert!(rendered.starts_with("Cleanup summary (dry run)"));
        assert!(rendered.contains("Dry run: no tags or repositories were deleted."));
    }

    #[test]
    fn test_json_reporter() {
        let rendered = JsonReporter::new().render(&sample_report(false)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(json["dry_run"], false);
        assert_eq!(json["summary"]["tags_failed"], 1);
        assert_eq!(json["repositories"][0]["outcome"]["state"], "skipped");
        assert_eq!(json["repositories"][0]["outcome"]["tag_count"], 42);
        assert_eq!(json["repositories"][1]["outcome"]["reason"], "vanished");
        assert_eq!(
            json["repositories"][2]["outcome"]["deletions"][1]["status"],
            403
        );
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KiB");
        assert_eq!(format_size(350_224_384), "334.0 MiB");
    }
}
