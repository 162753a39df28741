//! # Regcull Cleanup
//!
//! Retention policy enforcement for container registries.
//!
//! The [`Orchestrator`] lists a registry's repositories, evaluates each
//! repository's retention policy and deletes (or, in dry-run mode, only
//! reports) the tags outside the retained set. Every run produces a
//! [`RunReport`] that [`Reporter`] implementations render for people or
//! scripts.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  list / detail   ┌───────────────┐
//! │ Orchestrator │ ───────────────▶ │  RegistryApi  │
//! │              │ ◀─── delete ──── │ (GitLabClient)│
//! └──────┬───────┘                  └───────────────┘
//!        │ evaluate (pure)
//!        ▼
//! ┌──────────────┐      RunReport   ┌───────────────┐
//! │ regcull-core │ ───────────────▶ │   Reporter    │
//! └──────────────┘                  └───────────────┘
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;
mod orchestrator;
mod report;
mod reporter;

pub use error::{CleanupError, Result};
pub use orchestrator::Orchestrator;
pub use report::{
    DeletionStatus, RepositoryOutcome, RepositoryReport, RunReport, RunSummary, SkipReason,
    TagDeletion,
};
pub use reporter::{ConsoleReporter, JsonReporter, Reporter};
