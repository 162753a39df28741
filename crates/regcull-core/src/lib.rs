//! # Regcull Core
//!
//! Core types and the retention policy evaluator for regcull, a cleanup tool
//! for container image registries.
//!
//! This crate has no I/O. It provides:
//!
//! - [`Repository`], [`TagRef`] and [`Tag`] - registry records
//! - [`RetentionPolicy`] - the two retention rules and their selection
//! - [`evaluate`] - the pure keep/delete partition of a repository's tags
//! - [`RunConfiguration`] - the per-run policy tables and flags
//! - [`CleanupDecision`] - the per-repository result of an evaluation
//!
//! ## Example
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use regcull_core::{evaluate, select_policy, RunConfiguration, Tag};
//!
//! let now = Utc::now();
//! let config = RunConfiguration::default().with_max_age_days(30);
//!
//! let tags = vec![
//!     Tag::new("fresh", 1, now - Duration::days(5)),
//!     Tag::new("stale", 1, now - Duration::days(40)),
//! ];
//!
//! let policy = select_policy("feature-x", &config).expect("not ignored");
//! let evaluation = evaluate(tags, &policy, now);
//!
//! assert_eq!(evaluation.kept[0].name, "fresh");
//! assert_eq!(evaluation.to_delete[0].name, "stale");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod decision;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod policy;


pub use config::{RunConfiguration, DEFAULT_MAX_AGE_DAYS, MAX_TAGS_PER_PAGE};
pub use decision::CleanupDecision;
pub use error::{Error, Result};
pub use evaluator::{age_in_days, evaluate, Evaluation};
pub use model::{Repository, Tag, TagRef};
pub use policy::{select_policy, RetentionPolicy};
