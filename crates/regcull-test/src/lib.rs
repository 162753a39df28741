//! # Regcull Test
//!
//! Test support for regcull.
//!
//! This crate provides:
//!
//! - [`MockRegistry`] - an in-memory [`RegistryApi`](regcull_registry::RegistryApi)
//!   that records every call it receives
//! - [`fixtures`] - helpers for building tags with known ages
//!
//! ## Example
//!
//! ```rust
//! use regcull_core::Repository;
//! use regcull_test::{fixtures, MockRegistry};
//!
//! let now = fixtures::fixed_now();
//! let registry = MockRegistry::new()
//!     .with_repository(
//!         Repository::new(1, "feature-x"),
//!         fixtures::aged_tags(1, &[("fresh", 5), ("stale", 40)], now),
//!     )
//!     .with_repository(Repository::new(2, "empty-repo"), Vec::new());
//!
//! assert!(registry.calls().is_empty());
//! ```

pub mod fixtures;
pub mod mock_registry;

pub use mock_registry::{MockRegistry, RegistryCall};
