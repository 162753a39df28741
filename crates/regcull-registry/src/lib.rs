//! # Regcull Registry
//!
//! Container registry API client for regcull.
//!
//! This crate provides the [`RegistryApi`] trait the cleanup orchestrator is
//! written against, and [`GitLabClient`], its implementation over the GitLab
//! container registry HTTP API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use regcull_registry::{GitLabClient, RegistryApi, RegistryAuth, RegistryConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RegistryConfig::new("https://gitlab.example.com/api/v4")
//!         .with_project("group/app")
//!         .with_auth(RegistryAuth::private_token("glpat-xxxx"));
//!
//!     let client = GitLabClient::new(config)?;
//!
//!     for repository in client.list_repositories().await? {
//!         let tags = client.list_all_tags(repository.id, 100).await?;
//!         println!("{}: {} tags", repository.name, tags.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod api;
mod client;
mod config;
mod error;
mod wire;

pub use api::RegistryApi;
pub use client::GitLabClient;
pub use config::{RegistryAuth, RegistryConfig};
pub use error::{RegistryError, Result};
pub use reqwest::StatusCode;
pub use wire::{RepositoryEntry, TagDetail, TagEntry};
