//! GitHub abstraction layer for contrib-labeler.
//!
//! This crate defines the [`GitHubApi`] trait, the single interface through
//! which the labeler talks to GitHub. The labeler's pipeline programs against
//! the trait; [`RestClient`] is the production implementation and tests use an
//! in-memory double.
//!
//! # Crate layout
//!
//! - [`api`]: the [`GitHubApi`] trait definition.
//! - [`types`]: value types used in trait signatures ([`RepoSlug`],
//!   [`PullFile`], [`PullFileStatus`]).
//! - [`error`]: the [`GitHubError`] enum returned by all trait methods.

pub mod api;
pub mod error;
pub mod types;

mod rest;

pub use api::GitHubApi;
pub use error::GitHubError;
pub use rest::{DEFAULT_API_URL, RestClient};
pub use types::{PullFile, PullFileStatus, RepoSlug};
