//! contrib-labeler library crate.
//!
//! The primary interface is the `contrib-labeler` binary, run as a GitHub
//! Action on pull requests. This lib.rs exposes the classification core and
//! the pipeline around it so integration tests can drive them directly with an
//! in-memory [`GitHubApi`](labeler_github::GitHubApi).
//!
//! - [`glob`], [`model`], [`classify`]: pure classification, no I/O.
//! - [`config`]: YAML configuration with strict validation.
//! - [`action`], [`pipeline`], [`labels`], [`stats`]: the run around it.

pub mod action;
pub mod classify;
pub mod config;
pub mod error;
pub mod glob;
pub mod labels;
pub mod model;
pub mod pipeline;
pub mod stats;

pub use labeler_github as github;
