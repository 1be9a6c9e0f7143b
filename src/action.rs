//! GitHub Actions context, made explicit.
//!
//! The binary collects its inputs (token, configuration path, repository,
//! event payload) once at startup and hands an [`ActionInputs`] to the
//! pipeline. Nothing below `main` reads the environment.

use std::path::Path;

use labeler_github::RepoSlug;
use serde_json::Value;

use crate::error::LabelerError;

/// Where the configuration file is read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    /// Fetched through the contents API at the triggering commit.
    Repository,
    /// Read from the local checkout.
    Workspace,
}

/// Everything a labeling run needs from its environment.
#[derive(Clone, Debug)]
pub struct ActionInputs {
    pub repo: RepoSlug,
    pub pr_number: u64,
    /// Path of the configuration file, relative to the repository root.
    pub config_path: String,
    pub config_source: ConfigSource,
    /// Commit to read the configuration at (`GITHUB_SHA`); default branch
    /// when `None`.
    pub git_ref: Option<String>,
    /// Log what would change instead of changing it.
    pub dry_run: bool,
}

/// Parse the `owner/name` repository input.
///
/// # Errors
/// Returns [`LabelerError::InputUnavailable`] when the value is missing or
/// malformed.
pub fn parse_repository(value: Option<&str>) -> Result<RepoSlug, LabelerError> {
    let value = value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| LabelerError::input("no repository given (GITHUB_REPOSITORY is unset)"))?;
    value.parse().map_err(|e| LabelerError::InputUnavailable {
        detail: format!("invalid repository '{value}'"),
        source: Some(e),
    })
}

/// The pull request number carried by an event payload, if any.
#[must_use]
pub fn pull_request_number(event: &Value) -> Option<u64> {
    event.get("pull_request")?.get("number")?.as_u64()
}

/// Read the event payload at `path` and extract the pull request number.
///
/// # Errors
/// Returns [`LabelerError::InputUnavailable`] if the file cannot be read or
/// parsed, or the event is not about a pull request.
pub fn pull_request_number_from_event(path: &Path) -> Result<u64, LabelerError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        LabelerError::input(format!("could not read event payload {}: {e}", path.display()))
    })?;
    let event: Value = serde_json::from_str(&contents).map_err(|e| {
        LabelerError::input(format!("invalid event payload {}: {e}", path.display()))
    })?;
    pull_request_number(&event)
        .ok_or_else(|| LabelerError::input("invalid pr number: the event has no pull_request"))
}

/// Resolve the pull request number: an explicit override wins over the
/// event payload.
///
/// # Errors
/// Returns [`LabelerError::InputUnavailable`] when neither source yields a
/// number.
pub fn resolve_pr_number(
    explicit: Option<u64>,
    event_path: Option<&Path>,
) -> Result<u64, LabelerError> {
    match (explicit, event_path) {
        (Some(number), _) => Ok(number),
        (None, Some(path)) => pull_request_number_from_event(path),
        (None, None) => Err(LabelerError::input(
            "invalid pr number: no --pr given and GITHUB_EVENT_PATH is unset",
        )),
    }
}

// ---------------------------------------------------------------------------
// Workflow commands
// ---------------------------------------------------------------------------

/// Escape data for a workflow command (`%`, CR and LF).
#[must_use]
pub fn escape_workflow_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// An `::error::` workflow command that marks the step as failed with
/// `message` in the run summary.
#[must_use]
pub fn error_annotation(message: &str) -> String {
    format!("::error::{}", escape_workflow_data(message))
}

/// A `::notice::` workflow command.
#[must_use]
pub fn notice_annotation(message: &str) -> String {
    format!("::notice::{}", escape_workflow_data(message))
}
