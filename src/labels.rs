//! Label mutation: add a label to an issue without disturbing the others.

use labeler_github::{GitHubApi, GitHubError, RepoSlug};
use tracing::instrument;

/// Make sure `label` is on issue `number`.
///
/// Reads the current labels first and only adds `label` if it is missing, so
/// repeated runs leave the label set unchanged. Returns `true` if the label
/// was added. Failures are returned to the caller, never retried.
///
/// # Errors
/// Returns [`GitHubError`] if listing or adding labels fails.
#[instrument(skip(api))]
pub fn ensure_label(
    api: &dyn GitHubApi,
    repo: &RepoSlug,
    number: u64,
    label: &str,
) -> Result<bool, GitHubError> {
    let current = api.list_issue_labels(repo, number)?;
    tracing::info!("current labels: [{}]", current.join(", "));

    if current.iter().any(|existing| existing == label) {
        tracing::info!(label, "label already present");
        return Ok(false);
    }

    api.add_issue_labels(repo, number, &[label.to_owned()])?;
    tracing::info!(label, "label added");
    Ok(true)
}
