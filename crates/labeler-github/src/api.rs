//! The [`GitHubApi`] trait: the single abstraction boundary between the
//! labeler and GitHub.
//!
//! | Group    | Methods                                   |
//! |----------|-------------------------------------------|
//! | Pulls    | `list_pull_files`                         |
//! | Contents | `fetch_file`                              |
//! | Labels   | `list_issue_labels`, `add_issue_labels`   |
//! | Issues   | `update_issue_body`                       |
//! | Search   | `search_issue_count`                      |

use crate::error::GitHubError;
use crate::types::{PullFile, RepoSlug};

/// The GitHub operations the labeler needs.
///
/// Implementations may be backed by the REST API ([`RestClient`](crate::RestClient))
/// or an in-memory test double.
///
/// # Object safety
///
/// The trait is object-safe; callers may hold `&dyn GitHubApi`.
pub trait GitHubApi {
    /// List every file changed by pull request `number`, following pagination
    /// until the last page.
    fn list_pull_files(&self, repo: &RepoSlug, number: u64) -> Result<Vec<PullFile>, GitHubError>;

    /// Fetch the raw contents of `path` at `git_ref` (default branch when
    /// `None`).
    fn fetch_file(
        &self,
        repo: &RepoSlug,
        path: &str,
        git_ref: Option<&str>,
    ) -> Result<String, GitHubError>;

    /// Names of the labels currently on issue (or pull request) `number`.
    fn list_issue_labels(&self, repo: &RepoSlug, number: u64) -> Result<Vec<String>, GitHubError>;

    /// Add `labels` to issue `number`, keeping the labels already present.
    fn add_issue_labels(
        &self,
        repo: &RepoSlug,
        number: u64,
        labels: &[String],
    ) -> Result<(), GitHubError>;

    /// Replace the body of issue `number`.
    fn update_issue_body(&self, repo: &RepoSlug, number: u64, body: &str)
    -> Result<(), GitHubError>;

    /// Total number of issues and pull requests matching a search query
    /// (GitHub search syntax, e.g. `repo:o/r is:pr label:essay is:open`).
    fn search_issue_count(&self, query: &str) -> Result<u64, GitHubError>;
}
