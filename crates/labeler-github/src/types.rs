//! Value types shared between the [`GitHubApi`](crate::GitHubApi) trait and
//! its callers. They mirror the subset of the REST payloads the labeler reads.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::GitHubError;

// ---------------------------------------------------------------------------
// RepoSlug
// ---------------------------------------------------------------------------

/// A repository identified as `owner/name`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RepoSlug {
    /// Account or organization that owns the repository.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepoSlug {
    /// Create a slug from its two halves.
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoSlug {
    type Err = GitHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GitHubError::InvalidRepo {
            value: s.to_owned(),
        };
        let (owner, name) = s.trim().split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }
        Ok(Self::new(owner, name))
    }
}

// ---------------------------------------------------------------------------
// Pull request files
// ---------------------------------------------------------------------------

/// Change status of a file in a pull request, as reported by the files
/// endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullFileStatus {
    Added,
    Removed,
    Modified,
    Renamed,
    Copied,
    Changed,
    Unchanged,
    /// Any status this client does not know about yet.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for PullFileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Modified => "modified",
            Self::Renamed => "renamed",
            Self::Copied => "copied",
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// One file touched by a pull request.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PullFile {
    /// Path relative to the repository root.
    pub filename: String,
    /// How the pull request changed the file.
    pub status: PullFileStatus,
    /// Path before a rename, when `status` is `renamed`.
    #[serde(default)]
    pub previous_filename: Option<String>,
}

// ---------------------------------------------------------------------------
// Labels and search
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct LabelPayload {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchPayload {
    pub total_count: u64,
}
