//! Core value types: changed files and validated categories.

use std::fmt;
use std::str::FromStr;

use labeler_github::{PullFile, PullFileStatus};
use serde::Serialize;

use crate::glob::{Glob, GlobError};

// ---------------------------------------------------------------------------
// ChangedFile
// ---------------------------------------------------------------------------

/// How a pull request changed a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    Added,
    Modified,
    Removed,
    Renamed,
    Copied,
    Changed,
    Unchanged,
    Unknown,
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Removed => "removed",
            Self::Renamed => "renamed",
            Self::Copied => "copied",
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

impl FromStr for ChangeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "added" => Ok(Self::Added),
            "modified" => Ok(Self::Modified),
            "removed" | "deleted" => Ok(Self::Removed),
            "renamed" => Ok(Self::Renamed),
            "copied" => Ok(Self::Copied),
            "changed" => Ok(Self::Changed),
            "unchanged" => Ok(Self::Unchanged),
            other => Err(format!(
                "unknown change status '{other}'. \
                 Use: added, modified, removed, renamed, copied, changed, unchanged"
            )),
        }
    }
}

impl From<PullFileStatus> for ChangeStatus {
    fn from(status: PullFileStatus) -> Self {
        match status {
            PullFileStatus::Added => Self::Added,
            PullFileStatus::Modified => Self::Modified,
            PullFileStatus::Removed => Self::Removed,
            PullFileStatus::Renamed => Self::Renamed,
            PullFileStatus::Copied => Self::Copied,
            PullFileStatus::Changed => Self::Changed,
            PullFileStatus::Unchanged => Self::Unchanged,
            PullFileStatus::Unknown => Self::Unknown,
        }
    }
}

/// A file touched by a pull request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChangedFile {
    /// Path relative to the repository root, `/`-separated.
    pub path: String,
    pub status: ChangeStatus,
}

impl ChangedFile {
    #[must_use]
    pub fn new(path: impl Into<String>, status: ChangeStatus) -> Self {
        Self {
            path: path.into(),
            status,
        }
    }

    #[must_use]
    pub fn added(path: impl Into<String>) -> Self {
        Self::new(path, ChangeStatus::Added)
    }

    #[must_use]
    pub fn modified(path: impl Into<String>) -> Self {
        Self::new(path, ChangeStatus::Modified)
    }
}

impl From<PullFile> for ChangedFile {
    fn from(file: PullFile) -> Self {
        Self::new(file.filename, file.status.into())
    }
}

impl fmt::Display for ChangedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path, self.status)
    }
}

/// Parses `status:path` (e.g. `added:essay/siper/README.md`). Only a full
/// status name counts as a prefix; anything else, a bare path included, is
/// taken whole as a modified path.
impl FromStr for ChangedFile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty file argument".to_owned());
        }
        let prefixed = s
            .split_once(':')
            .and_then(|(status, path)| Some((status.parse::<ChangeStatus>().ok()?, path)));
        match prefixed {
            Some((_, "")) => Err(format!("missing path in '{s}'")),
            Some((status, path)) => Ok(Self::new(path, status)),
            None => Ok(Self::modified(s)),
        }
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// A validated category rule with its patterns compiled.
///
/// The effective file pattern is `prefix + folder + "/" + suffix`; the marker
/// pattern is `prefix + folder + "/" + marker`. Both are compiled from the
/// concatenated text, never from the parts.
#[derive(Clone, Debug)]
pub struct Category {
    name: String,
    prefix: String,
    folder: String,
    suffix: String,
    marker: String,
    files: Glob,
    marker_files: Glob,
    prefix_len: usize,
}

impl Category {
    /// Compile a category rule.
    ///
    /// # Errors
    /// Returns [`GlobError`] if either composed pattern fails to compile.
    pub fn new(
        name: impl Into<String>,
        prefix: impl Into<String>,
        folder: impl Into<String>,
        suffix: impl Into<String>,
        marker: impl Into<String>,
    ) -> Result<Self, GlobError> {
        let (prefix, folder, suffix, marker) =
            (prefix.into(), folder.into(), suffix.into(), marker.into());

        let author_root = format!("{prefix}{folder}");
        let files = Glob::new(&format!("{author_root}/{suffix}"))?;
        let marker_files = Glob::new(&format!("{author_root}/{marker}"))?;
        let prefix_len = author_root.split('/').count();

        Ok(Self {
            name: name.into(),
            prefix,
            folder,
            suffix,
            marker,
            files,
            marker_files,
            prefix_len,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn folder(&self) -> &str {
        &self.folder
    }

    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    #[must_use]
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// The composed pattern every changed file must satisfy.
    #[must_use]
    pub const fn file_pattern(&self) -> &Glob {
        &self.files
    }

    /// The composed pattern of the new-submission marker file.
    #[must_use]
    pub const fn marker_pattern(&self) -> &Glob {
        &self.marker_files
    }

    /// Number of `/`-separated segments in `prefix + folder`: the leading
    /// segments that must agree for files to share one author folder.
    #[must_use]
    pub const fn prefix_len(&self) -> usize {
        self.prefix_len
    }
}
