//! Run-level error types for the labeler.
//!
//! Defines [`LabelerError`], the failures that end a labeling run. Messages
//! are written for the pull request author reading the failed check: each
//! variant says what went wrong and how to fix it.
//!
//! An out-of-scope pull request is not an error; it is the
//! [`Decision::OutOfScope`](crate::classify::Decision::OutOfScope) outcome.

use std::fmt;

use labeler_github::GitHubError;

use crate::config::ConfigError;

// ---------------------------------------------------------------------------
// LabelerError
// ---------------------------------------------------------------------------

/// Unified error type for a labeling run.
#[derive(Debug)]
pub enum LabelerError {
    /// The pull request number or its changed files could not be obtained.
    InputUnavailable {
        /// What was missing.
        detail: String,
        /// The API failure behind it, if any.
        source: Option<GitHubError>,
    },

    /// The configuration is absent or does not validate.
    ConfigInvalid {
        /// Where the configuration was looked up.
        path: String,
        /// Human-readable description of the problem.
        detail: String,
    },

    /// No single category explains every changed file.
    NoCategoryMatch {
        /// Number of changed files in the pull request.
        files: usize,
    },

    /// A label could not be applied.
    LabelMutationFailed {
        /// The label being added.
        label: String,
        /// The API failure.
        source: GitHubError,
    },
}

impl LabelerError {
    /// An input failure with no underlying API error.
    pub fn input(detail: impl Into<String>) -> Self {
        Self::InputUnavailable {
            detail: detail.into(),
            source: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Display (author-facing messages)
// ---------------------------------------------------------------------------

impl fmt::Display for LabelerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputUnavailable { detail, source } => {
                write!(f, "input unavailable: {detail}")?;
                if let Some(source) = source {
                    write!(f, "\n  cause: {source}")?;
                }
                write!(
                    f,
                    "\n  To fix: run on a pull_request event, \
                     or pass --pr and --repository explicitly."
                )
            }
            Self::ConfigInvalid { path, detail } => {
                write!(
                    f,
                    "configuration error in '{path}': {detail}\n  \
                     To fix: edit the config file and correct the issue, then re-run the check."
                )
            }
            Self::NoCategoryMatch { files } => {
                write!(
                    f,
                    "no single category matches all {files} changed file(s).\n  \
                     To fix: make sure the pull request changes only one category \
                     and one author folder."
                )
            }
            Self::LabelMutationFailed { label, source } => {
                write!(
                    f,
                    "could not add label '{label}': {source}\n  \
                     To fix: check that the token may write issues and pull requests, \
                     then re-run the check."
                )
            }
        }
    }
}

// ---------------------------------------------------------------------------
// std::error::Error
// ---------------------------------------------------------------------------

impl std::error::Error for LabelerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InputUnavailable {
                source: Some(err), ..
            }
            | Self::LabelMutationFailed { source: err, .. } => Some(err),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// From impls
// ---------------------------------------------------------------------------

impl From<ConfigError> for LabelerError {
    fn from(err: ConfigError) -> Self {
        Self::ConfigInvalid {
            path: err
                .path
                .map_or_else(|| "<inline>".to_owned(), |p| p.display().to_string()),
            detail: err.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn no_match_tells_author_what_to_do() {
        let msg = LabelerError::NoCategoryMatch { files: 3 }.to_string();
        assert!(msg.contains("3 changed file(s)"));
        assert!(msg.contains("one category and one author folder"));
    }

    #[test]
    fn config_error_converts_with_path() {
        let err = LabelerError::from(ConfigError {
            path: Some(PathBuf::from(".github/labeler.yml")),
            message: "missing field `dir`".to_owned(),
        });
        let msg = err.to_string();
        assert!(msg.contains(".github/labeler.yml"));
        assert!(msg.contains("missing field `dir`"));
    }

    #[test]
    fn label_failure_exposes_source() {
        let err = LabelerError::LabelMutationFailed {
            label: "essay".to_owned(),
            source: GitHubError::Http {
                status: 502,
                url: "https://api.github.com/x".to_owned(),
                message: "Bad Gateway".to_owned(),
            },
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("'essay'"));
        assert!(LabelerError::input("no pull request").source().is_none());
    }
}
