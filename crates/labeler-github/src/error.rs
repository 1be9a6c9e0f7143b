//! Error types for GitHub operations.
//!
//! [`GitHubError`] is the single error type returned by all
//! [`GitHubApi`](crate::GitHubApi) methods. Callers can match on the failure
//! mode (bad credentials, missing resource, malformed response) without
//! parsing error messages.

use thiserror::Error;

/// Errors returned by [`GitHubApi`](crate::GitHubApi) operations.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The API answered with a non-success status code.
    #[error("GitHub API returned {status} for {url}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// The request URL.
        url: String,
        /// The `message` field of the error body, or the raw body.
        message: String,
    },

    /// The token was rejected (HTTP 401).
    #[error("GitHub rejected the credentials for {url}")]
    Unauthorized {
        /// The request URL.
        url: String,
    },

    /// The token cannot be sent as an HTTP header value.
    #[error("the GitHub token contains characters that are not valid in an HTTP header")]
    InvalidToken,

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("request to GitHub failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response body could not be decoded into the expected shape.
    #[error("could not decode {what}: {message}")]
    Decode {
        /// What was being decoded (e.g. `"pull request files"`).
        what: String,
        /// Decoder error text.
        message: String,
    },

    /// A repository slug was not of the form `owner/name`.
    #[error("invalid repository `{value}`: expected `owner/name`")]
    InvalidRepo {
        /// The raw value that failed to parse.
        value: String,
    },
}

impl GitHubError {
    /// Return `true` if the API reported the resource as missing (HTTP 404).
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }
}
