//! Blocking REST implementation of [`GitHubApi`].

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, LINK};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::api::GitHubApi;
use crate::error::GitHubError;
use crate::types::{LabelPayload, PullFile, RepoSlug, SearchPayload};

/// Public GitHub REST endpoint, used when `GITHUB_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const PER_PAGE: u32 = 100;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";
const API_VERSION: &str = "2022-11-28";

/// [`GitHubApi`] backed by `reqwest`'s blocking client.
///
/// Every request carries the bearer token, the JSON media type and a fixed
/// API version header. Requests time out after 30 seconds and are never
/// retried.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: Client,
    base_url: String,
}

impl RestClient {
    /// Build a client for `base_url` (e.g. [`DEFAULT_API_URL`]).
    ///
    /// An empty token sends unauthenticated requests, which is enough for
    /// reading public repositories.
    ///
    /// # Errors
    /// Returns [`GitHubError::InvalidToken`] if the token is not a valid header
    /// value, or [`GitHubError::Transport`] if the TLS backend fails to
    /// initialize.
    pub fn new(base_url: &str, token: &str) -> Result<Self, GitHubError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));
        if !token.is_empty() {
            let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| GitHubError::InvalidToken)?;
            auth.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth);
        }

        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// The API root this client talks to, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn repo_url(&self, repo: &RepoSlug, rest: &str) -> String {
        format!("{}/repos/{}/{}/{rest}", self.base_url, repo.owner, repo.name)
    }

    fn send(request: RequestBuilder) -> Result<Response, GitHubError> {
        let response = request.send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        if status == StatusCode::UNAUTHORIZED {
            return Err(GitHubError::Unauthorized { url });
        }
        let body = response.text().unwrap_or_default();
        Err(GitHubError::Http {
            status: status.as_u16(),
            url,
            message: error_message(&body),
        })
    }

    fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, GitHubError> {
        let body = response.text()?;
        serde_json::from_str(&body).map_err(|e| GitHubError::Decode {
            what: what.to_owned(),
            message: e.to_string(),
        })
    }

    /// GET every page of a list endpoint, following `Link: rel="next"`.
    fn get_all<T: DeserializeOwned>(
        &self,
        first: String,
        what: &str,
    ) -> Result<Vec<T>, GitHubError> {
        let mut items = Vec::new();
        let mut url = Some(first);
        while let Some(current) = url.take() {
            tracing::debug!(url = %current, "GET");
            let response = Self::send(self.http.get(&current))?;
            url = response
                .headers()
                .get(LINK)
                .and_then(|v| v.to_str().ok())
                .and_then(next_page_url);
            let page: Vec<T> = Self::decode(response, what)?;
            items.extend(page);
        }
        Ok(items)
    }
}

impl GitHubApi for RestClient {
    #[instrument(skip(self))]
    fn list_pull_files(&self, repo: &RepoSlug, number: u64) -> Result<Vec<PullFile>, GitHubError> {
        let url = self.repo_url(repo, &format!("pulls/{number}/files?per_page={PER_PAGE}"));
        self.get_all(url, "pull request files")
    }

    #[instrument(skip(self))]
    fn fetch_file(
        &self,
        repo: &RepoSlug,
        path: &str,
        git_ref: Option<&str>,
    ) -> Result<String, GitHubError> {
        let url = self.repo_url(repo, &format!("contents/{}", path.trim_start_matches('/')));
        let mut request = self.http.get(&url).header(ACCEPT, RAW_MEDIA_TYPE);
        if let Some(git_ref) = git_ref {
            request = request.query(&[("ref", git_ref)]);
        }
        tracing::debug!(url = %url, "GET");
        Ok(Self::send(request)?.text()?)
    }

    #[instrument(skip(self))]
    fn list_issue_labels(&self, repo: &RepoSlug, number: u64) -> Result<Vec<String>, GitHubError> {
        let url = self.repo_url(repo, &format!("issues/{number}/labels?per_page={PER_PAGE}"));
        let labels: Vec<LabelPayload> = self.get_all(url, "issue labels")?;
        Ok(labels.into_iter().map(|l| l.name).collect())
    }

    #[instrument(skip(self))]
    fn add_issue_labels(
        &self,
        repo: &RepoSlug,
        number: u64,
        labels: &[String],
    ) -> Result<(), GitHubError> {
        let url = self.repo_url(repo, &format!("issues/{number}/labels"));
        let body = serde_json::json!({ "labels": labels });
        Self::send(self.http.post(url).json(&body))?;
        Ok(())
    }

    #[instrument(skip(self, body))]
    fn update_issue_body(
        &self,
        repo: &RepoSlug,
        number: u64,
        body: &str,
    ) -> Result<(), GitHubError> {
        let url = self.repo_url(repo, &format!("issues/{number}"));
        let payload = serde_json::json!({ "body": body });
        Self::send(self.http.patch(url).json(&payload))?;
        Ok(())
    }

    #[instrument(skip(self))]
    fn search_issue_count(&self, query: &str) -> Result<u64, GitHubError> {
        let url = format!("{}/search/issues", self.base_url);
        let request = self.http.get(url).query(&[("q", query), ("per_page", "1")]);
        let payload: SearchPayload = Self::decode(Self::send(request)?, "search results")?;
        Ok(payload.total_count)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Pull the `message` out of a GitHub error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.trim().to_owned())
}

/// Extract the `rel="next"` target from an RFC 8288 `Link` header.
fn next_page_url(link: &str) -> Option<String> {
    link.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| {
            let param = param.trim();
            param == r#"rel="next""# || param == "rel=next"
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_owned)
    })
}
