//! Shared test helpers for contrib-labeler integration tests.
//!
//! [`FakeGitHub`] is an in-memory [`GitHubApi`]: it serves a fixed set of
//! changed files and a configuration file, records label and issue writes,
//! and can be told to fail individual operations. Nothing touches the network.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use labeler::action::{ActionInputs, ConfigSource};
use labeler::github::{GitHubApi, GitHubError, PullFile, PullFileStatus, RepoSlug};

pub const PR: u64 = 12;
pub const CONFIG_PATH: &str = ".github/labeler.yml";
pub const AUTHOR: &str = "+([a-zA-Z])?(-+([a-zA-Z]))";

/// A configuration with three categories and a statistics issue.
pub const CONFIG: &str = r#"
dir: demo/contributions/**
issue: 3
categories:
  essay:
    glob: demo/contributions/essay/
    folder: "+([a-zA-Z])?(-+([a-zA-Z]))"
    suffix: "**"
    proposal: README.md
  presentation:
    glob: demo/contributions/presentation/week[1-9]/
    folder: "+([a-zA-Z])?(-+([a-zA-Z]))"
    suffix: "**"
    proposal: README.md
  demo:
    glob: demo/contributions/demo/
    folder: "+([a-zA-Z])?(-+([a-zA-Z]))"
    suffix: "*"
    proposal: README.md
"#;

pub fn repo() -> RepoSlug {
    RepoSlug::new("octo", "course")
}

pub fn added(path: &str) -> PullFile {
    pull_file(path, PullFileStatus::Added)
}

pub fn modified(path: &str) -> PullFile {
    pull_file(path, PullFileStatus::Modified)
}

pub fn renamed(from: &str, to: &str) -> PullFile {
    PullFile {
        previous_filename: Some(from.to_owned()),
        ..pull_file(to, PullFileStatus::Renamed)
    }
}

pub fn pull_file(path: &str, status: PullFileStatus) -> PullFile {
    PullFile {
        filename: path.to_owned(),
        status,
        previous_filename: None,
    }
}

/// Inputs for a run against [`FakeGitHub`], reading the configuration through
/// the API at a fixed commit.
pub fn inputs() -> ActionInputs {
    ActionInputs {
        repo: repo(),
        pr_number: PR,
        config_path: CONFIG_PATH.to_owned(),
        config_source: ConfigSource::Repository,
        git_ref: Some("abc123".to_owned()),
        dry_run: false,
    }
}

fn http_error(status: u16, url: &str, message: &str) -> GitHubError {
    GitHubError::Http {
        status,
        url: url.to_owned(),
        message: message.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// FakeGitHub
// ---------------------------------------------------------------------------

/// In-memory GitHub for one repository and one pull request.
#[derive(Debug, Default)]
pub struct FakeGitHub {
    files: Vec<PullFile>,
    config: Option<String>,
    labels: RefCell<Vec<String>>,
    add_calls: RefCell<Vec<Vec<String>>>,
    issue_body: RefCell<Option<String>>,
    search_counts: HashMap<String, u64>,
    queries: RefCell<Vec<String>>,
    fetched_ref: RefCell<Option<String>>,
    fail_list_files: bool,
    fail_add_labels: bool,
    fail_search: bool,
}

impl FakeGitHub {
    pub fn new(files: Vec<PullFile>) -> Self {
        Self {
            files,
            config: Some(CONFIG.to_owned()),
            ..Self::default()
        }
    }

    pub fn with_config(mut self, yaml: &str) -> Self {
        self.config = Some(yaml.to_owned());
        self
    }

    pub fn without_config(mut self) -> Self {
        self.config = None;
        self
    }

    pub fn with_labels(self, labels: &[&str]) -> Self {
        *self.labels.borrow_mut() = labels.iter().map(|l| (*l).to_owned()).collect();
        self
    }

    pub fn with_search_count(mut self, query: &str, count: u64) -> Self {
        self.search_counts.insert(query.to_owned(), count);
        self
    }

    pub fn failing_list_files(mut self) -> Self {
        self.fail_list_files = true;
        self
    }

    pub fn failing_add_labels(mut self) -> Self {
        self.fail_add_labels = true;
        self
    }

    pub fn failing_search(mut self) -> Self {
        self.fail_search = true;
        self
    }

    /// Labels currently on the pull request.
    pub fn labels(&self) -> Vec<String> {
        self.labels.borrow().clone()
    }

    /// Every `add_issue_labels` call, in order.
    pub fn add_calls(&self) -> Vec<Vec<String>> {
        self.add_calls.borrow().clone()
    }

    /// The last body written to an issue.
    pub fn issue_body(&self) -> Option<String> {
        self.issue_body.borrow().clone()
    }

    /// Every search query, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }

    /// The ref the configuration was fetched at.
    pub fn fetched_ref(&self) -> Option<String> {
        self.fetched_ref.borrow().clone()
    }
}

impl GitHubApi for FakeGitHub {
    fn list_pull_files(&self, _repo: &RepoSlug, number: u64) -> Result<Vec<PullFile>, GitHubError> {
        if self.fail_list_files {
            return Err(http_error(502, "pulls/files", "Bad Gateway"));
        }
        if number != PR {
            return Err(http_error(404, "pulls/files", "Not Found"));
        }
        Ok(self.files.clone())
    }

    fn fetch_file(
        &self,
        _repo: &RepoSlug,
        path: &str,
        git_ref: Option<&str>,
    ) -> Result<String, GitHubError> {
        *self.fetched_ref.borrow_mut() = git_ref.map(str::to_owned);
        match &self.config {
            Some(text) if path == CONFIG_PATH => Ok(text.clone()),
            _ => Err(http_error(404, path, "Not Found")),
        }
    }

    fn list_issue_labels(
        &self,
        _repo: &RepoSlug,
        _number: u64,
    ) -> Result<Vec<String>, GitHubError> {
        Ok(self.labels())
    }

    fn add_issue_labels(
        &self,
        _repo: &RepoSlug,
        _number: u64,
        labels: &[String],
    ) -> Result<(), GitHubError> {
        if self.fail_add_labels {
            return Err(http_error(403, "issues/labels", "Resource not accessible by integration"));
        }
        self.add_calls.borrow_mut().push(labels.to_vec());
        let mut current = self.labels.borrow_mut();
        for label in labels {
            if !current.contains(label) {
                current.push(label.clone());
            }
        }
        Ok(())
    }

    fn update_issue_body(
        &self,
        _repo: &RepoSlug,
        _number: u64,
        body: &str,
    ) -> Result<(), GitHubError> {
        *self.issue_body.borrow_mut() = Some(body.to_owned());
        Ok(())
    }

    fn search_issue_count(&self, query: &str) -> Result<u64, GitHubError> {
        if self.fail_search {
            return Err(http_error(422, "search/issues", "Validation Failed"));
        }
        self.queries.borrow_mut().push(query.to_owned());
        Ok(self.search_counts.get(query).copied().unwrap_or(0))
    }
}

// ---------------------------------------------------------------------------
// CLI helpers
// ---------------------------------------------------------------------------

/// Write `yaml` to a config file inside `dir` and return its path.
pub fn write_config(dir: &Path, yaml: &str) -> PathBuf {
    let path = dir.join("labeler.yml");
    std::fs::write(&path, yaml).expect("failed to write config");
    path
}

/// Run the built binary with `args`, isolated from any Actions environment.
pub fn labeler(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_contrib-labeler"))
        .args(args)
        .env_remove("GITHUB_ACTIONS")
        .env_remove("GITHUB_REPOSITORY")
        .env_remove("GITHUB_EVENT_PATH")
        .env_remove("INPUT_GITHUB-TOKEN")
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run contrib-labeler")
}
