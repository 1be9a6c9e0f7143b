//! Per-category pull request statistics, published as a Markdown table in a
//! designated issue.
//!
//! Counts come from the search API: for every category label, how many pull
//! requests are open, merged, and closed without merging. Classification
//! never depends on any of this.

use std::fmt::Write as _;

use labeler_github::{GitHubApi, GitHubError, RepoSlug};
use serde::Serialize;
use tracing::instrument;

use crate::model::Category;

/// First line of a published table; marks the issue body as generated.
pub const TABLE_MARKER: &str = "<!-- contrib-labeler:stats -->";

/// Pull request counts for one category label.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub category: String,
    pub open: u64,
    pub merged: u64,
    /// Closed without merging.
    pub closed: u64,
}

impl CategoryStats {
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.open + self.merged + self.closed
    }
}

/// Search query for pull requests in `repo` labeled `label`, narrowed by
/// `state` qualifiers (e.g. `is:open`).
#[must_use]
pub fn search_query(repo: &RepoSlug, label: &str, state: &str) -> String {
    let label = if label.contains(char::is_whitespace) {
        format!("\"{label}\"")
    } else {
        label.to_owned()
    };
    format!("repo:{repo} is:pr label:{label} {state}")
}

/// Query the counts for every category, in declaration order.
///
/// # Errors
/// Returns the first [`GitHubError`] from the search API.
#[instrument(skip(api, categories), fields(categories = categories.len()))]
pub fn collect(
    api: &dyn GitHubApi,
    repo: &RepoSlug,
    categories: &[Category],
) -> Result<Vec<CategoryStats>, GitHubError> {
    categories
        .iter()
        .map(|category| {
            let name = category.name();
            let count = |state: &str| api.search_issue_count(&search_query(repo, name, state));
            let stats = CategoryStats {
                category: name.to_owned(),
                open: count("is:open")?,
                merged: count("is:merged")?,
                closed: count("is:closed is:unmerged")?,
            };
            tracing::debug!(?stats, "category counted");
            Ok(stats)
        })
        .collect()
}

/// Render the statistics as a Markdown table with a totals row.
#[must_use]
pub fn render_table(stats: &[CategoryStats]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{TABLE_MARKER}");
    let _ = writeln!(out, "| Category | Open | Merged | Closed | Total |");
    let _ = writeln!(out, "|----------|-----:|-------:|-------:|------:|");

    let mut sum = CategoryStats::default();
    for row in stats {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} |",
            row.category,
            row.open,
            row.merged,
            row.closed,
            row.total()
        );
        sum.open += row.open;
        sum.merged += row.merged;
        sum.closed += row.closed;
    }
    let _ = writeln!(
        out,
        "| **Total** | {} | {} | {} | {} |",
        sum.open,
        sum.merged,
        sum.closed,
        sum.total()
    );
    out
}

/// Collect the counts and replace the body of `issue` with the table.
///
/// Returns the rendered table.
///
/// # Errors
/// Returns [`GitHubError`] if a search or the issue update fails.
#[instrument(skip(api, categories))]
pub fn publish(
    api: &dyn GitHubApi,
    repo: &RepoSlug,
    issue: u64,
    categories: &[Category],
) -> Result<String, GitHubError> {
    let stats = collect(api, repo, categories)?;
    let table = render_table(&stats);
    api.update_issue_body(repo, issue, &table)?;
    tracing::info!(issue, "statistics table published");
    Ok(table)
}
