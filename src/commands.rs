use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use labeler::action::{self, ActionInputs, ConfigSource};
use labeler::classify::{Decision, decide};
use labeler::config::{Configuration, DEFAULT_CONFIG_PATH};
use labeler::error::LabelerError;
use labeler::github::{DEFAULT_API_URL, RestClient};
use labeler::model::ChangedFile;
use labeler::{pipeline, stats};

use crate::format::OutputFormat;

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

/// Label the pull request that triggered the workflow
///
/// Reads the changed files of the pull request, classifies them against the
/// configuration, and adds the category label (plus the proposal label for a
/// new submission). Every input falls back to the variable GitHub Actions
/// sets for it.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Token used to read the pull request and write labels
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Path of the labeler configuration, relative to the repository root
    #[arg(long, env = "INPUT_CONFIGURATION-PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub configuration_path: String,

    /// Read the configuration from the local checkout instead of the API
    #[arg(long)]
    pub local_config: bool,

    /// Repository as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Event payload that carries the pull request number
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// Commit to read the configuration at
    #[arg(long, env = "GITHUB_SHA")]
    pub sha: Option<String>,

    /// REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Pull request number (overrides the event payload)
    #[arg(long)]
    pub pr: Option<u64>,

    /// Decide and log, but change nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Output format for the decision: text or json
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Shorthand for --format json
    #[arg(long, hide = true, conflicts_with = "format")]
    pub json: bool,
}

pub fn run(args: &RunArgs, github_actions: bool) -> Result<()> {
    tracing::info!("fetching inputs...");
    let token = args
        .github_token
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| {
            LabelerError::input("no GitHub token given (input github-token is empty)")
        })?;
    let repo = action::parse_repository(args.repository.as_deref())?;
    let pr_number = action::resolve_pr_number(args.pr, args.event_path.as_deref())?;

    let inputs = ActionInputs {
        repo,
        pr_number,
        config_path: args.configuration_path.clone(),
        config_source: if args.local_config {
            ConfigSource::Workspace
        } else {
            ConfigSource::Repository
        },
        git_ref: args.sha.clone().filter(|s| !s.is_empty()),
        dry_run: args.dry_run,
    };

    let client =
        RestClient::new(&args.api_url, token).map_err(|e| LabelerError::InputUnavailable {
            detail: "could not build the GitHub client".to_owned(),
            source: Some(e),
        })?;
    tracing::debug!(api_url = client.base_url(), repo = %inputs.repo, "client ready");

    let decision = pipeline::run(&client, &inputs)?;

    if let Decision::OutOfScope { paths } = &decision
        && github_actions
    {
        println!(
            "{}",
            action::notice_annotation(&format!(
                "{} file(s) are outside the contributions directory; no label added",
                paths.len()
            ))
        );
    }

    let format = OutputFormat::with_json_flag(args.format, args.json);
    if let Some(OutputFormat::Json) = format {
        println!("{}", OutputFormat::Json.serialize(&decision)?);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// classify
// ---------------------------------------------------------------------------

/// Classify a set of changed files offline
///
/// Each file is given as STATUS:PATH (e.g. `added:contributions/essay/ana/README.md`)
/// or as a bare path, which counts as modified. Exits non-zero when no
/// category matches.
///
/// Examples:
///   contrib-labeler classify added:contributions/essay/ana/README.md
///   contrib-labeler classify --config labeler.yml --json contributions/demo/bo/app.js
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Local configuration file
    #[arg(long, short = 'c', default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Changed files as STATUS:PATH or PATH
    #[arg(required = true)]
    pub files: Vec<ChangedFile>,

    /// Output format: text or json
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Shorthand for --format json
    #[arg(long, hide = true, conflicts_with = "format")]
    pub json: bool,
}

pub fn classify(args: &ClassifyArgs) -> Result<()> {
    let config = Configuration::load(&args.config).map_err(LabelerError::from)?;
    let decision = decide(&args.files, &config);

    let format = OutputFormat::resolve(OutputFormat::with_json_flag(args.format, args.json));
    if format == OutputFormat::Json {
        println!("{}", format.serialize(&decision)?);
    } else {
        match &decision {
            Decision::OutOfScope { paths } => {
                println!("out of scope: {} file(s) outside {}", paths.len(), config.scope());
                for path in paths {
                    println!("  {path}");
                }
            }
            Decision::NoMatch => println!("no match"),
            Decision::Labeled {
                category,
                new_submission,
            } => {
                println!("category: {category}");
                if *new_submission {
                    println!("new submission: {}", config.proposal_label());
                }
            }
        }
    }

    if decision == Decision::NoMatch {
        return Err(LabelerError::NoCategoryMatch {
            files: args.files.len(),
        }
        .into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// check-config
// ---------------------------------------------------------------------------

/// Validate a configuration file and list its categories
#[derive(Args, Debug)]
pub struct CheckConfigArgs {
    /// Configuration file to check
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    pub path: PathBuf,

    /// Output format: text or json
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Shorthand for --format json
    #[arg(long, hide = true, conflicts_with = "format")]
    pub json: bool,
}

#[derive(Serialize)]
struct ConfigReport<'a> {
    path: String,
    scope: &'a str,
    proposal_label: &'a str,
    issue: Option<u64>,
    categories: Vec<CategoryReport<'a>>,
}

#[derive(Serialize)]
struct CategoryReport<'a> {
    name: &'a str,
    glob: &'a str,
    folder: &'a str,
    suffix: &'a str,
    proposal: &'a str,
    pattern: &'a str,
    marker: &'a str,
}

pub fn check_config(args: &CheckConfigArgs) -> Result<()> {
    let config = Configuration::load(&args.path).map_err(LabelerError::from)?;

    let report = ConfigReport {
        path: args.path.display().to_string(),
        scope: config.scope().as_str(),
        proposal_label: config.proposal_label(),
        issue: config.summary_issue(),
        categories: config
            .categories()
            .iter()
            .map(|c| CategoryReport {
                name: c.name(),
                glob: c.prefix(),
                folder: c.folder(),
                suffix: c.suffix(),
                proposal: c.marker(),
                pattern: c.file_pattern().as_str(),
                marker: c.marker_pattern().as_str(),
            })
            .collect(),
    };

    let format = OutputFormat::resolve(OutputFormat::with_json_flag(args.format, args.json));
    if format == OutputFormat::Json {
        println!("{}", format.serialize(&report)?);
        return Ok(());
    }

    println!("{}: ok", report.path);
    println!("  dir: {}", report.scope);
    println!("  proposal label: {}", report.proposal_label);
    if let Some(issue) = report.issue {
        println!("  statistics issue: #{issue}");
    }
    println!("  categories ({}):", report.categories.len());
    for category in &report.categories {
        println!("    {:<16} {}", category.name, category.pattern);
        println!(
            "      glob: {}  folder: {}  suffix: {}  proposal: {}",
            category.glob, category.folder, category.suffix, category.proposal
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// stats
// ---------------------------------------------------------------------------

/// Publish the per-category pull request statistics table
///
/// Counts open, merged and closed-unmerged pull requests for every category
/// label and replaces the body of the configured issue with the table.
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Token used for the search API and to edit the issue
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Local configuration file
    #[arg(long, short = 'c', default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Repository as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Issue to publish to (overrides `issue` in the configuration)
    #[arg(long)]
    pub issue: Option<u64>,

    /// Print the table instead of publishing it
    #[arg(long)]
    pub dry_run: bool,
}

pub fn stats(args: &StatsArgs) -> Result<()> {
    let config = Configuration::load(&args.config).map_err(LabelerError::from)?;
    let repo = action::parse_repository(args.repository.as_deref())?;
    let token = args
        .github_token
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .context("no GitHub token given (set INPUT_GITHUB-TOKEN or pass --github-token)")?;
    let client =
        RestClient::new(&args.api_url, token).context("could not build the GitHub client")?;
    tracing::debug!(api_url = client.base_url(), %repo, "client ready");

    let issue = args.issue.or_else(|| config.summary_issue());
    match issue {
        Some(issue) if !args.dry_run => {
            stats::publish(&client, &repo, issue, config.categories())
                .with_context(|| format!("could not publish statistics to issue #{issue}"))?;
            println!("published statistics to {repo}#{issue}");
        }
        _ => {
            if issue.is_none() && !args.dry_run {
                tracing::warn!("no issue configured; printing the table instead");
            }
            let counts = stats::collect(&client, &repo, config.categories())
                .context("could not collect statistics")?;
            print!("{}", stats::render_table(&counts));
        }
    }
    Ok(())
}

