//! One labeling run: fetch, decide, label.
//!
//! 1. List the pull request's changed files.
//! 2. Load the configuration (contents API or local checkout).
//! 3. [`decide`] on the files.
//! 4. Apply the category label and, for a new submission, the proposal label.
//! 5. Refresh the statistics table when the configuration names an issue.
//!
//! Steps 1–2 failing ends the run before classification. An out-of-scope
//! pull request ends the run successfully without labels; no matching category
//! ends it with [`LabelerError::NoCategoryMatch`].

use std::path::Path;

use labeler_github::GitHubApi;
use tracing::instrument;

use crate::action::{ActionInputs, ConfigSource};
use crate::classify::{Decision, decide};
use crate::config::{ConfigError, Configuration};
use crate::error::LabelerError;
use crate::labels;
use crate::model::ChangedFile;
use crate::stats;

/// Run the labeler for the pull request described by `inputs`.
///
/// # Errors
/// See [`LabelerError`]: missing inputs, an invalid configuration, no
/// matching category, or a failed label mutation.
#[instrument(
    skip_all,
    fields(repo = %inputs.repo, pr = inputs.pr_number, dry_run = inputs.dry_run)
)]
pub fn run(api: &dyn GitHubApi, inputs: &ActionInputs) -> Result<Decision, LabelerError> {
    let files = fetch_changed_files(api, inputs)?;

    tracing::info!("parsing configuration file...");
    let config = load_configuration(api, inputs)?;

    let decision = decide(&files, &config);
    match &decision {
        Decision::OutOfScope { paths } => {
            tracing::info!(count = paths.len(), "files outside config directory");
            for path in paths {
                tracing::info!("   {path}");
            }
        }
        Decision::NoMatch => {
            tracing::info!("no match found");
            return Err(LabelerError::NoCategoryMatch { files: files.len() });
        }
        Decision::Labeled {
            category,
            new_submission,
        } => {
            tracing::info!("matched with label {category}");
            apply_label(api, inputs, category)?;
            if *new_submission {
                tracing::info!("pr is a new proposal, adding label");
                apply_label(api, inputs, config.proposal_label())?;
            }
            refresh_statistics(api, inputs, &config);
        }
    }

    Ok(decision)
}

/// List the changed files and log each one.
///
/// # Errors
/// Returns [`LabelerError::InputUnavailable`] if the files cannot be listed.
pub fn fetch_changed_files(
    api: &dyn GitHubApi,
    inputs: &ActionInputs,
) -> Result<Vec<ChangedFile>, LabelerError> {
    let pulled = api
        .list_pull_files(&inputs.repo, inputs.pr_number)
        .map_err(|e| LabelerError::InputUnavailable {
            detail: format!("could not list the files of pull request #{}", inputs.pr_number),
            source: Some(e),
        })?;

    tracing::info!("changed files:");
    let mut files = Vec::with_capacity(pulled.len());
    for mut pulled_file in pulled {
        let previous = pulled_file.previous_filename.take();
        let file = ChangedFile::from(pulled_file);
        match previous {
            Some(previous) => tracing::info!("   {file} from {previous}"),
            None => tracing::info!("   {file}"),
        }
        files.push(file);
    }
    Ok(files)
}

/// Load and validate the configuration named by `inputs`.
///
/// # Errors
/// Returns [`LabelerError::ConfigInvalid`] if the file is missing,
/// unreadable or invalid.
pub fn load_configuration(
    api: &dyn GitHubApi,
    inputs: &ActionInputs,
) -> Result<Configuration, LabelerError> {
    let config = match inputs.config_source {
        ConfigSource::Workspace => Configuration::load(Path::new(&inputs.config_path))?,
        ConfigSource::Repository => {
            let text = api
                .fetch_file(&inputs.repo, &inputs.config_path, inputs.git_ref.as_deref())
                .map_err(|e| ConfigError {
                    path: Some(inputs.config_path.clone().into()),
                    message: if e.is_not_found() {
                        "file not found in the repository".to_owned()
                    } else {
                        format!("could not fetch file: {e}")
                    },
                })?;
            Configuration::parse(&text).map_err(|e| e.with_path(&inputs.config_path))?
        }
    };
    Ok(config)
}

fn apply_label(
    api: &dyn GitHubApi,
    inputs: &ActionInputs,
    label: &str,
) -> Result<(), LabelerError> {
    if inputs.dry_run {
        tracing::info!(label, "dry run: not adding label");
        return Ok(());
    }
    labels::ensure_label(api, &inputs.repo, inputs.pr_number, label).map_err(|source| {
        LabelerError::LabelMutationFailed {
            label: label.to_owned(),
            source,
        }
    })?;
    Ok(())
}

/// Statistics are informational: a failure here is logged, never fatal.
fn refresh_statistics(api: &dyn GitHubApi, inputs: &ActionInputs, config: &Configuration) {
    let Some(issue) = config.summary_issue() else {
        return;
    };
    if inputs.dry_run {
        tracing::info!(issue, "dry run: not publishing statistics");
        return;
    }
    if let Err(e) = stats::publish(api, &inputs.repo, issue, config.categories()) {
        tracing::warn!(issue, "could not refresh statistics: {e}");
    }
}
