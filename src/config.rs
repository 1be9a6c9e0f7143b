//! Labeler configuration (`labeler.yml`).
//!
//! ```yaml
//! dir: demo/contributions/**
//! issue: 12
//! proposal-label: proposal
//! categories:
//!   essay:
//!     glob: demo/contributions/essay/
//!     folder: +([a-zA-Z])?(-+([a-zA-Z]))
//!     suffix: "**"
//!     proposal: README.md
//! ```
//!
//! Parsing is strict: unknown keys, missing fields, duplicate categories and
//! patterns that fail to compile are all rejected at load time, so nothing
//! malformed reaches classification.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::glob::Glob;
use crate::model::Category;

/// Label applied to new submissions when `proposal-label` is not set.
pub const DEFAULT_PROPOSAL_LABEL: &str = "proposal";

/// Default location of the configuration inside the repository.
pub const DEFAULT_CONFIG_PATH: &str = ".github/labeler.yml";

// ---------------------------------------------------------------------------
// Raw (serde) shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    /// Every changed file must match this glob.
    dir: String,

    /// Issue whose body receives the statistics table.
    #[serde(default)]
    issue: Option<u64>,

    #[serde(default = "default_proposal_label", rename = "proposal-label")]
    proposal_label: String,

    categories: RawCategories,
}

fn default_proposal_label() -> String {
    DEFAULT_PROPOSAL_LABEL.to_owned()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCategory {
    glob: String,
    folder: String,
    suffix: String,
    proposal: String,
}

/// Categories in declaration order.
#[derive(Debug)]
struct RawCategories(Vec<(String, RawCategory)>);

impl<'de> Deserialize<'de> for RawCategories {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CategoriesVisitor;

        impl<'de> Visitor<'de> for CategoriesVisitor {
            type Value = RawCategories;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of category names to category rules")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, RawCategory)> = Vec::new();
                while let Some((name, rule)) = map.next_entry::<String, RawCategory>()? {
                    if entries.iter().any(|(existing, _)| *existing == name) {
                        return Err(de::Error::custom(format!("duplicate category `{name}`")));
                    }
                    entries.push((name, rule));
                }
                Ok(RawCategories(entries))
            }
        }

        deserializer.deserialize_map(CategoriesVisitor)
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Validated labeler configuration.
#[derive(Clone, Debug)]
pub struct Configuration {
    categories: Vec<Category>,
    scope: Glob,
    summary_issue: Option<u64>,
    proposal_label: String,
}

impl Configuration {
    /// Load configuration from a YAML file on disk.
    ///
    /// Unlike optional settings files, a missing labeler config is an error:
    /// there is nothing to classify against.
    ///
    /// # Errors
    /// Returns `ConfigError` on I/O errors, invalid YAML or failed validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError {
            path: Some(path.to_owned()),
            message: format!("could not read file: {e}"),
        })?;
        Self::parse(&contents).map_err(|e| e.with_path(path))
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    /// Returns `ConfigError` on invalid YAML, unknown or missing fields,
    /// duplicate categories, empty values or patterns that do not compile.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_yaml::from_str(yaml).map_err(|e| ConfigError {
            path: None,
            message: e.to_string(),
        })?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        if raw.dir.trim().is_empty() {
            return Err(ConfigError::invalid("`dir` must not be empty"));
        }
        let scope = Glob::new(&raw.dir)
            .map_err(|e| ConfigError::invalid(format!("`dir`: {e}")))?;

        if raw.categories.0.is_empty() {
            return Err(ConfigError::invalid("`categories` must define at least one category"));
        }
        if raw.proposal_label.trim().is_empty() {
            return Err(ConfigError::invalid("`proposal-label` must not be empty"));
        }

        let mut categories = Vec::with_capacity(raw.categories.0.len());
        for (name, rule) in raw.categories.0 {
            if name.trim().is_empty() {
                return Err(ConfigError::invalid("category names must not be empty"));
            }
            if name == raw.proposal_label {
                return Err(ConfigError::invalid(format!(
                    "category `{name}` has the same name as the proposal label"
                )));
            }
            for (field, value) in [
                ("folder", &rule.folder),
                ("suffix", &rule.suffix),
                ("proposal", &rule.proposal),
            ] {
                if value.trim().is_empty() {
                    return Err(ConfigError::invalid(format!(
                        "category `{name}`: `{field}` must not be empty"
                    )));
                }
            }
            let category = Category::new(&name, rule.glob, rule.folder, rule.suffix, rule.proposal)
                .map_err(|e| ConfigError::invalid(format!("category `{name}`: {e}")))?;
            categories.push(category);
        }

        Ok(Self {
            categories,
            scope,
            summary_issue: raw.issue,
            proposal_label: raw.proposal_label,
        })
    }

    /// Categories in declaration order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by name.
    #[must_use]
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name() == name)
    }

    /// The glob every changed file must match (`dir`).
    #[must_use]
    pub const fn scope(&self) -> &Glob {
        &self.scope
    }

    /// Issue that receives the statistics table (`issue`), if any.
    #[must_use]
    pub const fn summary_issue(&self) -> Option<u64> {
        self.summary_issue
    }

    /// Label added to pull requests that start a new submission.
    #[must_use]
    pub fn proposal_label(&self) -> &str {
        &self.proposal_label
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error loading a labeler configuration file.
#[derive(Debug)]
pub struct ConfigError {
    /// The path that was being loaded (if available).
    pub path: Option<PathBuf>,
    /// Human-readable message, with line and column for YAML errors.
    pub message: String,
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self {
            path: None,
            message: message.into(),
        }
    }

    /// Attach the path the configuration was read from.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(p) = &self.path {
            write!(f, "{}: {}", p.display(), self.message)
        } else {
            write!(f, "config error: {}", self.message)
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
