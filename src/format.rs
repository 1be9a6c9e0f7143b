use anyhow::{Result, bail};
use serde::Serialize;
use std::str::FromStr;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text for people and workflow logs
    #[default]
    Text,
    /// JSON - machine-parseable
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => bail!("Invalid format '{}'. Use: text or json", s),
        }
    }
}

impl OutputFormat {
    /// Apply a `--json` shorthand flag on top of an explicit `--format`.
    pub const fn with_json_flag(format: Option<Self>, json: bool) -> Option<Self> {
        if json { Some(Self::Json) } else { format }
    }

    /// Resolve an optional format, defaulting to text.
    pub fn resolve(format: Option<Self>) -> Self {
        format.unwrap_or_default()
    }

    /// Serialize data to the requested format
    pub fn serialize<T: Serialize>(self, data: &T) -> Result<String> {
        match self {
            Self::Json => serde_json::to_string_pretty(data)
                .map_err(|e| anyhow::anyhow!("JSON serialization failed: {}", e)),
            Self::Text => {
                // Text output is written by each command directly
                bail!("Text format should not use serialize()")
            }
        }
    }
}
