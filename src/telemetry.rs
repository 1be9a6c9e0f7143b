//! Logging initialization.
//!
//! Events go to stderr so stdout stays clean for command output. The filter
//! comes from `RUST_LOG` and defaults to `info`:
//! - `text` → compact human-readable lines, the form workflow logs show
//! - `json` → one JSON object per event, with span close events

use std::str::FromStr;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

/// Log line format selected with `--log-format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => anyhow::bail!("Invalid log format '{s}'. Use: text or json"),
        }
    }
}

/// Install the global subscriber. Call once, before any command runs.
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // try_init: a second call (e.g. from tests) keeps the first subscriber.
    let _ = match format {
        LogFormat::Text => builder
            .with_target(false)
            .without_time()
            .compact()
            .try_init(),
        LogFormat::Json => builder.json().with_span_events(FmtSpan::CLOSE).try_init(),
    };
}
