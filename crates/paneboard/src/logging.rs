//! Subscriber installation for binaries and examples.
//!
//! The libraries only emit `tracing` events; installing a subscriber is the
//! application's choice. [`init_logging`] is the one the bundled CLI uses.

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

/// Environment variable read before `RUST_LOG`.
pub const LOG_ENV: &str = "PANEBOARD_LOG";

/// Filter used when neither an explicit filter nor the environment sets one.
pub const DEFAULT_FILTER: &str = "info";

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single-line records.
    #[default]
    Text,
    /// One JSON object per record.
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(LoggingError::UnknownFormat(s.to_owned())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("unknown log format: {0}")]
    UnknownFormat(String),

    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled,
}

/// Build the filter: `explicit`, else `PANEBOARD_LOG`, else `RUST_LOG`,
/// else [`DEFAULT_FILTER`].
pub fn resolve_filter(explicit: Option<&str>) -> Result<EnvFilter, LoggingError> {
    let directives = explicit
        .map(str::to_owned)
        .or_else(|| std::env::var(LOG_ENV).ok())
        .or_else(|| std::env::var(EnvFilter::DEFAULT_ENV).ok())
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_owned());
    Ok(EnvFilter::try_new(directives)?)
}

/// Install a global `fmt` subscriber writing to stderr.
pub fn init_logging(format: LogFormat, filter: Option<&str>) -> Result<(), LoggingError> {
    let filter = resolve_filter(filter)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|_| LoggingError::AlreadyInstalled)
}
