//! Structured logging for the `wildlife` binary
//!
//! Diagnostics go through `tracing` to stderr (or a log file), keeping stdout
//! for the analysis summary. The `RUST_LOG` environment variable overrides the
//! configured level, e.g. `RUST_LOG=wildlife_analysis=debug`.

use std::{fs::OpenOptions, io, path::PathBuf, sync::Mutex};

use serde::{Deserialize, Serialize};
use tracing_subscriber::{
    EnvFilter,
    filter::ParseError,
    fmt::{self, writer::BoxMakeWriter},
    prelude::*,
    util::TryInitError,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// One event per line with target and fields
    #[default]
    Full,
    /// Shorter lines for interactive use
    Compact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive (`trace`, `debug`, `info`, `warn`, `error`, or a full
    /// `EnvFilter` directive)
    pub level: String,
    pub format: LogFormat,
    /// Append logs to this file instead of stderr
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::default(),
            file: None,
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LogError {
    #[display("invalid log filter '{directive}': {source}")]
    InvalidFilter { directive: String, source: ParseError },
    #[display("failed to open log file {}: {source}", path.display())]
    FileOpen { path: PathBuf, source: io::Error },
    #[display("failed to set global subscriber: {source}")]
    SetSubscriber { source: TryInitError },
}

fn env_filter(config: &LogConfig) -> Result<EnvFilter, LogError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|source| LogError::InvalidFilter {
        directive: config.level.clone(),
        source,
    })
}

/// Installs the global subscriber. Call once at startup.
pub fn init(config: &LogConfig) -> Result<(), LogError> {
    let filter = env_filter(config)?;

    let writer = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LogError::FileOpen {
                    path: path.clone(),
                    source,
                })?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(io::stderr),
    };
    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_ansi(config.file.is_none());

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Full => registry.with(layer).try_init(),
        LogFormat::Compact => registry.with(layer.compact()).try_init(),
    }
    .map_err(|source| LogError::SetSubscriber { source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let config: LogConfig = serde_json::from_str(r#"{"format":"compact"}"#).unwrap();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Compact);
        assert_eq!(config.file, None);
    }
}
