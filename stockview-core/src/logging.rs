//! Logging configuration and initialization.
//!
//! Library code only emits `tracing` events and spans; the binary installs
//! the subscriber once at startup through [`init_logging`].
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: standard tracing filter, takes precedence over `LogConfig::level`
//! - `LOG_FORMAT`: `pretty`, `compact` (default) or `json`, read by [`LogConfig::from_env`]

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line human-readable output
    Pretty,
    /// Single-line output
    #[default]
    Compact,
    /// JSON lines for log aggregation
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Compact,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Include the module path of each event.
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Compact,
            level: "warn".to_string(),
            include_target: false,
        }
    }
}

impl LogConfig {
    /// Apply `LOG_FORMAT` on top of this config.
    pub fn from_env(self) -> Self {
        match std::env::var("LOG_FORMAT") {
            Ok(s) => Self {
                format: LogFormat::parse(&s),
                ..self
            },
            Err(_) => self,
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }
}

#[derive(Debug, Error)]
#[error("failed to install log subscriber: {0}")]
pub struct LoggingError(String);

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| LoggingError(e.to_string()))?;

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(config.include_target)
        .with_writer(std::io::stderr);

    let installed = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| LoggingError(e.to_string()))
}
