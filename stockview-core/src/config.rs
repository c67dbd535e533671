//! Application configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration pointed at the public Yahoo Finance endpoints.

use crate::domain::Period;
use crate::logging::LogConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Environment variable naming a config file to load when none is given explicitly.
pub const CONFIG_ENV: &str = "STOCKVIEW_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub display: DisplayConfig,
    pub logging: LogConfig,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load `path` if given, else the file named by `STOCKVIEW_CONFIG`, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => match std::env::var_os(CONFIG_ENV) {
                Some(p) => Self::from_file(Path::new(&p)),
                None => Ok(Self::default()),
            },
        }
    }
}

/// Endpoints and HTTP client settings for the Yahoo provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub chart_base_url: String,
    pub summary_base_url: String,
    pub cookie_url: String,
    pub crumb_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            chart_base_url: "https://query2.finance.yahoo.com/v8/finance/chart".into(),
            summary_base_url: "https://query2.finance.yahoo.com/v10/finance/quoteSummary".into(),
            cookie_url: "https://fc.yahoo.com".into(),
            crumb_url: "https://query2.finance.yahoo.com/v1/test/getcrumb".into(),
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub default_period: Period,
    pub table_window: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_period: Period::OneYear,
            table_window: crate::transform::TABLE_WINDOW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogFormat;

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.display.table_window, 30);
        assert_eq!(cfg.display.default_period, Period::OneYear);
        assert_eq!(cfg.provider.timeout_secs, 30);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
[provider]
chart_base_url = "http://127.0.0.1:8080/chart"
timeout_secs = 5

[display]
default_period = "6mo"

[logging]
format = "json"
level = "debug"
"#,
        )
        .unwrap();
        assert_eq!(cfg.provider.chart_base_url, "http://127.0.0.1:8080/chart");
        assert_eq!(cfg.provider.timeout_secs, 5);
        assert_eq!(cfg.provider.cookie_url, ProviderConfig::default().cookie_url);
        assert_eq!(cfg.display.default_period, Period::SixMonths);
        assert_eq!(cfg.display.table_window, 30);
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn unknown_period_is_a_parse_error() {
        let err = AppConfig::from_toml("[display]\ndefault_period = \"2w\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let cfg = AppConfig::default();
        let text = cfg.to_toml().unwrap();
        assert_eq!(AppConfig::from_toml(&text).unwrap(), cfg);
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = AppConfig::from_file(Path::new("/nonexistent/stockview.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
