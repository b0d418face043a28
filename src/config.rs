//! Configuration handling for shapefinder

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use shapefinder_core::error::ShapeError;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "shapefinder.toml";

/// Shapefinder configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Analysis selection
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Report output
    #[serde(default)]
    pub report: ReportConfig,

    /// Logging
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Analysis to run when `--analysis` is not given
    #[serde(default = "default_analysis")]
    pub default: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub format: ReportFormat,

    /// Include non-function scopes in usage reports
    #[serde(default)]
    pub all_scopes: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub level: LogLevel,
}

fn default_analysis() -> String {
    "TypeFinder".to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default: default_analysis(),
        }
    }
}

/// Report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON envelope.
    Json,
}

/// Log level for tracing output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ShapeError> {
        let content = fs::read_to_string(path).map_err(|e| ShapeError::ConfigError {
            path: path.display().to_string(),
            message: format!("failed to read config file: {}", e),
        })?;
        Self::parse(&content, path)
    }

    /// Parse configuration text; `path` is only used in error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ShapeError> {
        toml::from_str(content).map_err(|e| ShapeError::ConfigError {
            path: path.display().to_string(),
            message: format!("failed to parse config file: {}", e),
        })
    }

    /// Load `explicit` if given, else `shapefinder.toml` in `dir` if present,
    /// else the defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ShapeError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "using config file");
            Self::load(&candidate)
        } else {
            Ok(Config::default())
        }
    }
}
