// Configuration utilities
// Author: Gabriel Demetrios Lafis

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{FrameError, FrameResult};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

/// How `fill_missing` treats a default whose kind differs from the column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillPolicy {
    /// Reject the fill when the default does not match the column kind
    Strict,
    /// Write the default anyway, leaving the column mixed-kind
    Permissive,
}

impl Default for FillPolicy {
    fn default() -> Self {
        FillPolicy::Strict
    }
}

/// What normalization does with a column whose min equals its max
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstantColumnPolicy {
    /// Every non-null cell becomes 0.0
    Zero,
    /// Fail with `FrameError::ConstantColumn`
    Fail,
}

impl Default for ConstantColumnPolicy {
    fn default() -> Self {
        ConstantColumnPolicy::Zero
    }
}

/// Engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub fill_policy: FillPolicy,
    pub constant_columns: ConstantColumnPolicy,
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub delimiter: char,
    pub quote: char,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            delimiter: ',',
            quote: '"',
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> FrameResult<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        match extension.as_deref() {
            Some("json") => Self::from_json_str(&contents),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents),
            _ => Err(FrameError::Config(format!(
                "unsupported config file format: {}",
                path.display()
            ))),
        }
    }

    /// Parse configuration from JSON text
    pub fn from_json_str(contents: &str) -> FrameResult<Self> {
        serde_json::from_str(contents).map_err(|e| FrameError::Config(e.to_string()))
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(contents: &str) -> FrameResult<Self> {
        serde_yaml::from_str(contents).map_err(|e| FrameError::Config(e.to_string()))
    }

    /// Get the log level filter
    pub fn log_level_filter(&self) -> log::LevelFilter {
        match self.logging.level.to_lowercase().as_str() {
            "off" => log::LevelFilter::Off,
            "error" => log::LevelFilter::Error,
            "warn" => log::LevelFilter::Warn,
            "info" => log::LevelFilter::Info,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            _ => log::LevelFilter::Info,
        }
    }
}
