//! Configuration file handling

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::paths::config_path;
use super::{Error, Result};
use crate::reporter::ReporterKind;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct Config {
    /// Default settings
    #[serde(default)]
    pub defaults: Defaults,

    /// Reporter settings
    #[serde(default)]
    pub reporter: ReporterConfig,

    /// Output formatting
    #[serde(default)]
    pub output: OutputConfig,
}

/// Default settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct Defaults {
    /// Reporter used when `--reporter` is not given
    #[serde(default)]
    pub reporter: ReporterKind,
}

/// Reporter settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReporterConfig {
    /// Colour the spec reporter's output
    #[serde(default = "default_colors")]
    pub colors: bool,

    /// Tests slower than this are flagged by the spec reporter
    #[serde(default = "default_slow_ms")]
    pub slow_ms: u64,

    /// Emit the stats block from the JSON reporter
    #[serde(default = "default_include_stats")]
    pub include_stats: bool,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            colors: default_colors(),
            slow_ms: default_slow_ms(),
            include_stats: default_include_stats(),
        }
    }
}

fn default_colors() -> bool {
    true
}
fn default_slow_ms() -> u64 {
    75
}
fn default_include_stats() -> bool {
    true
}

/// Output formatting
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Pretty-print JSON output
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

fn default_pretty() -> bool {
    true
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit path, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Load from `path` when given, else from the default location
    pub fn resolve(path: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        match path {
            Some(path) => Ok((Self::load_from(path)?, Some(path.to_path_buf()))),
            None => Ok((Self::load()?, config_path())),
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}
