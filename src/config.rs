//! Configuration for linegauge.
//!
//! Settings come from three layers, highest precedence first: command-line
//! flags, a config file (JSON or YAML), and built-in defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::scan::ExclusionRules;

/// Default maximum effective lines per file.
pub const DEFAULT_FILE_THRESHOLD: usize = 500;

/// Default maximum effective lines per function.
pub const DEFAULT_FUNCTION_THRESHOLD: usize = 50;

/// Config file names looked up in the scan root when `--config` is absent.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["linegauge.json", "linegauge.yaml", ".linegauge.yaml"];

/// Configuration errors. All of them are fatal and raised before any file
/// is analyzed.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got {value}")]
    NonPositiveThreshold { name: &'static str, value: i64 },
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid excluded_paths pattern {pattern:?}: {message}")]
    InvalidGlob { pattern: String, message: String },
    #[error("cannot access path {path}: {source}")]
    InaccessibleRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Thresholds the analysis core depends on. Immutable for one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub file_threshold: usize,
    pub function_threshold: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            file_threshold: DEFAULT_FILE_THRESHOLD,
            function_threshold: DEFAULT_FUNCTION_THRESHOLD,
        }
    }
}

impl AnalysisConfig {
    /// Build a config, rejecting non-positive thresholds.
    pub fn new(file_threshold: i64, function_threshold: i64) -> Result<Self, ConfigError> {
        Ok(Self {
            file_threshold: positive("file_threshold", file_threshold)?,
            function_threshold: positive("function_threshold", function_threshold)?,
        })
    }
}

fn positive(name: &'static str, value: i64) -> Result<usize, ConfigError> {
    if value <= 0 {
        return Err(ConfigError::NonPositiveThreshold { name, value });
    }
    usize::try_from(value).map_err(|_| ConfigError::NonPositiveThreshold { name, value })
}

/// Serialization format of a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(ConfigFormat::Json),
            Some("yaml") | Some("yml") => Some(ConfigFormat::Yaml),
            _ => None,
        }
    }
}

/// User-facing settings. Every field is optional so layers can be merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub file_threshold: Option<i64>,
    pub function_threshold: Option<i64>,
    /// Directory names excluded anywhere in a path. Replaces the defaults.
    pub exclude_dirs: Option<Vec<String>>,
    /// Regular expressions searched in the relative path. Replaces the defaults.
    pub exclude_patterns: Option<Vec<String>>,
    /// Glob patterns matched against the relative path (e.g., "**/migrations/**").
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excluded_paths: Vec<String>,
}

impl Settings {
    /// Parse settings from a config file, picking the format by extension.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed = match ConfigFormat::from_path(path) {
            Some(format) => Self::parse_str(&content, format),
            None => Self::parse_str(&content, ConfigFormat::Json)
                .or_else(|_| Self::parse_str(&content, ConfigFormat::Yaml)),
        };

        parsed.map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse settings from a string in the given format.
    pub fn parse_str(content: &str, format: ConfigFormat) -> Result<Self, String> {
        match format {
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Yaml => {
                if content.trim().is_empty() {
                    return Ok(Self::default());
                }
                serde_yaml::from_str(content).map_err(|e| e.to_string())
            }
        }
    }

    /// Discover a config file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Overlay `overrides` on top of `self`. Fields set in `overrides` win.
    pub fn merge(self, overrides: Settings) -> Settings {
        let mut excluded_paths = self.excluded_paths;
        excluded_paths.extend(overrides.excluded_paths);

        Settings {
            file_threshold: overrides.file_threshold.or(self.file_threshold),
            function_threshold: overrides.function_threshold.or(self.function_threshold),
            exclude_dirs: overrides.exclude_dirs.or(self.exclude_dirs),
            exclude_patterns: overrides.exclude_patterns.or(self.exclude_patterns),
            excluded_paths,
        }
    }

    /// Resolve thresholds, applying defaults and validation.
    pub fn analysis_config(&self) -> Result<AnalysisConfig, ConfigError> {
        AnalysisConfig::new(
            self.file_threshold.unwrap_or(DEFAULT_FILE_THRESHOLD as i64),
            self.function_threshold
                .unwrap_or(DEFAULT_FUNCTION_THRESHOLD as i64),
        )
    }

    /// Build exclusion rules, applying defaults where lists are unset.
    pub fn exclusion_rules(&self) -> Result<ExclusionRules, ConfigError> {
        ExclusionRules::new(
            self.exclude_dirs.as_deref(),
            self.exclude_patterns.as_deref(),
            &self.excluded_paths,
        )
    }
}
