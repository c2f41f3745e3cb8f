//! Configuration loader

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, RepoFmtError};
use crate::rules::schema::{self, ValidatedRule};

use super::presets::Preset;
use super::RuleConfig;

/// File names looked up, in order, when no config path is given
pub const CONFIG_FILENAMES: [&str; 5] = [
    "repofmt.toml",
    "repofmt.json",
    "repofmt.yaml",
    "repofmt.yml",
    ".repofmt.toml",
];

/// File written by `init`
pub const DEFAULT_CONFIG_FILENAME: &str = "repofmt.toml";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Repositories evaluated at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Rules, in evaluation order
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

fn default_concurrency() -> usize {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            rules: Vec::new(),
        }
    }
}

/// Supported configuration formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
    Yaml,
}

impl Format {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

impl Config {
    /// Find the configuration file in `dir`
    pub fn discover(dir: &Path) -> Result<PathBuf, ConfigError> {
        CONFIG_FILENAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| ConfigError::NotFound {
                searched: CONFIG_FILENAMES.join(", "),
            })
    }

    /// Load the explicit file if given, otherwise the one discovered in `dir`
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self, RepoFmtError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => Self::discover(dir)?,
        };
        Self::load_from_file(&path)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, RepoFmtError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        let format = Format::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
            path: path.display().to_string(),
        })?;

        tracing::debug!(path = %path.display(), ?format, "Loading configuration");
        Self::parse(&content, format).map_err(|message| {
            RepoFmtError::Config(ConfigError::Parse {
                path: path.display().to_string(),
                message,
            })
        })
    }

    fn parse(content: &str, format: Format) -> Result<Self, String> {
        match format {
            Format::Toml => toml::from_str(content).map_err(|e| e.message().to_string()),
            Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Format::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }

    /// Create a new configuration from a preset
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            rules: preset.rules(),
            ..Default::default()
        }
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: DEFAULT_CONFIG_FILENAME.to_string(),
            message: e.to_string(),
        })
    }

    /// Validate every rule, stopping at the first invalid one
    pub fn validate(&self) -> Result<Vec<ValidatedRule>, ConfigError> {
        self.rules.iter().map(schema::validate).collect()
    }
}
