//! CLI commands module

pub mod check;
pub mod init;
pub mod validate;

use clap::Args;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::RepoFmtError;

/// Global options resolved for a command
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Explicit configuration file, already joined to `directory`
    pub config: Option<PathBuf>,
    /// Working directory
    pub directory: PathBuf,
}

impl CommandContext {
    /// Load the explicit configuration file, or the one discovered in the working directory
    pub fn load_config(&self) -> Result<Config, RepoFmtError> {
        Config::load(self.config.as_deref(), &self.directory)
    }

    /// Resolve a user supplied path against the working directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.directory.join(path)
        }
    }
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Repository to check as owner/name (repeatable, defaults to every accessible repository)
    #[arg(short, long, value_name = "OWNER/NAME", conflicts_with = "local")]
    pub repo: Vec<String>,

    /// Check a local checkout instead of the hosting platform
    #[arg(long, value_name = "DIR")]
    pub local: Option<PathBuf>,

    /// Output format (terminal, json)
    #[arg(short, long, default_value = "terminal")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Only run the named rules
    #[arg(long, value_delimiter = ',')]
    pub only: Option<Vec<String>>,

    /// Skip the named rules
    #[arg(long, value_delimiter = ',')]
    pub skip: Option<Vec<String>>,

    /// Repositories evaluated at the same time (overrides the configuration)
    #[arg(short = 'j', long, value_name = "N")]
    pub concurrency: Option<usize>,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// List the available rules instead of validating a configuration
    #[arg(long)]
    pub list_rules: bool,
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Preset to use (minimal, opensource, python)
    #[arg(short, long, value_name = "PRESET")]
    pub preset: Option<String>,

    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,
}

/// Output format for the check command
#[derive(Debug, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}
