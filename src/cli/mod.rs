//! # CLI Module
//!
//! This module defines the command-line interface for repofmt using `clap`.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `check` | Evaluate the configured rules against repositories |
//! | `validate` | Check the configuration without touching any repository |
//! | `init` | Write a starter configuration file |
//!
//! ## Submodules
//!
//! - [`commands`] - Command implementations
//! - [`exit_codes`] - Standardized exit codes
//! - [`output`] - Report output formatters (JSON, Terminal)
//!
//! ## Global Options
//!
//! All commands support these global options:
//!
//! - `-v, --verbose` - Increase verbosity level (use multiple times: -v, -vv, -vvv)
//! - `-c, --config <FILE>` - Path to configuration file
//! - `-C, --directory <DIR>` - Working directory (defaults to current directory)
//!
//! ## Examples
//!
//! ```bash
//! # Write a starter configuration
//! repofmt init --preset python
//!
//! # Check every repository of the authenticated account
//! repofmt check
//!
//! # Check two repositories and write a JSON report
//! repofmt check --repo octo/api --repo octo/web --format json -o report.json
//!
//! # Check the checkout in the current directory
//! repofmt check --local .
//! ```

pub mod commands;
pub mod exit_codes;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{CheckArgs, CommandContext, InitArgs, ValidateArgs};

/// repofmt - Evaluate declarative compliance rules against repositories
#[derive(Parser, Debug)]
#[command(name = "repofmt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Working directory (defaults to current directory)
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Options shared by every command
    pub fn context(&self) -> CommandContext {
        let directory = self
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let mut context = CommandContext {
            config: None,
            directory,
        };
        context.config = self.config.as_deref().map(|path| context.resolve(path));
        context
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate the configured rules against repositories
    Check(CheckArgs),

    /// Validate the configuration file
    Validate(ValidateArgs),

    /// Initialize a new configuration file
    Init(InitArgs),
}
