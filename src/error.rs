//! Error types for repofmt
//!
//! This module defines custom error types using `thiserror` for better error handling
//! and more descriptive error messages throughout the application.

use thiserror::Error;

/// Main error type for repofmt
#[derive(Error, Debug)]
pub enum RepoFmtError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Content provider errors
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A rule could not be executed against a repository because its
    /// configuration is invalid. Aborts evaluation of that repository.
    #[error("Rule '{rule}' failed for {repository}: {source}")]
    Rule {
        /// Full name of the repository being evaluated
        repository: String,
        /// Name of the offending rule
        rule: String,
        /// The underlying configuration error
        source: ConfigError,
    },

    /// Report output errors
    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        /// Path to the configuration file
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// No configuration file was found
    #[error("No config file found. Create one of: {searched}")]
    NotFound {
        /// Comma separated list of the file names that were looked up
        searched: String,
    },

    /// The configuration file could not be parsed
    #[error("Failed to parse config file '{path}': {message}")]
    Parse {
        /// Path to the configuration file
        path: String,
        /// Parser message
        message: String,
    },

    /// The configuration file extension is not supported
    #[error("Unsupported config format for '{path}' (expected .toml, .json, .yaml or .yml)")]
    UnsupportedFormat {
        /// Path to the configuration file
        path: String,
    },

    /// A rule name is not part of the registry
    #[error("Rule {name} not found")]
    UnknownRule {
        /// The unknown rule name
        name: String,
    },

    /// Rule options do not satisfy the rule's schema
    #[error("Invalid rule options for '{rule}': {message}")]
    InvalidOptions {
        /// Rule name
        rule: String,
        /// Validation message
        message: String,
    },

    /// An exception or option pattern failed to compile
    #[error("Invalid regex pattern '{pattern}' for '{rule}': {message}")]
    InvalidPattern {
        /// Rule name
        rule: String,
        /// The pattern that failed to compile
        pattern: String,
        /// Compiler message
        message: String,
    },
}

/// Errors returned by content providers.
///
/// Messages leave out the path; callers report them as `<path>: <error>`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The requested path does not exist in the repository
    #[error("not found")]
    NotFound {
        /// Requested path
        path: String,
    },

    /// A directory listing was requested for a file
    #[error("not a directory")]
    NotADirectory {
        /// Requested path
        path: String,
    },

    /// File content was requested for a directory
    #[error("not a file")]
    NotAFile {
        /// Requested path
        path: String,
    },

    /// File content could not be decoded to text
    #[error("failed to decode content: {message}")]
    Decode {
        /// Requested path
        path: String,
        /// Decoder message
        message: String,
    },

    /// The remote API returned an error
    #[error("API request failed: {message}")]
    Api {
        /// Message reported by the API client
        message: String,
    },

    /// No credentials could be found
    #[error("Not authenticated. Set GITHUB_TOKEN or run 'gh auth login'")]
    NotAuthenticated,

    /// Local I/O error while reading a checkout
    #[error("{message}")]
    Io {
        /// Requested path
        path: String,
        /// I/O error message
        message: String,
    },
}

/// Errors raised while rendering or writing reports
#[derive(Error, Debug)]
pub enum OutputError {
    /// Failed to serialize the report
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Failed to write the report file
    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        /// Output path
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },
}

impl RepoFmtError {
    /// Whether the error comes from invalid configuration rather than a runtime failure
    pub fn is_configuration(&self) -> bool {
        matches!(self, RepoFmtError::Config(_) | RepoFmtError::Rule { .. })
    }
}
