//! Rules module - Rule registry, option schemas and evaluation engine

pub mod categories;
pub mod engine;
pub mod keys;
pub mod matcher;
pub mod registry;
pub mod results;
pub mod schema;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use registry::Rule;
pub use results::{Level, RepositoryResult, RuleOutcome, Violation};
pub use schema::ValidatedRule;

/// Names of every rule in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    #[serde(rename = "file-exists")]
    FileExists,
    #[serde(rename = "file-forbidden")]
    FileForbidden,
    #[serde(rename = "file-contains")]
    FileContains,
    #[serde(rename = "file-not-contains")]
    FileNotContains,
    #[serde(rename = "json-has-keys")]
    JsonHasKeys,
    #[serde(rename = "yaml-has-keys")]
    YamlHasKeys,
    #[serde(rename = "license/exists")]
    LicenseExists,
    #[serde(rename = "readme/exists")]
    ReadmeExists,
    #[serde(rename = "readme/has-badges")]
    ReadmeHasBadges,
    #[serde(rename = "readme/has-section")]
    ReadmeHasSection,
    #[serde(rename = "github-actions/timeout-minutes")]
    GithubActionsTimeoutMinutes,
    #[serde(rename = "python/pyproject-dependencies-alphabetical-order")]
    PyprojectDependenciesAlphabeticalOrder,
    #[serde(rename = "python/requirements-txt-dependencies-alphabetical-order")]
    RequirementsTxtDependenciesAlphabeticalOrder,
}

impl RuleKind {
    pub const ALL: [RuleKind; 13] = [
        RuleKind::FileExists,
        RuleKind::FileForbidden,
        RuleKind::FileContains,
        RuleKind::FileNotContains,
        RuleKind::JsonHasKeys,
        RuleKind::YamlHasKeys,
        RuleKind::LicenseExists,
        RuleKind::ReadmeExists,
        RuleKind::ReadmeHasBadges,
        RuleKind::ReadmeHasSection,
        RuleKind::GithubActionsTimeoutMinutes,
        RuleKind::PyprojectDependenciesAlphabeticalOrder,
        RuleKind::RequirementsTxtDependenciesAlphabeticalOrder,
    ];

    /// Registry name of the rule
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::FileExists => "file-exists",
            RuleKind::FileForbidden => "file-forbidden",
            RuleKind::FileContains => "file-contains",
            RuleKind::FileNotContains => "file-not-contains",
            RuleKind::JsonHasKeys => "json-has-keys",
            RuleKind::YamlHasKeys => "yaml-has-keys",
            RuleKind::LicenseExists => "license/exists",
            RuleKind::ReadmeExists => "readme/exists",
            RuleKind::ReadmeHasBadges => "readme/has-badges",
            RuleKind::ReadmeHasSection => "readme/has-section",
            RuleKind::GithubActionsTimeoutMinutes => "github-actions/timeout-minutes",
            RuleKind::PyprojectDependenciesAlphabeticalOrder => {
                "python/pyproject-dependencies-alphabetical-order"
            }
            RuleKind::RequirementsTxtDependenciesAlphabeticalOrder => {
                "python/requirements-txt-dependencies-alphabetical-order"
            }
        }
    }

    /// Look up a rule by registry name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// One-line summary shown by `validate`
    pub fn description(&self) -> &'static str {
        match self {
            RuleKind::FileExists => "a file or directory is present",
            RuleKind::FileForbidden => "files or directories are absent",
            RuleKind::FileContains => "files contain a text",
            RuleKind::FileNotContains => "files do not contain a text",
            RuleKind::JsonHasKeys => "JSON documents declare keys",
            RuleKind::YamlHasKeys => "YAML documents declare keys",
            RuleKind::LicenseExists => "a license file is present",
            RuleKind::ReadmeExists => "a README is present",
            RuleKind::ReadmeHasBadges => "the README shows badges",
            RuleKind::ReadmeHasSection => "the README has a section",
            RuleKind::GithubActionsTimeoutMinutes => "workflow jobs declare timeout-minutes",
            RuleKind::PyprojectDependenciesAlphabeticalOrder => {
                "pyproject.toml dependencies are sorted"
            }
            RuleKind::RequirementsTxtDependenciesAlphabeticalOrder => {
                "requirements files are sorted"
            }
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
