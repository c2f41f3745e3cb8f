//! # Evaluation Results Structures
//!
//! This module defines the data structures produced by a rule run.
//!
//! ## Overview
//!
//! - [`Level`] - Severity configured for a rule (error, warning)
//! - [`Violation`] - One failed expectation for one path, key or pattern
//! - [`RuleOutcome`] - Violations of one rule, classified by level
//! - [`RepositoryResult`] - All outcomes for one repository
//!
//! ## Examples
//!
//! ```rust
//! use repofmt::rules::results::{Level, RepositoryResult, RuleOutcome};
//! use repofmt::rules::RuleKind;
//!
//! let mut result = RepositoryResult::new("octo/demo");
//! result.add_outcome(RuleOutcome::new(
//!     RuleKind::ReadmeExists,
//!     Level::Error,
//!     vec!["README.md not found".to_string()],
//! ));
//!
//! assert!(result.has_errors());
//! assert_eq!(result.error_count(), 1);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use super::RuleKind;

/// Severity level applied uniformly to every violation a rule produces.
///
/// - **Error** - The repository does not comply
/// - **Warning** - The repository should be fixed but is not failing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warning,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One human-readable failed expectation.
///
/// `subject` is the path (or unmatched pattern) the violation is about and is
/// what rule exceptions are matched against; `message` is what gets reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub subject: String,
    pub message: String,
}

impl Violation {
    /// Create a violation with an explicit message
    pub fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Create a violation reported as `<path>: <detail>`
    pub fn at(path: impl Into<String>, detail: impl fmt::Display) -> Self {
        let path = path.into();
        let message = format!("{}: {}", path, detail);
        Self {
            subject: path,
            message,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Violations of one rule for one repository.
///
/// Only produced when the rule reported at least one violation. Exactly one
/// of `errors` and `warnings` is set, depending on the configured level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule: RuleKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
}

impl RuleOutcome {
    /// Classify violation messages by level
    pub fn new(rule: RuleKind, level: Level, messages: Vec<String>) -> Self {
        match level {
            Level::Error => Self {
                rule,
                errors: Some(messages),
                warnings: None,
            },
            Level::Warning => Self {
                rule,
                errors: None,
                warnings: Some(messages),
            },
        }
    }

    pub fn level(&self) -> Level {
        if self.errors.is_some() {
            Level::Error
        } else {
            Level::Warning
        }
    }

    /// Violation messages, whatever their level
    pub fn messages(&self) -> &[String] {
        self.errors
            .as_deref()
            .or(self.warnings.as_deref())
            .unwrap_or_default()
    }
}

/// Evaluation result for one repository.
///
/// A rule missing from `results` produced no violations. `error` is set when
/// evaluation was aborted, in which case `results` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryResult {
    pub repository: String,

    pub results: Vec<RuleOutcome>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RepositoryResult {
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            results: Vec::new(),
            error: None,
        }
    }

    /// A record for a repository whose evaluation was aborted
    pub fn failed(repository: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            results: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn add_outcome(&mut self, outcome: RuleOutcome) {
        self.results.push(outcome);
    }

    /// Get the outcome of a rule, if it produced violations
    pub fn outcome(&self, rule: RuleKind) -> Option<&RuleOutcome> {
        self.results.iter().find(|o| o.rule == rule)
    }

    /// Count error-level violations
    pub fn error_count(&self) -> usize {
        self.results
            .iter()
            .filter_map(|o| o.errors.as_ref())
            .map(Vec::len)
            .sum()
    }

    /// Count warning-level violations
    pub fn warning_count(&self) -> usize {
        self.results
            .iter()
            .filter_map(|o| o.warnings.as_ref())
            .map(Vec::len)
            .sum()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// No violations and no evaluation failure
    pub fn is_clean(&self) -> bool {
        self.results.is_empty() && self.error.is_none()
    }
}

/// Totals across a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub repositories: usize,
    pub errors: usize,
    pub warnings: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_results(results: &[RepositoryResult]) -> Self {
        results.iter().fold(Self::default(), |mut summary, result| {
            summary.repositories += 1;
            summary.errors += result.error_count();
            summary.warnings += result.warning_count();
            if result.is_failed() {
                summary.failed += 1;
            }
            summary
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_classified_by_level() {
        let error = RuleOutcome::new(
            RuleKind::FileExists,
            Level::Error,
            vec!["README.md not found".to_string()],
        );
        assert_eq!(error.level(), Level::Error);
        assert!(error.warnings.is_none());

        let warning = RuleOutcome::new(
            RuleKind::FileExists,
            Level::Warning,
            vec!["README.md not found".to_string()],
        );
        assert_eq!(warning.level(), Level::Warning);
        assert!(warning.errors.is_none());
        assert_eq!(warning.messages(), ["README.md not found".to_string()]);
    }

    #[test]
    fn test_outcome_serialization_omits_other_level() {
        let outcome = RuleOutcome::new(
            RuleKind::LicenseExists,
            Level::Warning,
            vec!["LICENSE.md not found".to_string()],
        );
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["rule"], "license/exists");
        assert_eq!(json["warnings"][0], "LICENSE.md not found");
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn test_repository_result_counts() {
        let mut result = RepositoryResult::new("octo/demo");
        assert!(result.is_clean());

        result.add_outcome(RuleOutcome::new(
            RuleKind::JsonHasKeys,
            Level::Error,
            vec!["a".to_string(), "b".to_string()],
        ));
        result.add_outcome(RuleOutcome::new(
            RuleKind::ReadmeHasBadges,
            Level::Warning,
            vec!["c".to_string()],
        ));

        assert_eq!(result.error_count(), 2);
        assert_eq!(result.warning_count(), 1);
        assert!(result.has_errors());
        assert!(result.has_warnings());
        assert!(!result.is_clean());
        assert!(result.outcome(RuleKind::JsonHasKeys).is_some());
        assert!(result.outcome(RuleKind::YamlHasKeys).is_none());
    }

    #[test]
    fn test_failed_result_serializes_error() {
        let result = RepositoryResult::failed("octo/demo", "Rule nope not found");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["repository"], "octo/demo");
        assert_eq!(json["error"], "Rule nope not found");
        assert!(json["results"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_violation_at_formats_path() {
        let violation = Violation::at("package.json", "missing key \"name\"");
        assert_eq!(violation.subject, "package.json");
        assert_eq!(violation.to_string(), "package.json: missing key \"name\"");
    }

    #[test]
    fn test_level_display() {
        assert_eq!(Level::Error.to_string(), "error");
        assert_eq!(Level::Warning.to_string(), "warning");
    }

    #[test]
    fn test_run_summary() {
        let mut ok = RepositoryResult::new("octo/a");
        ok.add_outcome(RuleOutcome::new(
            RuleKind::FileForbidden,
            Level::Warning,
            vec![".env should not exist".to_string()],
        ));
        let failed = RepositoryResult::failed("octo/b", "boom");

        let summary = RunSummary::from_results(&[ok, failed]);
        assert_eq!(summary.repositories, 2);
        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.errors, 0);
        assert_eq!(summary.failed, 1);
    }
}
