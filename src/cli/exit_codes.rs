//! Exit codes for the CLI
//!
//! Standard exit codes used by the repofmt CLI for CI/CD integration.
//!
//! # Exit Code Reference
//!
//! | Code | Constant | Meaning | Example |
//! |------|----------|---------|---------|
//! | 0 | `SUCCESS` | Success | Every repository complies |
//! | 1 | `ERRORS` | Error-level violations | README missing on a rule configured as `error` |
//! | 2 | `WARNINGS` | Warning-level violations only | Badges missing on a `warning` rule |
//! | 3 | `ERROR` | Runtime error | Not authenticated, network error |
//! | 4 | `INVALID_CONFIG` | Invalid configuration | Unknown rule name, invalid options |
//!
//! # Usage
//!
//! ```rust
//! use repofmt::cli::exit_codes;
//! use repofmt::rules::RepositoryResult;
//!
//! let results = vec![RepositoryResult::new("octo/demo")];
//! assert_eq!(exit_codes::for_results(&results), exit_codes::SUCCESS);
//! ```

use crate::rules::results::RepositoryResult;

/// Success - every repository passed every rule.
pub const SUCCESS: i32 = 0;

/// Error-level violations found.
///
/// Used when:
/// - Any rule configured with `level = "error"` reported a violation
/// - Evaluation of a repository was aborted
pub const ERRORS: i32 = 1;

/// Only warning-level violations found.
pub const WARNINGS: i32 = 2;

/// Runtime error (file not found, network error, etc.).
///
/// Used when:
/// - No credentials are available
/// - The hosting platform cannot be reached
/// - The report cannot be written
pub const ERROR: i32 = 3;

/// Invalid configuration.
///
/// Used when:
/// - No configuration file was found or it cannot be parsed
/// - A rule name is unknown
/// - Rule options or exception patterns are invalid
/// - A repository argument is not `owner/name`
pub const INVALID_CONFIG: i32 = 4;

/// Exit code summarizing a run
pub fn for_results(results: &[RepositoryResult]) -> i32 {
    if results.iter().any(|r| r.has_errors() || r.is_failed()) {
        ERRORS
    } else if results.iter().any(RepositoryResult::has_warnings) {
        WARNINGS
    } else {
        SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::results::{Level, RuleOutcome};
    use crate::rules::RuleKind;

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [SUCCESS, ERRORS, WARNINGS, ERROR, INVALID_CONFIG];
        for i in 0..codes.len() {
            for j in (i + 1)..codes.len() {
                assert_ne!(
                    codes[i], codes[j],
                    "Exit codes should be unique: {} and {} are both {}",
                    i, j, codes[i]
                );
            }
        }
    }

    #[test]
    fn test_for_results() {
        let clean = RepositoryResult::new("octo/a");
        let mut warned = RepositoryResult::new("octo/b");
        warned.add_outcome(RuleOutcome::new(
            RuleKind::ReadmeHasBadges,
            Level::Warning,
            vec!["README.md: no badges found".to_string()],
        ));
        let failed = RepositoryResult::failed("octo/c", "boom");

        assert_eq!(for_results(&[clean.clone()]), SUCCESS);
        assert_eq!(for_results(&[clean.clone(), warned.clone()]), WARNINGS);
        assert_eq!(for_results(&[warned, failed]), ERRORS);
        assert_eq!(for_results(&[]), SUCCESS);
    }
}
