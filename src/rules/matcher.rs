//! Path expression resolution
//!
//! A path expression is either a literal path or a glob pattern. Patterns are
//! matched against the full recursive file list of the repository, with `*`
//! never crossing a `/` and dot-files matched like any other file.

use globset::{GlobBuilder, GlobMatcher};

use super::results::Violation;
use crate::cache::RuleContext;
use crate::providers::DirectoryEntry;

const GLOB_CHARS: [char; 6] = ['*', '?', '[', ']', '{', '}'];

/// Check if a path expression contains glob metacharacters
pub fn is_glob_pattern(path: &str) -> bool {
    path.contains(GLOB_CHARS)
}

/// Compile a glob pattern
pub fn compile(pattern: &str, case_sensitive: bool) -> Result<GlobMatcher, globset::Error> {
    let glob = GlobBuilder::new(pattern)
        .case_insensitive(!case_sensitive)
        .literal_separator(true)
        .backslash_escape(true)
        .build()?;
    Ok(glob.compile_matcher())
}

/// Paths of the entries matching a pattern, in listing order
pub fn matching_paths<'a>(
    files: &'a [DirectoryEntry],
    pattern: &str,
    case_sensitive: bool,
) -> Result<Vec<&'a str>, globset::Error> {
    let matcher = compile(pattern, case_sensitive)?;
    Ok(files
        .iter()
        .filter(|entry| matcher.is_match(&entry.path))
        .map(|entry| entry.path.as_str())
        .collect())
}

/// Expand a path expression into the concrete paths a rule should check.
///
/// A literal path resolves to itself without touching the repository. A
/// pattern with no match yields a single violation about the pattern.
pub async fn resolve(
    ctx: &RuleContext,
    expression: &str,
    case_sensitive: bool,
) -> Result<Vec<String>, Violation> {
    if !is_glob_pattern(expression) {
        return Ok(vec![expression.to_string()]);
    }

    let files = ctx
        .get_all_files()
        .await
        .map_err(|e| Violation::at(expression, format!("failed to list files: {}", e)))?;

    let matches = matching_paths(files, expression, case_sensitive)
        .map_err(|e| Violation::at(expression, format!("invalid pattern: {}", e)))?;

    if matches.is_empty() {
        return Err(Violation::at(expression, "no files match pattern"));
    }

    tracing::trace!(pattern = expression, matches = matches.len(), "Resolved glob");
    Ok(matches.into_iter().map(str::to_string).collect())
}
