//! File rules
//!
//! This module provides the presence and content checks shared by most of the
//! registry:
//! - `file-exists` and its `readme/exists`, `license/exists` aliases
//! - `file-forbidden`
//! - `file-contains` and `file-not-contains`
//!
//! Existence checks list the parent directory of each path and compare entry
//! names, so a path whose directory cannot be listed is simply absent.

use crate::cache::RuleContext;
use crate::rules::matcher;
use crate::rules::results::Violation;
use crate::rules::schema::{ContainsOptions, EntryType, Exceptions, ExistsOptions};

/// Split a repository path into its parent directory and entry name
fn split_path(path: &str) -> (&str, &str) {
    let path = path.trim_matches('/');
    match path.rsplit_once('/') {
        Some((dir, name)) => (dir, name),
        None => ("", path),
    }
}

fn names_match(left: &str, right: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        left == right
    } else {
        left.to_lowercase() == right.to_lowercase()
    }
}

/// Check if an entry of the given type exists at `path`
pub async fn entry_exists(
    ctx: &RuleContext,
    path: &str,
    case_sensitive: bool,
    entry_type: EntryType,
) -> bool {
    let (dir, name) = split_path(path);

    let entries = match ctx.get_directory(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(path = path, error = %e, "Treating unlistable parent as absent");
            return false;
        }
    };

    entries
        .iter()
        .filter(|entry| entry_type.accepts(&entry.kind))
        .any(|entry| names_match(&entry.name, name, case_sensitive))
}

fn display_paths(paths: &[String], prefix: &str) -> String {
    match paths {
        [single] => single.clone(),
        many => format!("{}[{}]", prefix, many.join(", ")),
    }
}

/// Pass as soon as any of the paths exists
///
/// Excepted paths still satisfy the rule but are left out of the report.
pub async fn file_exists(
    ctx: &RuleContext,
    options: &ExistsOptions,
    exceptions: &Exceptions,
) -> Vec<Violation> {
    let paths = options.path.paths();

    for path in paths {
        if entry_exists(ctx, path, options.case_sensitive, options.entry_type).await {
            return Vec::new();
        }
    }

    let missing: Vec<String> = paths
        .iter()
        .filter(|path| !exceptions.is_excepted(path))
        .cloned()
        .collect();
    if missing.is_empty() {
        return Vec::new();
    }

    let display = display_paths(&missing, "one of ");
    vec![Violation::new(display.clone(), format!("{} not found", display))]
}

/// Report every non-excepted path that exists, as a single violation
pub async fn file_forbidden(
    ctx: &RuleContext,
    options: &ExistsOptions,
    exceptions: &Exceptions,
) -> Vec<Violation> {
    let mut found = Vec::new();

    for path in options.path.paths() {
        if exceptions.is_excepted(path) {
            continue;
        }
        if entry_exists(ctx, path, options.case_sensitive, options.entry_type).await {
            found.push(path.clone());
        }
    }

    if found.is_empty() {
        return Vec::new();
    }

    let display = display_paths(&found, "");
    vec![Violation::new(display.clone(), format!("{} should not exist", display))]
}

pub async fn file_contains(ctx: &RuleContext, options: &ContainsOptions) -> Vec<Violation> {
    check_contents(ctx, options, true).await
}

pub async fn file_not_contains(ctx: &RuleContext, options: &ContainsOptions) -> Vec<Violation> {
    check_contents(ctx, options, false).await
}

async fn check_contents(
    ctx: &RuleContext,
    options: &ContainsOptions,
    expect_present: bool,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let needle = if options.case_sensitive {
        options.contains.clone()
    } else {
        options.contains.to_lowercase()
    };

    for expression in options.path.paths() {
        let files = match matcher::resolve(ctx, expression, options.case_sensitive).await {
            Ok(files) => files,
            Err(violation) => {
                violations.push(violation);
                continue;
            }
        };

        for file in files {
            let text = match ctx.get_file_text(&file).await {
                Ok(text) => text,
                Err(e) => {
                    violations.push(Violation::at(file, e));
                    continue;
                }
            };

            let haystack = if options.case_sensitive {
                text
            } else {
                text.to_lowercase()
            };

            match (haystack.contains(&needle), expect_present) {
                (false, true) => violations.push(Violation::at(
                    file,
                    format!("file does not contain \"{}\"", options.contains),
                )),
                (true, false) => violations.push(Violation::at(
                    file,
                    format!("file contains \"{}\"", options.contains),
                )),
                _ => {}
            }
        }
    }

    violations
}
