//! Structured document rules (`json-has-keys`, `yaml-has-keys`)

use crate::cache::RuleContext;
use crate::rules::keys::{self, KeyedDocument};
use crate::rules::matcher;
use crate::rules::results::Violation;
use crate::rules::schema::HasKeysOptions;

/// Document formats with a dotted-key view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    pub fn label(&self) -> &'static str {
        match self {
            Format::Json => "JSON",
            Format::Yaml => "YAML",
        }
    }
}

pub async fn json_has_keys(ctx: &RuleContext, options: &HasKeysOptions) -> Vec<Violation> {
    check_has_keys(ctx, options, Format::Json).await
}

pub async fn yaml_has_keys(ctx: &RuleContext, options: &HasKeysOptions) -> Vec<Violation> {
    check_has_keys(ctx, options, Format::Yaml).await
}

/// Missing keys of one parsed document, in key order
fn missing_keys<D: KeyedDocument>(file: &str, document: &D, keys: &[String]) -> Vec<Violation> {
    keys.iter()
        .filter(|key| !keys::has_key(document, key))
        .map(|key| Violation::at(file, format!("missing key \"{}\"", key)))
        .collect()
}

fn inspect(file: &str, text: &str, keys: &[String], format: Format) -> Vec<Violation> {
    let parsed = match format {
        Format::Json => serde_json::from_str::<serde_json::Value>(text)
            .map(|doc| missing_keys(file, &doc, keys))
            .map_err(|e| e.to_string()),
        Format::Yaml => serde_yaml::from_str::<serde_yaml::Value>(text)
            .map(|doc| missing_keys(file, &doc, keys))
            .map_err(|e| e.to_string()),
    };

    parsed.unwrap_or_else(|message| {
        vec![Violation::at(
            file,
            format!("failed to parse {}: {}", format.label(), message),
        )]
    })
}

/// Glob resolution here is always case-insensitive
pub async fn check_has_keys(
    ctx: &RuleContext,
    options: &HasKeysOptions,
    format: Format,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for expression in options.path.paths() {
        let files = match matcher::resolve(ctx, expression, false).await {
            Ok(files) => files,
            Err(violation) => {
                violations.push(violation);
                continue;
            }
        };

        for file in files {
            match ctx.get_file_text(&file).await {
                Ok(text) => violations.extend(inspect(&file, &text, &options.keys, format)),
                Err(e) => violations.push(Violation::at(file, e)),
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::memory::InMemoryProvider;
    use crate::providers::RepositoryRef;
    use crate::rules::schema::PathSpec;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn repo() -> RepositoryRef {
        RepositoryRef::new("octo", "demo")
    }

    fn options(path: PathSpec, keys: &[&str]) -> HasKeysOptions {
        HasKeysOptions {
            path,
            keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn messages(violations: Vec<Violation>) -> Vec<String> {
        violations.into_iter().map(|v| v.message).collect()
    }

    #[tokio::test]
    async fn test_json_reports_only_missing_keys() {
        let ctx = RuleContext::new(
            Arc::new(InMemoryProvider::new(repo()).with_file("config.json", r#"{"a":{"b":1}}"#)),
            repo(),
        );
        assert_eq!(
            messages(json_has_keys(&ctx, &options("config.json".into(), &["a.b", "a.c"])).await),
            vec!["config.json: missing key \"a.c\""]
        );
    }

    #[tokio::test]
    async fn test_json_array_index_is_missing() {
        let ctx = RuleContext::new(
            Arc::new(
                InMemoryProvider::new(repo()).with_file("data.json", r#"{"items":[{"name":"x"}]}"#),
            ),
            repo(),
        );
        assert_eq!(
            messages(json_has_keys(&ctx, &options("data.json".into(), &["items.0.name"])).await),
            vec!["data.json: missing key \"items.0.name\""]
        );
    }

    #[tokio::test]
    async fn test_json_parse_failure() {
        let ctx = RuleContext::new(
            Arc::new(InMemoryProvider::new(repo()).with_file("package.json", "{ not json")),
            repo(),
        );
        let found = messages(json_has_keys(&ctx, &options("package.json".into(), &["name"])).await);
        assert_eq!(found.len(), 1);
        assert!(found[0].starts_with("package.json: failed to parse JSON: "));
    }

    #[tokio::test]
    async fn test_yaml_pattern_across_files() {
        let ctx = RuleContext::new(
            Arc::new(
                InMemoryProvider::new(repo())
                    .with_file(".github/workflows/ci.yml", "name: CI\non:\n  push: {}\n")
                    .with_file(".github/workflows/release.YAML", "on:\n  push: {}\n"),
            ),
            repo(),
        );
        let opts = options(".github/workflows/*.{yml,yaml}".into(), &["name", "on.push"]);

        assert_eq!(
            messages(yaml_has_keys(&ctx, &opts).await),
            vec![".github/workflows/release.YAML: missing key \"name\""]
        );
    }

    #[tokio::test]
    async fn test_yaml_parse_failure_and_unmatched_pattern() {
        let ctx = RuleContext::new(
            Arc::new(InMemoryProvider::new(repo()).with_file("broken.yml", "a: [1, 2\n")),
            repo(),
        );
        let opts = options(
            PathSpec::Many(vec!["broken.yml".to_string(), "config/*.yml".to_string()]),
            &["a"],
        );

        let found = messages(yaml_has_keys(&ctx, &opts).await);
        assert_eq!(found.len(), 2);
        assert!(found[0].starts_with("broken.yml: failed to parse YAML: "));
        assert_eq!(found[1], "config/*.yml: no files match pattern");
    }

    #[tokio::test]
    async fn test_same_document_fetched_once() {
        let provider =
            Arc::new(InMemoryProvider::new(repo()).with_file("package.json", r#"{"name":"x"}"#));
        let ctx = RuleContext::new(provider.clone(), repo());
        let opts = options("package.json".into(), &["name"]);

        json_has_keys(&ctx, &opts).await;
        json_has_keys(&ctx, &opts).await;
        assert_eq!(provider.fetches_for(&repo(), "package.json"), 1);
    }
}
