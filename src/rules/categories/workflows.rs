//! GitHub Actions workflow rules
//!
//! `github-actions/timeout-minutes` requires every job of every workflow in
//! `.github/workflows` to declare `timeout-minutes`, optionally capped by a
//! maximum. A repository without workflows passes.

use serde_yaml::Value;

use crate::cache::RuleContext;
use crate::rules::keys;
use crate::rules::results::Violation;
use crate::rules::schema::TimeoutMinutesOptions;

const WORKFLOWS_DIR: &str = ".github/workflows";

fn is_workflow_file(name: &str) -> bool {
    name.ends_with(".yml") || name.ends_with(".yaml")
}

/// Numeric value of a declared timeout, if it has one
fn timeout_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

/// Violations for one parsed workflow, in job declaration order
pub fn check_workflow(file: &str, workflow: &Value, maximum: Option<f64>) -> Vec<Violation> {
    let Some(Value::Mapping(jobs)) = keys::get_nested(workflow, "jobs") else {
        return Vec::new();
    };

    let mut violations = Vec::new();
    for (name, job) in jobs {
        let job_name = display_value(name);
        let Some(timeout) = keys::get_nested(job, "timeout-minutes") else {
            violations.push(Violation::at(
                file,
                format!("job \"{}\" is missing timeout-minutes", job_name),
            ));
            continue;
        };

        if let (Some(max), Some(minutes)) = (maximum, timeout_value(timeout)) {
            if minutes > max {
                violations.push(Violation::at(
                    file,
                    format!(
                        "job \"{}\" has timeout-minutes ({}) that is higher than {}",
                        job_name,
                        display_value(timeout),
                        max
                    ),
                ));
            }
        }
    }
    violations
}

pub async fn timeout_minutes(ctx: &RuleContext, options: &TimeoutMinutesOptions) -> Vec<Violation> {
    let entries = match ctx.get_directory(WORKFLOWS_DIR).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(error = %e, "No workflows to check");
            return Vec::new();
        }
    };

    let mut violations = Vec::new();
    for entry in entries
        .iter()
        .filter(|e| e.is_file() && is_workflow_file(&e.name))
    {
        let file = entry.path.as_str();
        let text = match ctx.get_file_text(file).await {
            Ok(text) => text,
            Err(e) => {
                violations.push(Violation::at(file, format!("failed to read file: {}", e)));
                continue;
            }
        };

        match serde_yaml::from_str::<Value>(&text) {
            Ok(workflow) => violations.extend(check_workflow(file, &workflow, options.maximum)),
            Err(e) => violations.push(Violation::at(file, format!("failed to parse YAML: {}", e))),
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::memory::InMemoryProvider;
    use crate::providers::RepositoryRef;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn context(files: &[(&str, &str)]) -> RuleContext {
        let repo = RepositoryRef::new("octo", "demo");
        let provider = files
            .iter()
            .fold(InMemoryProvider::new(repo.clone()), |p, (path, content)| {
                p.with_file(path, content)
            });
        RuleContext::new(Arc::new(provider), repo)
    }

    fn messages(violations: Vec<Violation>) -> Vec<String> {
        violations.into_iter().map(|v| v.message).collect()
    }

    #[tokio::test]
    async fn test_no_workflows_directory() {
        let ctx = context(&[("README.md", "x")]);
        assert!(timeout_minutes(&ctx, &TimeoutMinutesOptions::default()).await.is_empty());
    }

    #[tokio::test]
    async fn test_job_without_timeout() {
        let ctx = context(&[(
            ".github/workflows/ci.yml",
            "on: push\njobs:\n  build:\n    runs-on: ubuntu-latest\n",
        )]);
        assert_eq!(
            messages(timeout_minutes(&ctx, &TimeoutMinutesOptions::default()).await),
            vec![".github/workflows/ci.yml: job \"build\" is missing timeout-minutes"]
        );
    }

    #[tokio::test]
    async fn test_timeout_above_maximum() {
        let ctx = context(&[(
            ".github/workflows/ci.yml",
            "jobs:\n  build:\n    timeout-minutes: 45\n  lint:\n    timeout-minutes: 10\n",
        )]);
        let options = TimeoutMinutesOptions {
            maximum: Some(30.0),
        };
        assert_eq!(
            messages(timeout_minutes(&ctx, &options).await),
            vec![".github/workflows/ci.yml: job \"build\" has timeout-minutes (45) that is higher than 30"]
        );
        assert!(timeout_minutes(&ctx, &TimeoutMinutesOptions::default()).await.is_empty());
    }

    #[tokio::test]
    async fn test_only_yaml_files_are_checked() {
        let ctx = context(&[
            (".github/workflows/README.md", "jobs"),
            (".github/workflows/a.yaml", "jobs:\n  one: {}\n  two:\n    timeout-minutes: 5\n"),
            (".github/workflows/b.yml", "jobs:\n  three:\n"),
        ]);
        assert_eq!(
            messages(timeout_minutes(&ctx, &TimeoutMinutesOptions::default()).await),
            vec![
                ".github/workflows/a.yaml: job \"one\" is missing timeout-minutes",
                ".github/workflows/b.yml: job \"three\" is missing timeout-minutes",
            ]
        );
    }

    #[tokio::test]
    async fn test_unparsable_workflow() {
        let ctx = context(&[(".github/workflows/ci.yml", "jobs: [\n")]);
        let found = messages(timeout_minutes(&ctx, &TimeoutMinutesOptions::default()).await);
        assert_eq!(found.len(), 1);
        assert!(found[0].starts_with(".github/workflows/ci.yml: failed to parse YAML: "));
    }

    #[test]
    fn test_expression_timeouts_are_not_compared() {
        let workflow: Value = serde_yaml::from_str(
            "jobs:\n  build:\n    timeout-minutes: ${{ inputs.timeout }}\n",
        )
        .unwrap();
        assert!(check_workflow("ci.yml", &workflow, Some(30.0)).is_empty());
    }

    #[test]
    fn test_workflow_without_jobs() {
        let workflow: Value = serde_yaml::from_str("name: empty\n").unwrap();
        assert!(check_workflow("ci.yml", &workflow, None).is_empty());
    }
}
