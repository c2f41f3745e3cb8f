//! Dependency ordering rules for Python projects
//!
//! Dependency lists are compared by normalized distribution name (PEP 503:
//! lowercase, runs of `-`, `_` and `.` collapsed to `-`). Every adjacent pair
//! that is out of order is reported once.

use lazy_static::lazy_static;
use regex::Regex;

use crate::cache::RuleContext;
use crate::rules::matcher;
use crate::rules::results::Violation;
use crate::rules::schema::{PyprojectOrderOptions, RequirementsOrderOptions};

lazy_static! {
    static ref SEPARATORS: Regex = Regex::new(r"[-_.]+").unwrap();
}

const NAME_TERMINATORS: [char; 9] = ['[', '<', '>', '=', '!', '~', ';', '@', ','];

/// Normalize a distribution name
pub fn normalize_name(name: &str) -> String {
    SEPARATORS.replace_all(&name.to_lowercase(), "-").into_owned()
}

/// Distribution name of a requirement specifier, if it has one
pub fn requirement_name(spec: &str) -> Option<String> {
    let spec = spec.trim();
    let end = spec
        .find(|c: char| NAME_TERMINATORS.contains(&c) || c.is_whitespace())
        .unwrap_or(spec.len());
    let name = spec[..end].trim();

    if name.is_empty() || name.contains(['/', ':']) {
        return None;
    }
    Some(normalize_name(name))
}

/// Report each name that sorts before the one listed right above it
fn out_of_order(file: &str, section: &str, names: &[String]) -> Vec<Violation> {
    names
        .windows(2)
        .filter(|pair| pair[1] < pair[0])
        .map(|pair| {
            Violation::at(
                file,
                format!(
                    "\"{}\" should come before \"{}\" in {}",
                    pair[1], pair[0], section
                ),
            )
        })
        .collect()
}

fn string_names(values: &[toml::Value]) -> Vec<String> {
    values
        .iter()
        .filter_map(toml::Value::as_str)
        .filter_map(requirement_name)
        .collect()
}

/// Named dependency lists of a `pyproject.toml`, in check order
pub fn pyproject_sections(document: &toml::Value) -> Vec<(String, Vec<String>)> {
    let mut sections = Vec::new();

    let project = document.get("project");
    if let Some(deps) = project
        .and_then(|p| p.get("dependencies"))
        .and_then(toml::Value::as_array)
    {
        sections.push(("project.dependencies".to_string(), string_names(deps)));
    }

    let groups = [
        (
            "project.optional-dependencies",
            project.and_then(|p| p.get("optional-dependencies")),
        ),
        ("dependency-groups", document.get("dependency-groups")),
    ];
    for (prefix, table) in groups {
        let Some(table) = table.and_then(toml::Value::as_table) else {
            continue;
        };
        for (group, deps) in table {
            if let Some(deps) = deps.as_array() {
                sections.push((format!("{}.{}", prefix, group), string_names(deps)));
            }
        }
    }

    sections
}

/// Names listed in a requirements file, skipping comments and pip options
pub fn requirements_names(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split(" #").next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
        .filter_map(requirement_name)
        .collect()
}

pub async fn pyproject_order(ctx: &RuleContext, options: &PyprojectOrderOptions) -> Vec<Violation> {
    let file = options.path.as_str();
    let text = match ctx.get_file_text(file).await {
        Ok(text) => text,
        Err(e) => return vec![Violation::at(file, e)],
    };

    let document = match toml::from_str::<toml::Table>(&text) {
        Ok(table) => toml::Value::Table(table),
        Err(e) => {
            return vec![Violation::at(
                file,
                format!("failed to parse TOML: {}", e.message()),
            )]
        }
    };

    pyproject_sections(&document)
        .iter()
        .flat_map(|(section, names)| out_of_order(file, section, names))
        .collect()
}

pub async fn requirements_order(
    ctx: &RuleContext,
    options: &RequirementsOrderOptions,
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
                Ok(text) => {
                    violations.extend(out_of_order(&file, "requirements", &requirements_names(&text)))
                }
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

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Django_REST.framework"), "django-rest-framework");
        assert_eq!(normalize_name("zope..interface"), "zope-interface");
    }

    #[test]
    fn test_requirement_name() {
        assert_eq!(requirement_name("requests>=2.0"), Some("requests".to_string()));
        assert_eq!(requirement_name("uvicorn[standard] ~= 0.30"), Some("uvicorn".to_string()));
        assert_eq!(
            requirement_name("pywin32; sys_platform == 'win32'"),
            Some("pywin32".to_string())
        );
        assert_eq!(requirement_name("pkg @ https://example.com/pkg.whl"), Some("pkg".to_string()));
        assert_eq!(requirement_name("https://example.com/pkg.whl"), None);
    }

    #[test]
    fn test_requirements_names_skip_noise() {
        let text = "# tooling\n-r base.txt\n\nblack==24.1  # formatter\n--index-url https://x\nFlake8\n";
        assert_eq!(requirements_names(text), vec!["black", "flake8"]);
    }

    #[test]
    fn test_pyproject_sections() {
        let document = toml::Value::Table(
            toml::from_str(
                r#"
            [project]
            dependencies = ["b", "a"]

            [project.optional-dependencies]
            test = ["pytest"]

            [dependency-groups]
            dev = ["ruff", {include-group = "test"}]
        "#,
            )
            .unwrap(),
        );

        let names: Vec<_> = pyproject_sections(&document)
            .into_iter()
            .map(|(section, _)| section)
            .collect();
        assert_eq!(
            names,
            vec![
                "project.dependencies",
                "project.optional-dependencies.test",
                "dependency-groups.dev",
            ]
        );
    }

    #[tokio::test]
    async fn test_pyproject_inversions() {
        let ctx = context(&[(
            "pyproject.toml",
            "[project]\nname = \"demo\"\ndependencies = [\"httpx\", \"Click>=8\", \"rich\"]\n\n\
             [project.optional-dependencies]\ndev = [\"pytest\", \"mypy\"]\n",
        )]);
        let options = PyprojectOrderOptions {
            path: "pyproject.toml".to_string(),
        };

        assert_eq!(
            messages(pyproject_order(&ctx, &options).await),
            vec![
                "pyproject.toml: \"click\" should come before \"httpx\" in project.dependencies",
                "pyproject.toml: \"mypy\" should come before \"pytest\" in project.optional-dependencies.dev",
            ]
        );
    }

    #[tokio::test]
    async fn test_pyproject_sorted_and_missing() {
        let ctx = context(&[("pyproject.toml", "[project]\ndependencies = [\"a-b\", \"a_c\"]\n")]);
        let options = PyprojectOrderOptions {
            path: "pyproject.toml".to_string(),
        };
        assert!(pyproject_order(&ctx, &options).await.is_empty());

        let missing = PyprojectOrderOptions {
            path: "sub/pyproject.toml".to_string(),
        };
        assert_eq!(
            messages(pyproject_order(&ctx, &missing).await),
            vec!["sub/pyproject.toml: not found"]
        );
    }

    #[tokio::test]
    async fn test_pyproject_parse_failure() {
        let ctx = context(&[("pyproject.toml", "[project\n")]);
        let options = PyprojectOrderOptions {
            path: "pyproject.toml".to_string(),
        };
        let found = messages(pyproject_order(&ctx, &options).await);
        assert_eq!(found.len(), 1);
        assert!(found[0].starts_with("pyproject.toml: failed to parse TOML: "));
    }

    #[tokio::test]
    async fn test_requirements_order_with_pattern() {
        let ctx = context(&[
            ("requirements.txt", "django\nrequests\n"),
            ("requirements-dev.txt", "pytest\nblack\ncoverage\n"),
        ]);
        let options = RequirementsOrderOptions {
            path: "requirements*.txt".into(),
        };

        assert_eq!(
            messages(requirements_order(&ctx, &options).await),
            vec!["requirements-dev.txt: \"black\" should come before \"pytest\" in requirements"]
        );
    }
}
