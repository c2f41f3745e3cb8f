//! Rule option schemas
//!
//! Raw rule configurations carry their options as an untyped document. This
//! module turns a [`RuleConfig`] into a [`ValidatedRule`]: the rule name is
//! looked up in the registry, options are deserialized into the rule's typed
//! options (camelCase keys, unknown keys ignored, defaults applied) and every
//! pattern is compiled up front. Any failure is a configuration error.

use regex::{Regex, RegexBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::matcher;
use super::registry::Rule;
use super::results::Level;
use super::RuleKind;
use crate::config::RuleConfig;
use crate::error::ConfigError;
use crate::providers::EntryKind;

/// One path expression or a non-empty list of them
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PathSpec {
    One(String),
    Many(Vec<String>),
}

impl PathSpec {
    pub fn paths(&self) -> &[String] {
        match self {
            PathSpec::One(path) => std::slice::from_ref(path),
            PathSpec::Many(paths) => paths,
        }
    }
}

impl From<&str> for PathSpec {
    fn from(path: &str) -> Self {
        PathSpec::One(path.to_string())
    }
}

/// Directory entry types an existence check accepts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    #[default]
    File,
    Directory,
    Any,
}

impl EntryType {
    pub fn accepts(&self, kind: &EntryKind) -> bool {
        match self {
            EntryType::File => *kind == EntryKind::File,
            EntryType::Directory => *kind == EntryKind::Dir,
            EntryType::Any => true,
        }
    }
}

/// Options of `file-exists`, `file-forbidden`, `readme/exists` and `license/exists`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistsOptions {
    pub path: PathSpec,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default, rename = "type")]
    pub entry_type: EntryType,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DefaultedExistsOptions {
    path: Option<PathSpec>,
    #[serde(default)]
    case_sensitive: bool,
}

impl DefaultedExistsOptions {
    fn with_default_path(self, default: &str) -> ExistsOptions {
        ExistsOptions {
            path: self.path.unwrap_or_else(|| default.into()),
            case_sensitive: self.case_sensitive,
            entry_type: EntryType::File,
        }
    }
}

/// Options of `file-contains` and `file-not-contains`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainsOptions {
    pub path: PathSpec,
    pub contains: String,
    #[serde(default)]
    pub case_sensitive: bool,
}

/// Options of `json-has-keys` and `yaml-has-keys`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HasKeysOptions {
    pub path: PathSpec,
    pub keys: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBadgeOptions {
    #[serde(default = "default_readme")]
    path: String,
    min_count: Option<u32>,
    patterns: Option<Vec<String>>,
}

/// A required badge pattern, matched case-insensitively.
///
/// Written in `regex` crate syntax: lookaround and backreferences are
/// rejected when the configuration is validated.
#[derive(Debug, Clone)]
pub struct BadgePattern {
    pub source: String,
    pub regex: Regex,
}

/// Options of `readme/has-badges`
///
/// Every entry of `patterns` must match at least one badge; see
/// [`BadgePattern`] for the accepted syntax.
#[derive(Debug, Clone)]
pub struct BadgeOptions {
    pub path: String,
    pub min_count: Option<u32>,
    pub patterns: Vec<BadgePattern>,
}

/// Options of `readme/has-section`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionOptions {
    pub section: String,
    #[serde(default = "default_readme")]
    pub path: String,
    #[serde(default)]
    pub case_sensitive: bool,
}

/// Options of `github-actions/timeout-minutes`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeoutMinutesOptions {
    pub maximum: Option<f64>,
}

/// Options of `python/pyproject-dependencies-alphabetical-order`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PyprojectOrderOptions {
    #[serde(default = "default_pyproject")]
    pub path: String,
}

/// Options of `python/requirements-txt-dependencies-alphabetical-order`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementsOrderOptions {
    #[serde(default = "default_requirements")]
    pub path: PathSpec,
}

fn default_readme() -> String {
    "README.md".to_string()
}

fn default_pyproject() -> String {
    "pyproject.toml".to_string()
}

fn default_requirements() -> PathSpec {
    "requirements.txt".into()
}

/// Compiled exception patterns of one rule.
///
/// Patterns use the `regex` crate syntax, which has no lookaround and no
/// backreferences. Each pattern is matched against one path at a time.
#[derive(Debug, Clone, Default)]
pub struct Exceptions(Vec<Regex>);

impl Exceptions {
    pub fn new(patterns: Vec<Regex>) -> Self {
        Self(patterns)
    }

    /// Check if a path is exempted by any pattern
    pub fn is_excepted(&self, path: &str) -> bool {
        self.0.iter().any(|re| re.is_match(path))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A rule ready to run: typed options, level and compiled exceptions
#[derive(Debug, Clone)]
pub struct ValidatedRule {
    pub rule: Rule,
    pub level: Level,
    pub exceptions: Exceptions,
}

impl ValidatedRule {
    pub fn kind(&self) -> RuleKind {
        self.rule.kind()
    }
}

/// Validate a raw rule configuration
pub fn validate(config: &RuleConfig) -> Result<ValidatedRule, ConfigError> {
    let kind = RuleKind::from_name(&config.name).ok_or_else(|| ConfigError::UnknownRule {
        name: config.name.clone(),
    })?;

    let rule = parse_rule(kind, config.options.as_ref())?;

    let exceptions = config
        .exceptions
        .iter()
        .flatten()
        .map(|pattern| Regex::new(pattern).map_err(|e| invalid_pattern(kind, pattern, e)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ValidatedRule {
        rule,
        level: config.level,
        exceptions: Exceptions::new(exceptions),
    })
}

/// Deserialize and check the options of one rule kind
pub fn parse_rule(kind: RuleKind, options: Option<&serde_json::Value>) -> Result<Rule, ConfigError> {
    let rule = match kind {
        RuleKind::FileExists => Rule::FileExists(deserialize(kind, options)?),
        RuleKind::FileForbidden => Rule::FileForbidden(deserialize(kind, options)?),
        RuleKind::FileContains => Rule::FileContains(deserialize(kind, options)?),
        RuleKind::FileNotContains => Rule::FileNotContains(deserialize(kind, options)?),
        RuleKind::JsonHasKeys => Rule::JsonHasKeys(deserialize(kind, options)?),
        RuleKind::YamlHasKeys => Rule::YamlHasKeys(deserialize(kind, options)?),
        RuleKind::LicenseExists => Rule::LicenseExists(
            deserialize::<DefaultedExistsOptions>(kind, options)?.with_default_path("LICENSE.md"),
        ),
        RuleKind::ReadmeExists => Rule::ReadmeExists(
            deserialize::<DefaultedExistsOptions>(kind, options)?.with_default_path("README.md"),
        ),
        RuleKind::ReadmeHasBadges => {
            Rule::ReadmeHasBadges(compile_badges(kind, deserialize(kind, options)?)?)
        }
        RuleKind::ReadmeHasSection => Rule::ReadmeHasSection(deserialize(kind, options)?),
        RuleKind::GithubActionsTimeoutMinutes => {
            Rule::GithubActionsTimeoutMinutes(deserialize(kind, options)?)
        }
        RuleKind::PyprojectDependenciesAlphabeticalOrder => {
            Rule::PyprojectDependenciesAlphabeticalOrder(deserialize(kind, options)?)
        }
        RuleKind::RequirementsTxtDependenciesAlphabeticalOrder => {
            Rule::RequirementsTxtDependenciesAlphabeticalOrder(deserialize(kind, options)?)
        }
    };

    check_constraints(kind, &rule)?;
    Ok(rule)
}

/// Missing options are read as an empty object so defaults still apply
fn deserialize<T: DeserializeOwned>(
    kind: RuleKind,
    options: Option<&serde_json::Value>,
) -> Result<T, ConfigError> {
    let value = match options {
        None | Some(serde_json::Value::Null) => serde_json::Value::Object(Default::default()),
        Some(value) => value.clone(),
    };
    serde_json::from_value(value).map_err(|e| invalid_options(kind, e))
}

fn compile_badges(kind: RuleKind, raw: RawBadgeOptions) -> Result<BadgeOptions, ConfigError> {
    let patterns = raw
        .patterns
        .unwrap_or_default()
        .into_iter()
        .map(|source| {
            RegexBuilder::new(&source)
                .case_insensitive(true)
                .build()
                .map(|regex| BadgePattern {
                    source: source.clone(),
                    regex,
                })
                .map_err(|e| invalid_pattern(kind, &source, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BadgeOptions {
        path: raw.path,
        min_count: raw.min_count,
        patterns,
    })
}

fn check_constraints(kind: RuleKind, rule: &Rule) -> Result<(), ConfigError> {
    match rule {
        Rule::FileExists(o) | Rule::FileForbidden(o) | Rule::LicenseExists(o) | Rule::ReadmeExists(o) => {
            check_paths(kind, &o.path, false)
        }
        Rule::FileContains(o) | Rule::FileNotContains(o) => check_paths(kind, &o.path, true),
        Rule::JsonHasKeys(o) | Rule::YamlHasKeys(o) => {
            check_paths(kind, &o.path, true)?;
            if o.keys.is_empty() {
                return Err(invalid_options(kind, "keys must contain at least one entry"));
            }
            Ok(())
        }
        Rule::RequirementsTxtDependenciesAlphabeticalOrder(o) => check_paths(kind, &o.path, true),
        Rule::GithubActionsTimeoutMinutes(o) => match o.maximum {
            Some(max) if !(max.is_finite() && max > 0.0) => {
                Err(invalid_options(kind, "maximum must be a positive number"))
            }
            _ => Ok(()),
        },
        Rule::ReadmeHasSection(o) => check_paths(kind, &o.path.as_str().into(), true),
        Rule::ReadmeHasBadges(_) | Rule::PyprojectDependenciesAlphabeticalOrder(_) => Ok(()),
    }
}

/// Lists must not be empty; glob patterns must compile when the rule resolves them
fn check_paths(kind: RuleKind, spec: &PathSpec, globs: bool) -> Result<(), ConfigError> {
    if spec.paths().is_empty() {
        return Err(invalid_options(kind, "path must contain at least one entry"));
    }
    if globs {
        for path in spec.paths().iter().filter(|p| matcher::is_glob_pattern(p)) {
            matcher::compile(path, true).map_err(|e| invalid_pattern(kind, path, e))?;
        }
    }
    Ok(())
}

fn invalid_options(kind: RuleKind, message: impl ToString) -> ConfigError {
    ConfigError::InvalidOptions {
        rule: kind.to_string(),
        message: message.to_string(),
    }
}

fn invalid_pattern(kind: RuleKind, pattern: &str, message: impl ToString) -> ConfigError {
    ConfigError::InvalidPattern {
        rule: kind.to_string(),
        pattern: pattern.to_string(),
        message: message.to_string(),
    }
}
