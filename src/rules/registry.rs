//! Rule registry
//!
//! Every rule is one variant of [`Rule`], carrying its validated options.
//! Dispatch is a plain match from variant to the category function that
//! implements it.

use super::categories::{dependencies, docs, files, manifests, workflows};
use super::results::Violation;
use super::schema::{
    BadgeOptions, ContainsOptions, Exceptions, ExistsOptions, HasKeysOptions, PyprojectOrderOptions,
    RequirementsOrderOptions, SectionOptions, TimeoutMinutesOptions,
};
use super::RuleKind;
use crate::cache::RuleContext;

/// A registry rule with its options
#[derive(Debug, Clone)]
pub enum Rule {
    FileExists(ExistsOptions),
    FileForbidden(ExistsOptions),
    FileContains(ContainsOptions),
    FileNotContains(ContainsOptions),
    JsonHasKeys(HasKeysOptions),
    YamlHasKeys(HasKeysOptions),
    LicenseExists(ExistsOptions),
    ReadmeExists(ExistsOptions),
    ReadmeHasBadges(BadgeOptions),
    ReadmeHasSection(SectionOptions),
    GithubActionsTimeoutMinutes(TimeoutMinutesOptions),
    PyprojectDependenciesAlphabeticalOrder(PyprojectOrderOptions),
    RequirementsTxtDependenciesAlphabeticalOrder(RequirementsOrderOptions),
}

impl Rule {
    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::FileExists(_) => RuleKind::FileExists,
            Rule::FileForbidden(_) => RuleKind::FileForbidden,
            Rule::FileContains(_) => RuleKind::FileContains,
            Rule::FileNotContains(_) => RuleKind::FileNotContains,
            Rule::JsonHasKeys(_) => RuleKind::JsonHasKeys,
            Rule::YamlHasKeys(_) => RuleKind::YamlHasKeys,
            Rule::LicenseExists(_) => RuleKind::LicenseExists,
            Rule::ReadmeExists(_) => RuleKind::ReadmeExists,
            Rule::ReadmeHasBadges(_) => RuleKind::ReadmeHasBadges,
            Rule::ReadmeHasSection(_) => RuleKind::ReadmeHasSection,
            Rule::GithubActionsTimeoutMinutes(_) => RuleKind::GithubActionsTimeoutMinutes,
            Rule::PyprojectDependenciesAlphabeticalOrder(_) => {
                RuleKind::PyprojectDependenciesAlphabeticalOrder
            }
            Rule::RequirementsTxtDependenciesAlphabeticalOrder(_) => {
                RuleKind::RequirementsTxtDependenciesAlphabeticalOrder
            }
        }
    }

    /// Run the rule against one repository
    ///
    /// Existence rules apply `exceptions` to each candidate path before
    /// building their single combined violation. Every other rule reports
    /// per file, so its violations are dropped by subject.
    pub async fn evaluate(&self, ctx: &RuleContext, exceptions: &Exceptions) -> Vec<Violation> {
        let violations = match self {
            Rule::FileExists(o) | Rule::LicenseExists(o) | Rule::ReadmeExists(o) => {
                return files::file_exists(ctx, o, exceptions).await;
            }
            Rule::FileForbidden(o) => return files::file_forbidden(ctx, o, exceptions).await,
            Rule::FileContains(o) => files::file_contains(ctx, o).await,
            Rule::FileNotContains(o) => files::file_not_contains(ctx, o).await,
            Rule::JsonHasKeys(o) => manifests::json_has_keys(ctx, o).await,
            Rule::YamlHasKeys(o) => manifests::yaml_has_keys(ctx, o).await,
            Rule::ReadmeHasBadges(o) => docs::readme_has_badges(ctx, o).await,
            Rule::ReadmeHasSection(o) => docs::readme_has_section(ctx, o).await,
            Rule::GithubActionsTimeoutMinutes(o) => workflows::timeout_minutes(ctx, o).await,
            Rule::PyprojectDependenciesAlphabeticalOrder(o) => {
                dependencies::pyproject_order(ctx, o).await
            }
            Rule::RequirementsTxtDependenciesAlphabeticalOrder(o) => {
                dependencies::requirements_order(ctx, o).await
            }
        };

        violations
            .into_iter()
            .filter(|v| !exceptions.is_excepted(&v.subject))
            .collect()
    }
}
