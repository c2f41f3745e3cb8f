//! Terminal output formatting with colors

use colored::Colorize;

use super::ReportRenderer;
use crate::error::RepoFmtError;
use crate::rules::results::{Level, RepositoryResult, RunSummary};

pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }

    fn format_header(&self, results: &[RepositoryResult]) -> String {
        format!(
            "\n{} v{}\n\n{} {}\n",
            "repofmt".cyan().bold(),
            env!("CARGO_PKG_VERSION"),
            "Repositories:".dimmed(),
            results.len().to_string().white().bold()
        )
    }

    fn format_repository(&self, result: &RepositoryResult) -> String {
        let mut output = format!(
            "\n{}\n  {}\n\n",
            "━".repeat(50).dimmed(),
            result.repository.bold()
        );

        if let Some(error) = &result.error {
            output.push_str(&format!("  {} {}\n", "✖ FAILED".red().bold(), error));
            return output;
        }

        if result.results.is_empty() {
            output.push_str(&format!("  {}\n", "✓ All rules passed".green()));
            return output;
        }

        for level in [Level::Error, Level::Warning] {
            for outcome in result.results.iter().filter(|o| o.level() == level) {
                let label = match level {
                    Level::Error => "❌ ERROR".red().bold(),
                    Level::Warning => "⚠️  WARNING".yellow().bold(),
                };
                output.push_str(&format!("  {} [{}]\n", label, outcome.rule.as_str().cyan()));
                for message in outcome.messages() {
                    output.push_str(&format!("    {} {}\n", "•".dimmed(), message));
                }
            }
        }

        output
    }

    fn format_summary(&self, results: &[RepositoryResult]) -> String {
        let summary = RunSummary::from_results(results);
        let mut output = format!("\n{}\n{}\n\n", "━".repeat(50).dimmed(), "  SUMMARY".bold());

        output.push_str(&format!(
            "Repositories: {} │ Errors: {} │ Warnings: {} │ Failed: {}\n",
            summary.repositories.to_string().bold(),
            summary.errors.to_string().red().bold(),
            summary.warnings.to_string().yellow().bold(),
            summary.failed.to_string().red().bold()
        ));

        output
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for TerminalOutput {
    fn render_report(&self, results: &[RepositoryResult]) -> Result<String, RepoFmtError> {
        let mut output = self.format_header(results);
        for result in results {
            output.push_str(&self.format_repository(result));
        }
        output.push_str(&self.format_summary(results));
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::results::RuleOutcome;
    use crate::rules::RuleKind;

    #[test]
    fn test_errors_listed_before_warnings() {
        let mut result = RepositoryResult::new("octo/demo");
        result.add_outcome(RuleOutcome::new(
            RuleKind::ReadmeHasBadges,
            Level::Warning,
            vec!["README.md: no badges found".to_string()],
        ));
        result.add_outcome(RuleOutcome::new(
            RuleKind::LicenseExists,
            Level::Error,
            vec!["LICENSE.md not found".to_string()],
        ));

        let rendered = TerminalOutput::new().render_report(&[result]).unwrap();

        let license = rendered.find("LICENSE.md not found").unwrap();
        let badges = rendered.find("README.md: no badges found").unwrap();
        assert!(license < badges);
        assert!(rendered.contains("octo/demo"));
        assert!(rendered.contains("SUMMARY"));
    }

    #[test]
    fn test_failed_and_clean_repositories() {
        let results = vec![
            RepositoryResult::new("octo/clean"),
            RepositoryResult::failed("octo/broken", "Rule readme/typo not found"),
        ];

        let rendered = TerminalOutput::new().render_report(&results).unwrap();
        assert!(rendered.contains("All rules passed"));
        assert!(rendered.contains("Rule readme/typo not found"));
    }
}
