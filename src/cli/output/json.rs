//! JSON output formatting

use chrono::Utc;
use serde::Serialize;

use super::ReportRenderer;
use crate::error::{OutputError, RepoFmtError};
use crate::rules::results::{RepositoryResult, RunSummary};

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct Report<'a> {
    version: &'static str,
    generated_at: String,
    summary: RunSummary,
    repositories: &'a [RepositoryResult],
}

impl ReportRenderer for JsonOutput {
    fn render_report(&self, results: &[RepositoryResult]) -> Result<String, RepoFmtError> {
        let report = Report {
            version: env!("CARGO_PKG_VERSION"),
            generated_at: Utc::now().to_rfc3339(),
            summary: RunSummary::from_results(results),
            repositories: results,
        };

        serde_json::to_string_pretty(&report)
            .map_err(|e| RepoFmtError::Output(OutputError::Serialize(e)))
    }
}
