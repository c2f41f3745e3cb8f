//! Output formatting module for CLI

mod json;
mod terminal;

pub use json::JsonOutput;
pub use terminal::TerminalOutput;

use crate::error::RepoFmtError;
use crate::rules::results::RepositoryResult;

/// Trait for rendering the results of a run
pub trait ReportRenderer {
    fn render_report(&self, results: &[RepositoryResult]) -> Result<String, RepoFmtError>;
}
