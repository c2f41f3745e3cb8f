//! Check command - Evaluate the configured rules against repositories
//!
//! Repositories come from `--repo` arguments, from a local checkout given
//! with `--local`, or from every repository visible to the authenticated
//! GitHub account.

use colored::Colorize;
use std::sync::Arc;

use super::{CheckArgs, CommandContext, OutputFormat};
use crate::cli::exit_codes;
use crate::cli::output::{JsonOutput, ReportRenderer, TerminalOutput};
use crate::error::{OutputError, RepoFmtError};
use crate::providers::github::GitHubProvider;
use crate::providers::local::LocalProvider;
use crate::providers::{ContentProvider, RepositoryRef};
use crate::rules::engine::RulesEngine;
use crate::rules::RuleKind;

/// Execute the check command
///
/// # Returns
///
/// An exit code: 0 when everything passes, 1 for error-level violations or
/// aborted repositories, 2 for warnings only, 4 for invalid arguments
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the provider cannot be
/// reached or the report cannot be written
pub async fn execute(args: CheckArgs, ctx: &CommandContext) -> Result<i32, RepoFmtError> {
    let mut config = ctx.load_config()?;
    // Fail before any repository is touched
    config.validate()?;

    for name in args.only.iter().chain(args.skip.iter()).flatten() {
        if RuleKind::from_name(name).is_none() {
            eprintln!("{} Unknown rule '{}'", "Error:".red().bold(), name);
            return Ok(exit_codes::INVALID_CONFIG);
        }
    }

    let requested = match parse_repositories(&args.repo) {
        Ok(repositories) => repositories,
        Err(invalid) => {
            eprintln!(
                "{} Invalid repository '{}', expected owner/name",
                "Error:".red().bold(),
                invalid
            );
            return Ok(exit_codes::INVALID_CONFIG);
        }
    };

    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency.max(1);
    }

    let (provider, repositories): (Arc<dyn ContentProvider>, Vec<RepositoryRef>) =
        if let Some(dir) = &args.local {
            let provider = LocalProvider::new(ctx.resolve(dir));
            let repository = provider.repository().clone();
            (Arc::new(provider), vec![repository])
        } else {
            let provider = GitHubProvider::from_env()?;
            let repositories = if requested.is_empty() {
                eprintln!("{}", "Listing repositories...".dimmed());
                provider.list_repositories().await?
            } else {
                requested
            };
            (Arc::new(provider), repositories)
        };

    let mut engine = RulesEngine::new(config);
    if let Some(only) = args.only {
        engine.set_only_rules(only);
    }
    if let Some(skip) = args.skip {
        engine.set_skip_rules(skip);
    }

    eprintln!(
        "{} {} repository(ies)...",
        "Checking".dimmed(),
        repositories.len()
    );
    let results = engine.run(provider, repositories).await;

    let renderer: Box<dyn ReportRenderer> = match args.format {
        OutputFormat::Terminal => Box::new(TerminalOutput::new()),
        OutputFormat::Json => Box::new(JsonOutput::new()),
    };
    let rendered = renderer.render_report(&results)?;

    if let Some(output) = &args.output {
        let path = ctx.resolve(output);
        std::fs::write(&path, &rendered).map_err(|e| {
            RepoFmtError::Output(OutputError::FileWrite {
                path: path.display().to_string(),
                source: e,
            })
        })?;
        eprintln!("Report written to: {}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(exit_codes::for_results(&results))
}

/// Parse `owner/name` arguments, returning the first invalid one on failure
fn parse_repositories(names: &[String]) -> Result<Vec<RepositoryRef>, &str> {
    names
        .iter()
        .map(|name| RepositoryRef::parse(name).ok_or(name.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repositories() {
        let names = vec!["octo/a".to_string(), "octo/b".to_string()];
        let parsed = parse_repositories(&names).unwrap();
        assert_eq!(parsed, vec![RepositoryRef::new("octo", "a"), RepositoryRef::new("octo", "b")]);

        let names = vec!["octo/a".to_string(), "broken".to_string()];
        assert_eq!(parse_repositories(&names).unwrap_err(), "broken");
    }
}
