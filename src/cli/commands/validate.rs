//! Validate command - Check the configuration without touching any repository

use colored::Colorize;

use super::{CommandContext, ValidateArgs};
use crate::cli::exit_codes;
use crate::error::RepoFmtError;
use crate::rules::{Level, RuleKind};

pub async fn execute(args: ValidateArgs, ctx: &CommandContext) -> Result<i32, RepoFmtError> {
    if args.list_rules {
        for kind in RuleKind::ALL {
            println!("  {:<58} {}", kind.as_str().cyan(), kind.description().dimmed());
        }
        return Ok(exit_codes::SUCCESS);
    }

    let config = ctx.load_config()?;
    let rules = config.validate()?;

    println!(
        "{} Configuration is valid ({} rule(s), concurrency {})",
        "Success:".green().bold(),
        rules.len(),
        config.concurrency
    );
    for rule in &rules {
        let level = match rule.level {
            Level::Error => rule.level.as_str().red(),
            Level::Warning => rule.level.as_str().yellow(),
        };
        let exceptions = if rule.exceptions.is_empty() {
            String::new()
        } else {
            format!(" ({} exception(s))", rule.exceptions.len())
        };
        println!(
            "  {} {:<58} {}{}",
            "•".dimmed(),
            rule.kind().as_str().cyan(),
            level,
            exceptions.dimmed()
        );
    }

    Ok(exit_codes::SUCCESS)
}
