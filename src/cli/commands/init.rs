//! Init command - Initialize a new configuration file

use colored::Colorize;
use std::fs;

use super::{CommandContext, InitArgs};
use crate::cli::exit_codes;
use crate::config::loader::DEFAULT_CONFIG_FILENAME;
use crate::config::{Config, Preset};
use crate::error::{OutputError, RepoFmtError};

pub async fn execute(args: InitArgs, ctx: &CommandContext) -> Result<i32, RepoFmtError> {
    let config_path = ctx.directory.join(DEFAULT_CONFIG_FILENAME);

    if config_path.exists() && !args.force {
        eprintln!(
            "{} Configuration file already exists. Use --force to overwrite.",
            "Error:".red().bold()
        );
        return Ok(exit_codes::ERRORS);
    }

    let preset = match args.preset.as_deref() {
        None => Preset::OpenSource,
        Some(name) => match Preset::from_name(name) {
            Some(preset) => preset,
            None => {
                let known: Vec<_> = Preset::ALL.iter().map(Preset::name).collect();
                eprintln!(
                    "{} Invalid preset '{}'. Available: {}",
                    "Error:".red().bold(),
                    name,
                    known.join(", ")
                );
                return Ok(exit_codes::INVALID_CONFIG);
            }
        },
    };

    let config_content = Config::from_preset(preset).to_toml()?;
    fs::write(&config_path, &config_content).map_err(|e| {
        RepoFmtError::Output(OutputError::FileWrite {
            path: config_path.display().to_string(),
            source: e,
        })
    })?;

    println!(
        "{} Created {} with preset '{}'",
        "Success:".green().bold(),
        DEFAULT_CONFIG_FILENAME.cyan(),
        preset.name().yellow()
    );
    println!("  {}", preset.description().dimmed());

    println!("\nNext steps:");
    println!("  1. Review and customize {}", DEFAULT_CONFIG_FILENAME.cyan());
    println!("  2. Run {} to check it", "repofmt validate".cyan());
    println!("  3. Run {} to evaluate your repositories", "repofmt check".cyan());

    Ok(exit_codes::SUCCESS)
}
