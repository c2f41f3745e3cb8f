//! repofmt - Evaluate declarative compliance rules against repositories
//!
//! This is the main entry point for the CLI application.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use repofmt::cli::{self, exit_codes, Cli, Commands};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    let ctx = cli.context();

    // Execute the appropriate command
    let result = match cli.command {
        Commands::Check(args) => cli::commands::check::execute(args, &ctx).await,
        Commands::Validate(args) => cli::commands::validate::execute(args, &ctx).await,
        Commands::Init(args) => cli::commands::init::execute(args, &ctx).await,
    };

    // Handle exit codes for CI integration
    match result {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            let code = if e.is_configuration() {
                exit_codes::INVALID_CONFIG
            } else {
                exit_codes::ERROR
            };
            std::process::exit(code);
        }
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}
