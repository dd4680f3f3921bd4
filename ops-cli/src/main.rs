use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing::{debug, error};

use ops_cli::{commands, App, AppConfig, Cli, CliResult};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("{} {}", "error:".bright_red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    logger_redacted::init(&config.logging)?;

    debug!(version = env!("CARGO_PKG_VERSION"), "Starting mailflow");

    let app = App::bootstrap(&config)?;
    commands::run(&app, cli.command, cli.json).await
}
