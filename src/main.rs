//! coverage-sync CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;

use coverage_sync::cli::{commands, handle_error, Cli, Commands};
use coverage_sync::domain::models::Config;
use coverage_sync::infrastructure::config::ConfigLoader;
use coverage_sync::infrastructure::logging::{LogConfig, LoggerImpl};

fn load_config(cli: &Cli) -> Result<Config> {
    match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

fn init_logging(config: &Config) -> Result<LoggerImpl> {
    let log_config = LogConfig::try_from(&config.logging)?;
    LoggerImpl::init(&log_config).context("Failed to initialize logging")
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            handle_error(&err, json);
            std::process::exit(1);
        }
    };
    let logger = match init_logging(&config) {
        Ok(logger) => logger,
        Err(err) => {
            handle_error(&err, json);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(args, json).await,
        Commands::Settings(args) => commands::settings::execute(args, &config, json).await,
        Commands::Run(args) => commands::run::execute(args, &config, json).await,
        Commands::Status => commands::status::execute(&config, json).await,
    };

    if let Err(err) = result {
        handle_error(&err, json);
        drop(logger);
        std::process::exit(1);
    }
}
