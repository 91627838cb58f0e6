//! Chained Songs CLI entry point.

use anyhow::Context;
use clap::Parser;

use chained_songs::cli::{commands, handle_error, Cli, Commands};
use chained_songs::infrastructure::logging::{LogConfig, LoggerImpl};
use chained_songs::ConfigLoader;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    let _logger = match LogConfig::from_settings(&config.logging)
        .context("Invalid logging configuration")
        .and_then(|log_config| LoggerImpl::init(&log_config))
    {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Chain(args) => commands::chain::execute(args, &config, cli.json).await,
        Commands::Clear(args) => commands::clear::execute(args, &config, cli.json).await,
        Commands::List(args) => commands::list::execute(args, &config, cli.json).await,
        Commands::Queue(args) => commands::queue::execute(args, &config, cli.json).await,
        Commands::Enforce(args) => commands::enforce::execute(args, &config, cli.json).await,
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
