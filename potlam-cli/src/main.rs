//! Potlam operator console
//!
//! Thin command-line front end over `potlam-client`. Configuration comes from
//! flags, the environment and an optional `.env` file.

mod cli;
mod commands;
mod logger;

use clap::Parser;
use potlam_client::ClientConfig;

use crate::cli::Cli;
use crate::commands::Console;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap reads the environment
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    logger::init_logger(&cli.log_level, cli.json_logs, cli.log_dir.as_deref())?;

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config.base_url = url;
    }
    tracing::info!(
        api = %config.base_url,
        environment = ?config.environment,
        "Potlam console starting"
    );

    let console = Console::new(&config, cli.credentials)?;
    let result = console.run(cli.command).await;
    tracing::debug!(cookies = ?console.cookie_names(), "Session cookies at exit");

    if let Err(e) = &result {
        tracing::error!(error = %e, "Command failed");
    }
    result
}
