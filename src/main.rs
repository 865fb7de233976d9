mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::warn;

use keyreg_core::AppConfig;

use crate::cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config_str = std::fs::read_to_string(&cli.config).unwrap_or_else(|_| {
        warn!(path = %cli.config, "config file not found, using defaults");
        include_str!("../config/default.toml").to_string()
    });
    let mut config = AppConfig::from_toml(&config_str)?;
    config.apply_env_overrides()?;

    match cli.command {
        Commands::Run => commands::run_pipeline(config).await?,
        Commands::Submit { email } => commands::run_submit(config, &email).await?,
        Commands::Mailbox => commands::run_mailbox(config).await?,
        Commands::Poll { address, password } => {
            commands::run_poll(config, &address, password).await?
        }
    }

    Ok(())
}
