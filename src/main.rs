//! stake-converter entry point.
//!
//! Connects to the currency assignment feed and answers conversion requests until interrupted.

use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use stake_converter::config::AppConfig;
use stake_converter::conversion::Converter;
use stake_converter::rates;
use stake_converter::ws::Supervisor;

/// Exchange Rate Conversion Service
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Show request and response messages
    #[arg(long)]
    show_messages: bool,
}

#[tokio::main]
async fn main() -> stake_converter::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = AppConfig::from_env()?;
    config.ws.show_messages = cli.show_messages;
    tracing::info!(feed = %config.feed_url, rates = %config.rate_api_url, "starting stake-converter");

    let rates = rates::Client::new(&config.rate_api_url, config.rates)?;
    let supervisor = Supervisor::new(&config.feed_url, config.ws, Converter::new(rates));

    let shutdown = CancellationToken::new();
    let interrupt = shutdown.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Service interrupted. Shutting down.");
                interrupt.cancel();
            }
            Err(e) => tracing::error!(error = %e, "Unable to listen for ctrl-c"),
        }
    });

    supervisor.run(shutdown).await;

    Ok(())
}
