use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gem_exchange::app::Lobby;
use gem_exchange::card_game::DeckCatalog;
use gem_exchange::config::{Args, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from(Args::parse());

    let filter = match config.log_filter.as_deref() {
        Some(filter) => EnvFilter::new(filter),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let catalog = DeckCatalog::load(&config.decks_path)
        .with_context(|| format!("loading {}", config.decks_path.display()))?;

    let mut lobby = Lobby::bind(config.bind).await?;
    tracing::info!(addr = %config.bind, "listening for players");

    tokio::select! {
        res = lobby.fill() => res?,
        _ = shutdown_signal() => {
            tracing::info!("server stopped");
            return Ok(());
        }
    }

    tokio::select! {
        outcome = lobby.start_match(&catalog, config.seed) => {
            let outcome = outcome?;
            tracing::info!(?outcome, "server stopped");
        }
        _ = shutdown_signal() => {
            tracing::info!("server stopped during match");
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    tracing::info!("received shutdown signal");
}
