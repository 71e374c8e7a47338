//! Heart-rate zone bot
//!
//! A Telegram bot that walks a user through entering max (and optionally
//! resting) heart rate and replies with five training zones.

mod config;
mod runtime;
mod session;
mod state_machine;
mod telegram;
mod zones;

use config::BotConfig;
use runtime::ProductionManager;
use session::SessionStore;
use state_machine::DialogueContext;
use std::sync::Arc;
use telegram::{run_polling, TelegramClient};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hr_zones_bot=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = BotConfig::from_env()?;
    tracing::info!(
        variant = ?config.variant,
        poll_timeout_secs = config.poll_timeout.as_secs(),
        "Configuration loaded"
    );

    let client = Arc::new(TelegramClient::new(&config)?);
    let store = Arc::new(SessionStore::new());
    let manager: Arc<ProductionManager> = Arc::new(ProductionManager::new(
        DialogueContext::new(config.variant),
        store,
        client.clone(),
    ));

    // Stop polling on Ctrl-C
    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                return;
            }
            tracing::info!("Shutdown requested");
            shutdown.cancel();
        });
    }

    tracing::info!("Bot is running");
    let result = run_polling(client, manager.clone(), config.poll_timeout, shutdown).await;

    manager.shutdown().await;
    result?;
    Ok(())
}
