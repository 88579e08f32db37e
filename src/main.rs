//! DnD Roll Bot - Telegram mini-game of narrated skill checks
//!
//! The bot:
//! - Turns `/dnd [@player] <description>` into a randomly chosen check with
//!   an LLM-narrated introduction and a single roll button
//! - Lets only the designated player press the button, exactly once
//! - Edits the announcement with the d20 result and a narrated outcome

mod application;
mod domain;
mod infrastructure;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::infrastructure::config::{AppConfig, BotMode};
use crate::infrastructure::dispatcher::run_polling;
use crate::infrastructure::http;
use crate::infrastructure::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dnd_roll_bot=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting DnD Roll Bot");

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Telegram API: {}", config.telegram_api_url);
    tracing::info!("  OpenAI: {} ({})", config.openai_base_url, config.openai_model);
    tracing::info!("  Mode: {:?}", config.mode);

    // Initialize application state
    let state = Arc::new(AppState::new(config).await?);
    tracing::info!("Application state initialized");

    // Sweeper (drops events whose button was never pressed)
    let sweeper = {
        let store = state.store.clone();
        let ttl = state.config.event_ttl;
        let interval = state.config.sweep_interval;
        tokio::spawn(async move {
            tracing::info!("Starting stale event sweeper");
            loop {
                tokio::time::sleep(interval).await;
                let removed = store.sweep_older_than(ttl).await;
                if removed > 0 {
                    let live = store.len().await;
                    tracing::info!("Swept {} stale roll events ({} still live)", removed, live);
                }
            }
        })
    };

    // Update delivery
    let poller = match &state.config.mode {
        BotMode::Polling => {
            if let Err(e) = state.telegram.delete_webhook().await {
                tracing::warn!("deleteWebhook failed, polling may be refused: {}", e);
            }
            let telegram = state.telegram.clone();
            let dispatcher = state.dispatcher.clone();
            Some(tokio::spawn(async move {
                run_polling(telegram, dispatcher).await;
            }))
        }
        BotMode::Webhook { url } => {
            state
                .telegram
                .set_webhook(url, state.config.webhook_secret.as_deref())
                .await?;
            tracing::info!("Webhook registered at {}", url);
            None
        }
    };

    // Build the router
    let app = http::create_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.server_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let server = axum::serve(listener, app);

    // Wait for shutdown signal (Ctrl+C)
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received, stopping workers...");
            sweeper.abort();
            if let Some(poller) = poller {
                poller.abort();
            }
            tracing::info!("Workers stopped");
        }
    }

    Ok(())
}
