//! Shared application state

use std::sync::Arc;

use anyhow::Result;

use crate::application::services::{NarrationService, RollEventService};
use crate::domain::services::CommandParser;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::dispatcher::{UpdateDispatcher, UpdateHandler};
use crate::infrastructure::openai::OpenAiClient;
use crate::infrastructure::random::SystemRandom;
use crate::infrastructure::session::RollEventStore;
use crate::infrastructure::telegram::TelegramClient;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub telegram: TelegramClient,
    /// Live roll events, shared with the sweeper
    pub store: Arc<RollEventStore>,
    pub dispatcher: Arc<dyn UpdateHandler>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let telegram = TelegramClient::new(&config.telegram_api_url, &config.telegram_token);

        // The username lets `/dnd@ThisBot` be recognised in groups
        let parser = match telegram.get_me().await {
            Ok(me) => {
                tracing::info!(
                    "Authorised as bot @{}",
                    me.username.as_deref().unwrap_or("<unnamed>")
                );
                match me.username {
                    Some(username) => CommandParser::new().with_bot_username(username),
                    None => CommandParser::new(),
                }
            }
            Err(e) => {
                tracing::warn!("getMe failed, /dnd@<bot> suffixes won't be stripped: {}", e);
                CommandParser::new()
            }
        };

        let llm = OpenAiClient::new(
            &config.openai_base_url,
            &config.openai_api_key,
            &config.openai_model,
        );

        let store = Arc::new(RollEventStore::new());
        let service = RollEventService::new(
            store.clone(),
            NarrationService::new(llm),
            Arc::new(telegram.clone()),
            SystemRandom,
            parser,
        );

        Ok(Self {
            config,
            telegram,
            store,
            dispatcher: Arc::new(UpdateDispatcher::new(service)),
        })
    }
}
