//! Update dispatcher - turns Bot API updates into service calls
//!
//! Both delivery modes end here: the long-poll loop and the webhook route
//! hand every `Update` to an `UpdateHandler`. Handler errors are logged and
//! swallowed so one failed round never stops update delivery.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::application::dto::{CommandMessage, RollInteraction};
use crate::application::ports::outbound::{ChatTransportPort, LlmPort, RandomPort};
use crate::application::services::RollEventService;
use crate::domain::value_objects::Actor;
use crate::infrastructure::telegram::{CallbackQuery, Message, TelegramClient, Update, User};

/// Pause before polling again after a failed `getUpdates`
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

#[async_trait]
pub trait UpdateHandler: Send + Sync {
    async fn handle_update(&self, update: Update);
}

/// Routes updates to the roll event service
pub struct UpdateDispatcher<L: LlmPort, T: ChatTransportPort, R: RandomPort> {
    service: RollEventService<L, T, R>,
}

impl<L, T, R> UpdateDispatcher<L, T, R>
where
    L: LlmPort,
    T: ChatTransportPort,
    R: RandomPort,
{
    pub fn new(service: RollEventService<L, T, R>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<L, T, R> UpdateHandler for UpdateDispatcher<L, T, R>
where
    L: LlmPort + 'static,
    T: ChatTransportPort + 'static,
    R: RandomPort + 'static,
{
    async fn handle_update(&self, update: Update) {
        let update_id = update.update_id;

        if let Some(query) = update.callback_query {
            let interaction = to_interaction(query);
            match self.service.handle_roll(interaction).await {
                Ok(outcome) => tracing::debug!("Update {}: {:?}", update_id, outcome),
                Err(e) => tracing::error!("Update {}: roll handling failed: {}", update_id, e),
            }
            return;
        }

        let Some(command) = update.message.and_then(to_command) else {
            return;
        };
        match self.service.handle_command(command).await {
            Ok(outcome) => tracing::debug!("Update {}: {:?}", update_id, outcome),
            Err(e) => tracing::error!("Update {}: command handling failed: {}", update_id, e),
        }
    }
}

fn to_actor(user: User) -> Actor {
    Actor::new(user.id, user.username)
}

/// Text messages from people; service messages and bots are skipped
fn to_command(message: Message) -> Option<CommandMessage> {
    let from = message.from.filter(|user| !user.is_bot)?;
    let text = message.text?;

    Some(CommandMessage {
        chat_id: message.chat.id,
        message_id: message.message_id,
        text,
        from: to_actor(from),
    })
}

fn to_interaction(query: CallbackQuery) -> RollInteraction {
    RollInteraction {
        interaction_id: query.id,
        data: query.data.unwrap_or_default(),
        from: to_actor(query.from),
    }
}

/// Long-poll `getUpdates` forever, handling each update in its own task
pub async fn run_polling(telegram: TelegramClient, handler: Arc<dyn UpdateHandler>) {
    tracing::info!("Starting long polling");
    let mut offset = 0;

    loop {
        let updates = match telegram.get_updates(offset).await {
            Ok(updates) => updates,
            Err(e) => {
                tracing::warn!("getUpdates failed: {}", e);
                tokio::time::sleep(POLL_RETRY_DELAY).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            let handler = handler.clone();
            tokio::spawn(async move {
                handler.handle_update(update).await;
            });
        }
    }
}
