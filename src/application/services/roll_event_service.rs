//! Roll event service - the lifecycle of one mini-game round
//!
//! An event moves through three states:
//!
//! - `CREATED`: a `/dnd` command arrived; intro narrated, check rolled up,
//!   event stored
//! - `AWAITING_ROLL`: the announcement with its roll button is delivered
//! - `RESOLVED`: the allowed actor pressed the button once; the message is
//!   edited with the outcome and the event is deleted
//!
//! Provider failures never block a round: a missing intro leaves the
//! announcement without narration, and a missing outcome is replaced by a
//! placeholder so the committed roll is always published.

use std::sync::Arc;

use crate::application::dto::{CommandMessage, CommandOutcome, RollInteraction, RollOutcome};
use crate::application::ports::outbound::{
    ChatTransportPort, InlineButton, LlmPort, OutgoingMessage, RandomPort, TransportError,
};
use crate::application::services::check_generator::{
    pick_category, pick_difficulty, pick_persona, roll_d20,
};
use crate::application::services::llm::OutcomeContext;
use crate::application::services::message_renderer::{
    not_allowed_notice, render_announcement, render_resolution, roll_ack, ALREADY_ROLLED_NOTICE,
    EXPIRED_NOTICE, OUTCOME_PLACEHOLDER, ROLL_BUTTON_LABEL, USAGE_HINT,
};
use crate::application::services::narration_service::NarrationService;
use crate::domain::entities::{parse_roll_callback, NewRollEvent};
use crate::domain::services::CommandParser;
use crate::domain::value_objects::{ActorIdentity, EventToken};
use crate::infrastructure::session::RollEventStore;

#[derive(Debug, thiserror::Error)]
pub enum RollEventError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("Roll event {0} vanished before it was announced")]
    Vanished(EventToken),
}

/// Service driving roll events from command to resolution
pub struct RollEventService<L: LlmPort, T: ChatTransportPort, R: RandomPort> {
    store: Arc<RollEventStore>,
    narration: NarrationService<L>,
    transport: Arc<T>,
    random: R,
    parser: CommandParser,
}

impl<L, T, R> RollEventService<L, T, R>
where
    L: LlmPort,
    T: ChatTransportPort,
    R: RandomPort,
{
    pub fn new(
        store: Arc<RollEventStore>,
        narration: NarrationService<L>,
        transport: Arc<T>,
        random: R,
        parser: CommandParser,
    ) -> Self {
        Self {
            store,
            narration,
            transport,
            random,
            parser,
        }
    }

    /// Handle an inbound text message; only the trigger command does anything
    pub async fn handle_command(
        &self,
        message: CommandMessage,
    ) -> Result<CommandOutcome, RollEventError> {
        if !self.parser.is_trigger(&message.text) {
            return Ok(CommandOutcome::Ignored);
        }

        let parsed = self.parser.parse(&message.text);
        let Some(description) = parsed.description else {
            tracing::debug!("Command without description in chat {}", message.chat_id);
            self.transport
                .send_message(
                    OutgoingMessage::new(message.chat_id, USAGE_HINT)
                        .replying_to(message.message_id),
                )
                .await?;
            return Ok(CommandOutcome::MissingDescription);
        };
        let target_mention = parsed.target_mention;

        let persona = pick_persona(&self.random);
        let intro_text = match self
            .narration
            .generate_intro(persona, target_mention.as_deref(), &description)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Announcing event without intro: {}", e);
                String::new()
            }
        };

        let check_category = pick_category(&self.random);
        let difficulty = pick_difficulty(&self.random);
        let allowed_actor = ActorIdentity::allowed_for(target_mention.as_deref(), &message.from);

        let token = self
            .store
            .create(NewRollEvent {
                chat_id: message.chat_id,
                difficulty,
                check_category,
                target_mention,
                description,
                intro_text,
                allowed_actor,
                persona,
            })
            .await;

        let event = self
            .store
            .get(&token)
            .await
            .ok_or_else(|| RollEventError::Vanished(token.clone()))?;

        let outgoing = OutgoingMessage::new(event.chat_id, render_announcement(&event))
            .replying_to(message.message_id)
            .with_button(InlineButton {
                label: ROLL_BUTTON_LABEL.to_string(),
                callback_data: event.callback_data(),
            });

        let message_ref = match self.transport.send_message(outgoing).await {
            Ok(message_ref) => message_ref,
            Err(e) => {
                // Nobody can ever press a button that was never delivered
                self.store.delete(&token).await;
                return Err(e.into());
            }
        };
        self.store.set_message_ref(&token, message_ref).await;

        tracing::info!(
            "Roll event {} announced in chat {}: {} DC {} for {}",
            token,
            event.chat_id,
            event.check_category,
            event.difficulty,
            event.allowed_actor
        );

        Ok(CommandOutcome::Created(token))
    }

    /// Handle a press on an inline button
    pub async fn handle_roll(
        &self,
        interaction: RollInteraction,
    ) -> Result<RollOutcome, RollEventError> {
        let Some(token) = parse_roll_callback(&interaction.data) else {
            self.answer(&interaction, None).await?;
            return Ok(RollOutcome::Ignored);
        };

        let Some(event) = self.store.get(&token).await else {
            if self.store.is_retired(&token).await {
                self.answer(&interaction, Some(ALREADY_ROLLED_NOTICE.to_string()))
                    .await?;
                return Ok(RollOutcome::AlreadyRolled);
            }
            tracing::debug!("Press on unknown roll event {}", token);
            self.answer(&interaction, Some(EXPIRED_NOTICE.to_string()))
                .await?;
            return Ok(RollOutcome::Expired);
        };

        if !event.allowed_actor.matches(&interaction.from) {
            tracing::debug!(
                "User {} tried to roll event {} reserved for {}",
                interaction.from.id,
                token,
                event.allowed_actor
            );
            self.answer(&interaction, Some(not_allowed_notice(&event.allowed_actor)))
                .await?;
            return Ok(RollOutcome::NotAllowed);
        }

        if event.is_used()
            || !self
                .store
                .mark_used(&token, interaction.from.identity())
                .await
        {
            self.answer(&interaction, Some(ALREADY_ROLLED_NOTICE.to_string()))
                .await?;
            return Ok(RollOutcome::AlreadyRolled);
        }

        // From here on the roll is committed; failures are logged, not returned early
        let roll = roll_d20(&self.random);
        let success = event.difficulty.is_met_by(roll);
        tracing::info!(
            "Roll event {}: rolled {} against DC {} ({})",
            token,
            roll,
            event.difficulty,
            if success { "success" } else { "failure" }
        );

        if let Err(e) = self.answer(&interaction, Some(roll_ack(roll))).await {
            tracing::warn!("Failed to acknowledge roll for event {}: {}", token, e);
        }

        let context = OutcomeContext {
            success,
            check_category: event.check_category,
            difficulty: event.difficulty,
            roll,
            target_mention: event.target_mention.clone(),
            description: event.description.clone(),
        };
        let outcome_text = match self.narration.generate_outcome(event.persona, &context).await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => OUTCOME_PLACEHOLDER.to_string(),
            Err(e) => {
                tracing::warn!("Resolving event {} without outcome narration: {}", token, e);
                OUTCOME_PLACEHOLDER.to_string()
            }
        };

        // A very fast press can overtake recording the message reference
        let message_ref = match event.message_ref {
            Some(message_ref) => Some(message_ref),
            None => self.store.get(&token).await.and_then(|e| e.message_ref),
        };

        let edit_result = match message_ref {
            Some(target) => {
                let text = render_resolution(&event, roll, success, &outcome_text);
                self.transport.edit_message(target, text).await
            }
            None => {
                tracing::warn!("Roll event {} has no delivered message to edit", token);
                Ok(())
            }
        };

        self.store.delete(&token).await;
        edit_result?;

        Ok(RollOutcome::Resolved { roll, success })
    }

    async fn answer(
        &self,
        interaction: &RollInteraction,
        text: Option<String>,
    ) -> Result<(), TransportError> {
        self.transport
            .answer_interaction(interaction.interaction_id.clone(), text)
            .await
    }
}
