//! Roll event entity - one round of the mini-game, from command to resolution

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{
    ActorIdentity, ChatId, CheckCategory, Difficulty, EventToken, MessageRef, Persona,
};

/// Everything fixed at creation time; the store adds the token and bookkeeping
#[derive(Debug, Clone)]
pub struct NewRollEvent {
    pub chat_id: ChatId,
    pub difficulty: Difficulty,
    pub check_category: CheckCategory,
    pub target_mention: Option<String>,
    pub description: String,
    pub intro_text: String,
    pub allowed_actor: ActorIdentity,
    pub persona: Persona,
}

/// A live roll event awaiting (or undergoing) resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollEvent {
    pub token: EventToken,
    pub chat_id: ChatId,
    pub difficulty: Difficulty,
    pub check_category: CheckCategory,
    /// Mention as typed, including the `@`
    pub target_mention: Option<String>,
    pub description: String,
    pub intro_text: String,
    /// The only identity allowed to press the roll button
    pub allowed_actor: ActorIdentity,
    /// One-shot latch, set by the store exactly once
    pub used_by: Option<ActorIdentity>,
    /// Set right after the initial message is delivered
    pub message_ref: Option<MessageRef>,
    pub persona: Persona,
    pub created_at: DateTime<Utc>,
}

impl RollEvent {
    pub fn new(token: EventToken, data: NewRollEvent, created_at: DateTime<Utc>) -> Self {
        Self {
            token,
            chat_id: data.chat_id,
            difficulty: data.difficulty,
            check_category: data.check_category,
            target_mention: data.target_mention,
            description: data.description,
            intro_text: data.intro_text,
            allowed_actor: data.allowed_actor,
            used_by: None,
            message_ref: None,
            persona: data.persona,
            created_at,
        }
    }

    pub fn is_used(&self) -> bool {
        self.used_by.is_some()
    }

    /// Callback payload carried by the inline roll button
    pub fn callback_data(&self) -> String {
        format!("{}{}", ROLL_CALLBACK_PREFIX, self.token)
    }
}

/// Prefix of the inline button payload, `roll:<token>`
const ROLL_CALLBACK_PREFIX: &str = "roll:";

/// Extract the token from a button payload; anything else is not ours
pub fn parse_roll_callback(data: &str) -> Option<EventToken> {
    data.strip_prefix(ROLL_CALLBACK_PREFIX)
        .filter(|token| !token.is_empty())
        .map(EventToken::from_raw)
}
