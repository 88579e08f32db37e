//! Inbound events - transport-neutral forms of what the chat platform delivers

use crate::domain::value_objects::{Actor, ChatId, EventToken, MessageId};

/// A text message that may carry the trigger command
#[derive(Debug, Clone)]
pub struct CommandMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub text: String,
    pub from: Actor,
}

/// A press on an inline button
#[derive(Debug, Clone)]
pub struct RollInteraction {
    /// Transport handle used to answer the press
    pub interaction_id: String,
    /// Raw callback payload, expected to be `roll:<token>`
    pub data: String,
    pub from: Actor,
}

/// What handling a command message amounted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Not a trigger command
    Ignored,
    /// Trigger without a description; usage hint sent
    MissingDescription,
    /// Event created and announced
    Created(EventToken),
}

/// What handling a button press amounted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollOutcome {
    /// Payload was not a roll button
    Ignored,
    /// No live event for the token
    Expired,
    /// Pressed by someone other than the allowed actor
    NotAllowed,
    /// The single roll was already taken
    AlreadyRolled,
    Resolved { roll: u8, success: bool },
}
