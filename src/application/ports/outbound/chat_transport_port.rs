//! Chat transport port - the message bus the bot talks through
//!
//! The transport is a black box offering three operations: send a message
//! (optionally with one inline roll button), edit a previously sent message
//! in place, and answer a button press with a transient notice.

use async_trait::async_trait;

use crate::domain::value_objects::{ChatId, MessageId, MessageRef};

/// Inline button attached to an outgoing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    /// Opaque payload echoed back when the button is pressed
    pub callback_data: String,
}

/// A message to deliver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub reply_to: Option<MessageId>,
    pub button: Option<InlineButton>,
}

impl OutgoingMessage {
    pub fn new(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            reply_to: None,
            button: None,
        }
    }

    pub fn replying_to(mut self, message_id: MessageId) -> Self {
        self.reply_to = Some(message_id);
        self
    }

    pub fn with_button(mut self, button: InlineButton) -> Self {
        self.button = Some(button);
        self
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("Transport request failed: {0}")]
    RequestFailed(String),
    #[error("Chat API error {code}: {description}")]
    Api { code: i64, description: String },
    #[error("Invalid transport response: {0}")]
    InvalidResponse(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatTransportPort: Send + Sync {
    /// Deliver a message, returning a reference usable for later edits
    async fn send_message(&self, message: OutgoingMessage) -> Result<MessageRef, TransportError>;

    /// Replace the text of a delivered message and drop its inline keyboard
    async fn edit_message(&self, target: MessageRef, text: String) -> Result<(), TransportError>;

    /// Answer a button press; `None` acknowledges without a notice
    async fn answer_interaction(
        &self,
        interaction_id: String,
        text: Option<String>,
    ) -> Result<(), TransportError>;
}
