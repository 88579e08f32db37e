//! Strongly-typed identifiers for roll events and chat objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Telegram chat identifier
pub type ChatId = i64;

/// Telegram message identifier (unique within a chat)
pub type MessageId = i64;

/// Telegram user identifier
pub type UserId = i64;

/// Opaque token correlating an inline roll button with its event.
///
/// Formatted as `<unix-millis>_<uuid-v4 hex>`: the time component keeps tokens
/// roughly ordered, the 122 random bits keep two tokens minted in the same
/// millisecond apart. The whole `roll:<token>` payload stays under Telegram's
/// 64-byte callback data limit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventToken(String);

impl EventToken {
    pub fn generate(now: DateTime<Utc>) -> Self {
        Self(format!(
            "{}_{}",
            now.timestamp_millis(),
            Uuid::new_v4().simple()
        ))
    }

    /// Wrap a token received back from the chat platform
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EventToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a message already delivered to a chat, needed to edit it later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

impl MessageRef {
    pub fn new(chat_id: ChatId, message_id: MessageId) -> Self {
        Self {
            chat_id,
            message_id,
        }
    }
}
