//! Telegram Bot API client
//!
//! Implements the chat transport over plain HTTPS calls to
//! `<api>/bot<token>/<method>`, plus the update-delivery methods used by the
//! poller and the webhook registration at startup.

pub mod markdown;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::application::ports::outbound::{ChatTransportPort, OutgoingMessage, TransportError};
use crate::domain::value_objects::MessageRef;

pub use types::{CallbackQuery, Chat, Message, Update, User};

use types::{
    AnswerCallbackQueryParams, ApiResponse, DeleteWebhookParams, EditMessageTextParams,
    GetUpdatesParams, InlineKeyboardButton, InlineKeyboardMarkup, ReplyParameters,
    SendMessageParams, SetWebhookParams, ALLOWED_UPDATES,
};

const PARSE_MODE: &str = "MarkdownV2";

/// Seconds Telegram holds a `getUpdates` call open
pub const LONG_POLL_TIMEOUT_SECS: u64 = 30;

/// Client for the Telegram Bot API
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str) -> Self {
        // Must outlive the long poll
        let client = Client::builder()
            .timeout(Duration::from_secs(LONG_POLL_TIMEOUT_SECS + 30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        }
    }

    /// Call a Bot API method and unwrap its `result`
    async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, TransportError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, method))
            .json(params)
            .send()
            .await
            .map_err(|e| TransportError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body: ApiResponse<R> = response
            .json()
            .await
            .map_err(|e| TransportError::InvalidResponse(format!("{}: {}", method, e)))?;

        if !body.ok {
            return Err(TransportError::Api {
                code: body.error_code.unwrap_or_else(|| i64::from(status.as_u16())),
                description: body.description.unwrap_or_default(),
            });
        }

        body.result
            .ok_or_else(|| TransportError::InvalidResponse(format!("{}: missing result", method)))
    }

    /// Identity of the bot behind the token
    pub async fn get_me(&self) -> Result<User, TransportError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-poll for updates starting at `offset`
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TransportError> {
        let params = GetUpdatesParams {
            offset,
            timeout: LONG_POLL_TIMEOUT_SECS,
            allowed_updates: ALLOWED_UPDATES.to_vec(),
        };
        self.call("getUpdates", &params).await
    }

    pub async fn set_webhook(&self, url: &str, secret: Option<&str>) -> Result<(), TransportError> {
        let params = SetWebhookParams {
            url: url.to_string(),
            secret_token: secret.map(str::to_string),
            allowed_updates: ALLOWED_UPDATES.to_vec(),
        };
        self.call::<_, bool>("setWebhook", &params).await.map(|_| ())
    }

    /// Remove any registered webhook so `getUpdates` is allowed
    pub async fn delete_webhook(&self) -> Result<(), TransportError> {
        let params = DeleteWebhookParams {
            drop_pending_updates: false,
        };
        self.call::<_, bool>("deleteWebhook", &params).await.map(|_| ())
    }
}

#[async_trait]
impl ChatTransportPort for TelegramClient {
    async fn send_message(&self, message: OutgoingMessage) -> Result<MessageRef, TransportError> {
        let mut params = SendMessageParams {
            chat_id: message.chat_id,
            text: markdown::stylize_actions(&message.text),
            parse_mode: Some(PARSE_MODE),
            reply_parameters: message.reply_to.map(|message_id| ReplyParameters {
                message_id,
                allow_sending_without_reply: true,
            }),
            reply_markup: message.button.map(|button| InlineKeyboardMarkup {
                inline_keyboard: vec![vec![InlineKeyboardButton {
                    text: button.label,
                    callback_data: button.callback_data,
                }]],
            }),
        };

        let sent: Message = match self.call::<_, Message>("sendMessage", &params).await {
            Err(e) if is_entity_error(&e) => {
                tracing::warn!("sendMessage rejected markup ({}), resending as plain text", e);
                params.text = message.text;
                params.parse_mode = None;
                self.call::<_, Message>("sendMessage", &params).await?
            }
            other => other?,
        };

        Ok(MessageRef::new(sent.chat.id, sent.message_id))
    }

    async fn edit_message(&self, target: MessageRef, text: String) -> Result<(), TransportError> {
        let mut params = EditMessageTextParams {
            chat_id: target.chat_id,
            message_id: target.message_id,
            text: markdown::stylize_actions(&text),
            parse_mode: Some(PARSE_MODE),
            reply_markup: InlineKeyboardMarkup::empty(),
        };

        // Result is the edited Message, or `true` for inline messages
        match self.call::<_, Value>("editMessageText", &params).await {
            Err(e) if is_entity_error(&e) => {
                tracing::warn!("editMessageText rejected markup ({}), resending as plain text", e);
                params.text = text;
                params.parse_mode = None;
                self.call::<_, Value>("editMessageText", &params).await?;
            }
            other => {
                other?;
            }
        }

        Ok(())
    }

    async fn answer_interaction(
        &self,
        interaction_id: String,
        text: Option<String>,
    ) -> Result<(), TransportError> {
        let params = AnswerCallbackQueryParams {
            callback_query_id: interaction_id,
            text,
        };
        self.call::<_, bool>("answerCallbackQuery", &params)
            .await
            .map(|_| ())
    }
}

/// Telegram's 400 for markup it failed to parse
fn is_entity_error(error: &TransportError) -> bool {
    matches!(
        error,
        TransportError::Api { code: 400, description } if description.contains("can't parse entities")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trims_slash() {
        let client = TelegramClient::new("https://api.telegram.org/", "123:abc");

        assert_eq!(client.base_url, "https://api.telegram.org/bot123:abc");
    }

    #[test]
    fn test_entity_error_detection() {
        let parse_failure = TransportError::Api {
            code: 400,
            description: "Bad Request: can't parse entities: unexpected end".to_string(),
        };
        let other = TransportError::Api {
            code: 400,
            description: "Bad Request: message is not modified".to_string(),
        };

        assert!(is_entity_error(&parse_failure));
        assert!(!is_entity_error(&other));
        assert!(!is_entity_error(&TransportError::RequestFailed("timeout".into())));
    }

    #[test]
    fn test_api_error_envelope() {
        let raw = r#"{"ok": false, "error_code": 403, "description": "Forbidden: bot was kicked"}"#;
        let body: ApiResponse<Message> = serde_json::from_str(raw).unwrap();

        assert!(!body.ok);
        assert!(body.result.is_none());
        assert_eq!(body.error_code, Some(403));
    }
}
