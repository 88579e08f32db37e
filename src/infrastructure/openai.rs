//! OpenAI client (Responses API)
//!
//! The Responses API has shipped several body shapes; text is pulled out of
//! whichever one arrives instead of trusting a single field.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::application::ports::outbound::{
    LlmError, LlmPort, LlmRequest, LlmResponse, MessageRole,
};

/// Upper bound on the raw dump used when no known text shape is present
pub const RAW_DUMP_LIMIT: usize = 2000;

/// Client for OpenAI's Responses API
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        // Narration is short; a minute covers slow completions
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl LlmPort for OpenAiClient {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let api_request = build_request(&self.model, &request);

        let response = self
            .client
            .post(format!("{}/responses", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&api_request)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(LlmError::Unauthorized(error_message(&body)));
        }
        if !status.is_success() {
            return Err(LlmError::RequestFailed(format!(
                "{}: {}",
                status,
                error_message(&body)
            )));
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| LlmError::InvalidResponse(format!("body is not JSON: {}", e)))?;

        let model = value
            .get("model")
            .and_then(Value::as_str)
            .map(str::to_string);
        let extracted = ProviderResponse::from_json(&value, &body);
        if matches!(extracted, ProviderResponse::Unknown(_)) {
            tracing::warn!("Unrecognised response shape from OpenAI, using raw dump");
        }

        Ok(LlmResponse {
            content: extracted.into_text(),
            model,
        })
    }
}

/// The shapes a Responses API body can take, as far as text is concerned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderResponse {
    /// Flattened `output_text` supplied by the provider
    DirectText(String),
    /// Text fragments collected, in order, from the `output` list
    StructuredOutput(Vec<String>),
    /// Neither shape present; holds the raw body
    Unknown(String),
}

impl ProviderResponse {
    pub fn from_json(value: &Value, raw: &str) -> Self {
        if let Some(text) = value
            .get("output_text")
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
        {
            return Self::DirectText(text.to_string());
        }

        if let Some(items) = value.get("output").and_then(Value::as_array) {
            return Self::StructuredOutput(collect_fragments(items));
        }

        Self::Unknown(raw.to_string())
    }

    pub fn into_text(self) -> String {
        match self {
            Self::DirectText(text) => text.trim().to_string(),
            Self::StructuredOutput(parts) => parts.join("\n").trim().to_string(),
            Self::Unknown(raw) => raw.chars().take(RAW_DUMP_LIMIT).collect(),
        }
    }
}

/// Walk `output[]`: bare strings, and each item's `content[]` strings or
/// `text` / `plain_text` fields
fn collect_fragments(items: &[Value]) -> Vec<String> {
    let mut parts = Vec::new();

    for item in items {
        if let Some(text) = item.as_str() {
            parts.push(text.to_string());
            continue;
        }

        let Some(content) = item.get("content").and_then(Value::as_array) else {
            continue;
        };
        for fragment in content {
            match fragment {
                Value::String(text) if !text.trim().is_empty() => parts.push(text.clone()),
                Value::Object(fields) => {
                    if let Some(text) = fields
                        .get("text")
                        .or_else(|| fields.get("plain_text"))
                        .and_then(Value::as_str)
                        .filter(|text| !text.is_empty())
                    {
                        parts.push(text.to_string());
                    }
                }
                _ => {}
            }
        }
    }

    parts
}

/// Prefer the provider's `error.message`, fall back to the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(RAW_DUMP_LIMIT).collect())
}

fn build_request(model: &str, request: &LlmRequest) -> ResponsesRequest {
    let input = request
        .messages
        .iter()
        .map(|msg| InputMessage {
            role: match msg.role {
                MessageRole::System => "system",
                MessageRole::User => "user",
            },
            content: msg.content.clone(),
        })
        .collect();

    ResponsesRequest {
        model: model.to_string(),
        input,
        temperature: request.temperature,
    }
}

// =============================================================================
// OpenAI API types
// =============================================================================

#[derive(Debug, Serialize)]
struct ResponsesRequest {
    model: String,
    input: Vec<InputMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Debug, Serialize)]
struct InputMessage {
    role: &'static str,
    content: String,
}
