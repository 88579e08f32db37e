//! LLM port - Interface for the external text-generation service

use async_trait::async_trait;

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    System,
    User,
}

/// A message in the request input
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }
}

/// Text generation request
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    /// Input in order; a style directive goes first as a system message
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature (0.0 - 2.0)
    pub temperature: Option<f64>,
}

impl LlmRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temp: f64) -> Self {
        self.temperature = Some(temp);
        self
    }
}

/// Plain text extracted from the provider's response
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    pub content: String,
    /// Model that served the request, when reported
    pub model: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    RequestFailed(String),
    #[error("LLM rejected credentials: {0}")]
    Unauthorized(String),
    #[error("Invalid LLM response: {0}")]
    InvalidResponse(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmPort: Send + Sync {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError>;
}
