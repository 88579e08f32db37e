//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Telegram: Bot API client implementing the chat transport
//! - OpenAI: Responses API client implementing the LLM port
//! - Dispatcher: update routing and the long-poll loop
//! - HTTP: health check and webhook routes
//! - Session: in-memory roll event store
//! - Config: Application configuration
//! - State: Shared application state

pub mod config;
pub mod dispatcher;
pub mod http;
pub mod openai;
pub mod random;
pub mod session;
pub mod state;
pub mod telegram;
