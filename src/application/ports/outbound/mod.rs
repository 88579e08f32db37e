//! Outbound ports - Interfaces that the application requires from external systems

mod chat_transport_port;
mod llm_port;
mod random_port;

pub use chat_transport_port::{ChatTransportPort, InlineButton, OutgoingMessage, TransportError};
pub use llm_port::{ChatMessage, LlmError, LlmPort, LlmRequest, LlmResponse, MessageRole};
pub use random_port::RandomPort;

#[cfg(test)]
pub use chat_transport_port::MockChatTransportPort;
#[cfg(test)]
pub use llm_port::MockLlmPort;
