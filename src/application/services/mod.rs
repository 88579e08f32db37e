//! Application services - Use case implementations
//!
//! The roll event service drives each round; the narration service and the
//! check generator are its collaborators.

pub mod check_generator;
pub mod llm;
pub mod message_renderer;
pub mod narration_service;
pub mod roll_event_service;

pub use narration_service::NarrationService;
pub use roll_event_service::RollEventService;
