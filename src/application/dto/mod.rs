//! Data transfer objects crossing the application boundary

mod inbound;

pub use inbound::{CommandMessage, CommandOutcome, RollInteraction, RollOutcome};
