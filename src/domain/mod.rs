//! Domain layer - Core game rules with no transport or provider dependencies
//!
//! This layer contains:
//! - Entities: the roll event
//! - Value Objects: tokens, check categories, difficulties, actors, personas
//! - Domain Services: command parsing

pub mod entities;
pub mod services;
pub mod value_objects;
