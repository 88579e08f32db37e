//! Value objects - Immutable objects defined by their attributes

mod actor;
mod check;
mod ids;
mod persona;

pub use actor::{Actor, ActorIdentity};
pub use check::{CheckCategory, Difficulty};
pub use ids::*;
pub use persona::Persona;
