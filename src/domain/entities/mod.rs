//! Domain entities - Core business objects with identity

mod roll_event;

pub use roll_event::{parse_roll_callback, NewRollEvent, RollEvent};
