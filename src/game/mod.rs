//! Transport-free game core: cards, room state machine, and shared identifiers.

pub mod cards;
pub mod room;
pub mod types;
