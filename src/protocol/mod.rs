//! Protocol module - events emitted by the gateway.

pub mod events;

pub use events::*;
