//! Heart-rate zone dialogue state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{Button, Effect, OutboundMessage};
pub use event::{ButtonToken, Command, Event};
pub use state::{DialogueContext, DialogueState, DialogueVariant, Method, Session};
pub use transition::{transition, TransitionError, TransitionResult};
