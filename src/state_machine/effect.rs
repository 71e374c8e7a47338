//! Effects produced by state transitions

use super::event::ButtonToken;

/// An inline button offered with a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub token: ButtonToken,
}

impl Button {
    pub fn new(label: impl Into<String>, token: ButtonToken) -> Self {
        Self {
            label: label.into(),
            token,
        }
    }
}

/// Outbound chat message, text plus optional buttons (one per row)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub text: String,
    pub buttons: Vec<Button>,
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: vec![],
        }
    }

    pub fn with_buttons(text: impl Into<String>, buttons: Vec<Button>) -> Self {
        Self {
            text: text.into(),
            buttons,
        }
    }
}

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Deliver a message to the conversation's chat
    SendMessage(OutboundMessage),

    /// Store the new state in the session store
    PersistSession,

    /// Drop the conversation's entry from the session store
    DiscardSession,
}

impl Effect {
    pub fn send_text(text: impl Into<String>) -> Self {
        Effect::SendMessage(OutboundMessage::text(text))
    }

    pub fn send_with_buttons(text: impl Into<String>, buttons: Vec<Button>) -> Self {
        Effect::SendMessage(OutboundMessage::with_buttons(text, buttons))
    }

    /// Outbound message carried by this effect, if any
    #[cfg(test)]
    pub fn message(&self) -> Option<&OutboundMessage> {
        match self {
            Effect::SendMessage(message) => Some(message),
            Effect::PersistSession | Effect::DiscardSession => None,
        }
    }
}
