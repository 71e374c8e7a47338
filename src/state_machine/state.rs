//! Dialogue state types

use serde::{Deserialize, Serialize};

/// How the zones are derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Heart-rate reserve: needs both MHR and RHR
    Both,
    /// Straight percentage of MHR
    MhrOnly,
}

/// Dialogue state
///
/// Collected inputs live inside the variants, so a state that needs the max
/// heart rate always carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogueState {
    /// No conversation in progress
    #[default]
    Idle,

    /// Waiting for the user to pick a method (two-path dialogue only)
    ChoosingMethod,

    /// Waiting for max heart rate
    ///
    /// `method` is `None` after a restart in the two-path dialogue, which
    /// takes the MHR-only branch.
    AskMhr { method: Option<Method> },

    /// Waiting for resting heart rate
    AskRhr { mhr: i64 },
}

impl DialogueState {
    pub fn name(&self) -> &'static str {
        match self {
            DialogueState::Idle => "idle",
            DialogueState::ChoosingMethod => "choosing_method",
            DialogueState::AskMhr { .. } => "ask_mhr",
            DialogueState::AskRhr { .. } => "ask_rhr",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, DialogueState::Idle)
    }
}

/// Per-conversation transient state held by the session store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    pub state: DialogueState,
}

impl Session {
    pub fn new(state: DialogueState) -> Self {
        Self { state }
    }

    /// Max heart rate collected so far
    pub fn mhr(&self) -> Option<i64> {
        match self.state {
            DialogueState::AskRhr { mhr } => Some(mhr),
            _ => None,
        }
    }

    /// Method chosen so far
    pub fn method(&self) -> Option<Method> {
        match self.state {
            DialogueState::AskMhr { method } => method,
            DialogueState::AskRhr { .. } => Some(Method::Both),
            DialogueState::Idle | DialogueState::ChoosingMethod => None,
        }
    }
}

/// Which dialogue shape the bot runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueVariant {
    /// Always asks for both MHR and RHR, no buttons
    SinglePath,
    /// Offers a method choice and a restart button
    #[default]
    TwoPath,
}

impl DialogueVariant {
    /// Method a fresh `AskMhr` starts with when entered via restart
    pub fn restart_method(self) -> Option<Method> {
        match self {
            DialogueVariant::SinglePath => Some(Method::Both),
            DialogueVariant::TwoPath => None,
        }
    }

    pub fn offers_buttons(self) -> bool {
        matches!(self, DialogueVariant::TwoPath)
    }
}

/// Context for the dialogue (immutable configuration)
#[derive(Debug, Clone, Copy, Default)]
pub struct DialogueContext {
    pub variant: DialogueVariant,
}

impl DialogueContext {
    pub fn new(variant: DialogueVariant) -> Self {
        Self { variant }
    }
}
