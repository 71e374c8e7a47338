//! Pure state transition function

use super::effect::{Button, Effect};
use super::event::{ButtonToken, Command, Event};
use super::state::{DialogueContext, DialogueState, DialogueVariant, Method};
use crate::zones::{zones_hrr, zones_simple, ZoneTable};
use thiserror::Error;

const WELCOME: &str = "👋 Welcome! Let's calculate your heart rate zones.";
const CHOOSE_METHOD_PROMPT: &str = "How would you like to calculate them?";
pub(crate) const MHR_PROMPT: &str = "Please enter your Max Heart Rate (MHR) in BPM:";
pub(crate) const RHR_PROMPT: &str = "👍 Now enter your Resting Heart Rate (RHR) in BPM:";
pub(crate) const INVALID_MHR: &str = "❌ Please enter a valid number for MHR.";
pub(crate) const INVALID_RHR: &str = "❌ Please enter a valid number for RHR.";
pub(crate) const CANCELLED: &str = "❎ Conversation cancelled.";
pub(crate) const HRR_HEADER: &str = "✅ Here are your personalized heart rate zones (HRR-based):";
pub(crate) const MHR_HEADER: &str = "✅ Here are your heart rate zones (MHR-based):";
const RESTART_PROMPT: &str = "Want to try different numbers?";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: DialogueState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: DialogueState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Events the current state has no use for; the runtime drops them
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("No conversation in progress")]
    NoConversation,
    #[error("Unexpected input while in {state}")]
    UnexpectedInput { state: &'static str },
    #[error("Unknown command: /{0}")]
    UnknownCommand(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs, with no I/O.
pub fn transition(
    state: &DialogueState,
    context: &DialogueContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    let variant = context.variant;

    match (state, event) {
        // ============================================================
        // Commands
        // ============================================================
        (_, Event::Command(Command::Start)) => Ok(welcome(variant)),

        (DialogueState::Idle, Event::Command(Command::Cancel)) => {
            Ok(TransitionResult::new(DialogueState::Idle))
        }

        (_, Event::Command(Command::Cancel)) => Ok(TransitionResult::new(DialogueState::Idle)
            .with_effect(Effect::DiscardSession)
            .with_effect(Effect::send_text(CANCELLED))),

        (_, Event::Command(Command::Other(name))) => Err(TransitionError::UnknownCommand(name)),

        // ============================================================
        // Buttons
        // ============================================================

        // Restart skips the method choice and starts over at MHR
        (_, Event::ButtonSelect(ButtonToken::Restart)) => Ok(TransitionResult::new(
            DialogueState::AskMhr {
                method: variant.restart_method(),
            },
        )
        .with_effect(Effect::PersistSession)
        .with_effect(Effect::send_text(MHR_PROMPT))),

        (DialogueState::ChoosingMethod, Event::ButtonSelect(ButtonToken::Both)) => {
            Ok(choose_method(Method::Both))
        }

        (DialogueState::ChoosingMethod, Event::ButtonSelect(ButtonToken::MhrOnly)) => {
            Ok(choose_method(Method::MhrOnly))
        }

        // ============================================================
        // Numeric input
        // ============================================================
        (DialogueState::AskMhr { method }, Event::TextInput(text)) => {
            let Some(mhr) = parse_bpm(&text) else {
                return Ok(TransitionResult::new(*state).with_effect(Effect::send_text(INVALID_MHR)));
            };
            if *method == Some(Method::Both) {
                Ok(TransitionResult::new(DialogueState::AskRhr { mhr })
                    .with_effect(Effect::PersistSession)
                    .with_effect(Effect::send_text(RHR_PROMPT)))
            } else {
                Ok(finish(variant, &zones_simple(mhr), MHR_HEADER))
            }
        }

        (DialogueState::AskRhr { mhr }, Event::TextInput(text)) => match parse_bpm(&text) {
            Some(rhr) => Ok(finish(variant, &zones_hrr(*mhr, rhr), HRR_HEADER)),
            None => Ok(TransitionResult::new(*state).with_effect(Effect::send_text(INVALID_RHR))),
        },

        // ============================================================
        // Ignored
        // ============================================================
        (DialogueState::Idle, Event::TextInput(_) | Event::ButtonSelect(_)) => {
            Err(TransitionError::NoConversation)
        }

        (state, Event::TextInput(_) | Event::ButtonSelect(_)) => {
            Err(TransitionError::UnexpectedInput {
                state: state.name(),
            })
        }
    }
}

fn welcome(variant: DialogueVariant) -> TransitionResult {
    match variant {
        DialogueVariant::TwoPath => TransitionResult::new(DialogueState::ChoosingMethod)
            .with_effect(Effect::PersistSession)
            .with_effect(Effect::send_with_buttons(
                format!("{WELCOME}\n\n{CHOOSE_METHOD_PROMPT}"),
                vec![
                    Button::new("❤️ MHR + RHR (HRR-based)", ButtonToken::Both),
                    Button::new("📈 MHR only", ButtonToken::MhrOnly),
                ],
            )),
        DialogueVariant::SinglePath => TransitionResult::new(DialogueState::AskMhr {
            method: Some(Method::Both),
        })
        .with_effect(Effect::PersistSession)
        .with_effect(Effect::send_text(format!("{WELCOME}\n\n{MHR_PROMPT}"))),
    }
}

fn choose_method(method: Method) -> TransitionResult {
    TransitionResult::new(DialogueState::AskMhr {
        method: Some(method),
    })
    .with_effect(Effect::PersistSession)
    .with_effect(Effect::send_text(MHR_PROMPT))
}

/// Emit the table, reset the conversation, and offer a restart if buttons are on
fn finish(variant: DialogueVariant, table: &ZoneTable, header: &str) -> TransitionResult {
    let result = TransitionResult::new(DialogueState::Idle).with_effects([
        Effect::DiscardSession,
        Effect::send_text(table.render(header)),
    ]);
    if variant.offers_buttons() {
        result.with_effect(Effect::send_with_buttons(
            RESTART_PROMPT,
            vec![Button::new("🔄 Start over", ButtonToken::Restart)],
        ))
    } else {
        result
    }
}

/// Integer parse of user input; surrounding whitespace is ignored
pub(crate) fn parse_bpm(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}
