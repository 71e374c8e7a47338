//! Telegram Bot API wire types
//!
//! Only the fields the bot reads are modelled; serde skips the rest.

use crate::session::SessionKey;
use crate::state_machine::{Button, ButtonToken, Event, OutboundMessage};
use serde::{Deserialize, Serialize};

// ── Responses ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<u16>,
    #[serde(default)]
    pub parameters: Option<ResponseParameters>,
    pub result: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseParameters {
    #[serde(default)]
    pub retry_after: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

// ── Requests ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GetUpdatesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    pub timeout: u64,
    pub allowed_updates: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl<'a> SendMessageRequest<'a> {
    pub fn new(chat_id: i64, message: &'a OutboundMessage) -> Self {
        let reply_markup = if message.buttons.is_empty() {
            None
        } else {
            Some(InlineKeyboardMarkup::from_buttons(&message.buttons))
        };
        Self {
            chat_id,
            text: &message.text,
            reply_markup,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    /// One button per row
    pub fn from_buttons(buttons: &[Button]) -> Self {
        Self {
            inline_keyboard: buttons
                .iter()
                .map(|b| {
                    vec![InlineKeyboardButton {
                        text: b.label.clone(),
                        callback_data: b.token.as_str().to_string(),
                    }]
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerCallbackQueryRequest<'a> {
    pub callback_query_id: &'a str,
}

// ── Inbound mapping ─────────────────────────────────────────────────────────

/// An update reduced to what the dialogue needs
#[derive(Debug, PartialEq, Eq)]
pub struct Inbound {
    pub key: SessionKey,
    /// `None` for button presses carrying an unknown token
    pub event: Option<Event>,
    /// Callback queries must be acknowledged even when ignored
    pub callback_id: Option<String>,
}

impl Inbound {
    /// `None` for updates with nothing to act on (stickers, edits, ...)
    pub fn from_update(update: Update) -> Option<Self> {
        if let Some(query) = update.callback_query {
            let chat_id = query
                .message
                .as_ref()
                .map_or(query.from.id, |m| m.chat.id);
            let event = match query.data.as_deref().map(str::parse::<ButtonToken>) {
                Some(Ok(token)) => Some(Event::ButtonSelect(token)),
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "Ignoring callback");
                    None
                }
                None => None,
            };
            return Some(Self {
                key: SessionKey::new(chat_id, query.from.id),
                event,
                callback_id: Some(query.id),
            });
        }

        let message = update.message?;
        let text = message.text?;
        let user_id = message.from.map_or(message.chat.id, |u| u.id);
        Some(Self {
            key: SessionKey::new(message.chat.id, user_id),
            event: Some(Event::from_text(&text)),
            callback_id: None,
        })
    }
}
