//! Telegram Bot API transport
//!
//! Long-polls `getUpdates` for messages and button presses and sends
//! replies with `sendMessage`.

mod client;
mod error;
mod polling;
pub mod types;

pub use client::TelegramClient;
pub use error::TransportError;
pub use polling::run_polling;
