//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::state_machine::OutboundMessage;
use crate::telegram::{TelegramClient, TransportError};
use async_trait::async_trait;
use std::sync::Arc;

/// Outbound side of the chat platform
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver a message to a chat
    async fn send_message(&self, chat_id: i64, message: &OutboundMessage)
        -> Result<(), TransportError>;
}

// ============================================================================
// Arc implementation for trait objects
// ============================================================================

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send_message(
        &self,
        chat_id: i64,
        message: &OutboundMessage,
    ) -> Result<(), TransportError> {
        (**self).send_message(chat_id, message).await
    }
}

// ============================================================================
// Production Adapter
// ============================================================================

#[async_trait]
impl Transport for TelegramClient {
    async fn send_message(
        &self,
        chat_id: i64,
        message: &OutboundMessage,
    ) -> Result<(), TransportError> {
        self.send_outbound(chat_id, message).await
    }
}
