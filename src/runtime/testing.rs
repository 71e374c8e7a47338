//! Mock implementations for testing
//!
//! These mocks enable runtime testing without real I/O.

use super::traits::Transport;
use crate::state_machine::OutboundMessage;
use crate::telegram::TransportError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::mpsc;

// ============================================================================
// Mock Transport
// ============================================================================

/// Mock transport that records every message and can be told to fail
pub struct MockTransport {
    sent_tx: mpsc::UnboundedSender<(i64, OutboundMessage)>,
    sent_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<(i64, OutboundMessage)>>,
    /// Record of all messages in send order
    pub sent: Mutex<Vec<(i64, OutboundMessage)>>,
    failures: Mutex<VecDeque<TransportError>>,
    /// Held by tests to stall delivery
    gate: tokio::sync::Mutex<()>,
}

impl MockTransport {
    pub fn new() -> Self {
        let (sent_tx, sent_rx) = mpsc::unbounded_channel();
        Self {
            sent_tx,
            sent_rx: tokio::sync::Mutex::new(sent_rx),
            sent: Mutex::new(Vec::new()),
            failures: Mutex::new(VecDeque::new()),
            gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Make the next send fail with this error
    pub fn queue_failure(&self, error: TransportError) {
        self.failures.lock().unwrap().push_back(error);
    }

    /// Block every send until the returned guard is dropped
    pub async fn hold(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.gate.lock().await
    }

    /// Get recorded messages
    pub fn recorded(&self) -> Vec<(i64, OutboundMessage)> {
        self.sent.lock().unwrap().clone()
    }

    /// Texts sent to one chat, in order
    pub fn texts_for(&self, chat_id: i64) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == chat_id)
            .map(|(_, m)| m.text.clone())
            .collect()
    }

    /// Wait for the next delivered message (panics after one second)
    pub async fn next_message(&self) -> (i64, OutboundMessage) {
        let mut rx = self.sent_rx.lock().await;
        tokio::time::timeout(std::time::Duration::from_secs(1), rx.recv())
            .await
            .expect("timed out waiting for a message")
            .expect("mock transport channel closed")
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_message(
        &self,
        chat_id: i64,
        message: &OutboundMessage,
    ) -> Result<(), TransportError> {
        drop(self.gate.lock().await);
        if let Some(error) = self.failures.lock().unwrap().pop_front() {
            return Err(error);
        }
        self.sent.lock().unwrap().push((chat_id, message.clone()));
        let _ = self.sent_tx.send((chat_id, message.clone()));
        Ok(())
    }
}
