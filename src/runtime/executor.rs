//! Conversation runtime executor

use super::traits::Transport;
use super::RuntimeRegistry;
use crate::session::{SessionKey, SessionStore};
use crate::state_machine::{transition, DialogueContext, Effect, Event, Session};
use crate::telegram::TransportError;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Runs one conversation, handling its events strictly in arrival order
pub struct ConversationRuntime<T>
where
    T: Transport + 'static,
{
    key: SessionKey,
    context: DialogueContext,
    store: Arc<SessionStore>,
    transport: Arc<T>,
    registry: RuntimeRegistry,
    event_rx: mpsc::Receiver<Event>,
}

impl<T> ConversationRuntime<T>
where
    T: Transport + 'static,
{
    pub fn new(
        key: SessionKey,
        context: DialogueContext,
        store: Arc<SessionStore>,
        transport: Arc<T>,
        registry: RuntimeRegistry,
        event_rx: mpsc::Receiver<Event>,
    ) -> Self {
        Self {
            key,
            context,
            store,
            transport,
            registry,
            event_rx,
        }
    }

    pub async fn run(mut self) {
        tracing::debug!(conversation = %self.key, "Starting conversation runtime");

        while let Some(event) = self.event_rx.recv().await {
            self.process_event(event).await;
            if self.try_retire().await {
                break;
            }
        }

        tracing::debug!(conversation = %self.key, "Conversation runtime stopped");
    }

    pub(crate) async fn process_event(&mut self, event: Event) {
        let session = self.store.load(self.key).await;

        // Pure state transition
        let result = match transition(&session.state, &self.context, event) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(
                    conversation = %self.key,
                    state = session.state.name(),
                    reason = %e,
                    "Ignoring event"
                );
                return;
            }
        };

        let new_session = Session::new(result.new_state);
        if new_session.state != session.state {
            tracing::debug!(
                conversation = %self.key,
                from = session.state.name(),
                to = new_session.state.name(),
                method = ?new_session.method(),
                mhr = ?new_session.mhr(),
                "State transition"
            );
        }

        for effect in result.effects {
            if let Err(e) = self.execute_effect(effect, new_session).await {
                // The dialogue has already moved on; a lost message is not retried
                tracing::error!(
                    conversation = %self.key,
                    error = %e,
                    retryable = e.is_retryable(),
                    "Failed to deliver message"
                );
            }
        }
    }

    /// Leave the registry once the conversation is idle with nothing queued
    ///
    /// Dispatch only sends while holding the registry read lock, so checking
    /// the queue under the write lock cannot miss an event. The next event
    /// for this key starts a fresh runtime.
    async fn try_retire(&mut self) -> bool {
        if !self.store.load(self.key).await.state.is_idle() {
            return false;
        }
        let mut runtimes = self.registry.write().await;
        if !self.event_rx.is_empty() {
            return false;
        }
        runtimes.remove(&self.key);
        self.event_rx.close();
        true
    }

    async fn execute_effect(&self, effect: Effect, session: Session) -> Result<(), TransportError> {
        match effect {
            Effect::PersistSession => {
                if self.store.save(self.key, session).await {
                    tracing::info!(conversation = %self.key, "Conversation started");
                }
                Ok(())
            }

            Effect::DiscardSession => {
                if self.store.clear(self.key).await {
                    tracing::info!(conversation = %self.key, "Conversation ended");
                }
                Ok(())
            }

            Effect::SendMessage(message) => {
                self.transport
                    .send_message(self.key.chat_id, &message)
                    .await
            }
        }
    }
}
