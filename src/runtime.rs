//! Runtime for executing conversations
//!
//! One task per conversation keeps each user's events sequential while
//! different conversations proceed concurrently.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::ConversationRuntime;
pub use traits::*;

use crate::session::{SessionKey, SessionStore};
use crate::state_machine::{DialogueContext, Event};
use crate::telegram::TelegramClient;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};

/// Type alias for production runtime with concrete implementations
pub type ProductionManager = RuntimeManager<TelegramClient>;

/// Live runtimes by conversation, shared with the runtimes so they can retire
pub(crate) type RuntimeRegistry = Arc<RwLock<HashMap<SessionKey, ConversationHandle>>>;

const EVENT_BUFFER: usize = 32;

/// Manager for all conversation runtimes
pub struct RuntimeManager<T>
where
    T: Transport + 'static,
{
    context: DialogueContext,
    store: Arc<SessionStore>,
    transport: Arc<T>,
    runtimes: RuntimeRegistry,
}

/// Handle to interact with a running conversation
#[derive(Clone)]
pub struct ConversationHandle {
    pub event_tx: mpsc::Sender<Event>,
}

impl<T> RuntimeManager<T>
where
    T: Transport + 'static,
{
    pub fn new(context: DialogueContext, store: Arc<SessionStore>, transport: Arc<T>) -> Self {
        Self {
            context,
            store,
            transport,
            runtimes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    #[cfg(test)]
    pub fn session_store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Route an event to its conversation, starting a runtime if needed
    ///
    /// Never waits on a conversation's queue. A full queue drops the event so
    /// one slow conversation cannot stall the others.
    pub async fn dispatch(&self, key: SessionKey, event: Event) {
        // Fast path: queue onto a live runtime. Sending under the read lock
        // keeps a retiring runtime from missing the event.
        let event = {
            let runtimes = self.runtimes.read().await;
            match runtimes.get(&key) {
                Some(handle) => match handle.event_tx.try_send(event) {
                    Ok(()) => return,
                    Err(TrySendError::Full(_)) => {
                        tracing::warn!(conversation = %key, "Conversation queue full, dropping event");
                        return;
                    }
                    Err(TrySendError::Closed(event)) => event,
                },
                None => event,
            }
        };

        let mut runtimes = self.runtimes.write().await;
        let handle = match runtimes.get(&key) {
            // Another dispatch may have won the race for the write lock
            Some(handle) if !handle.event_tx.is_closed() => handle.clone(),
            _ => {
                let handle = self.spawn_runtime(key);
                runtimes.insert(key, handle.clone());
                handle
            }
        };
        if let Err(e) = handle.event_tx.try_send(event) {
            tracing::error!(conversation = %key, error = %e, "Dropping event, runtime unavailable");
        }
    }

    fn spawn_runtime(&self, key: SessionKey) -> ConversationHandle {
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let runtime = ConversationRuntime::new(
            key,
            self.context,
            self.store.clone(),
            self.transport.clone(),
            self.runtimes.clone(),
            event_rx,
        );
        tokio::spawn(runtime.run());
        ConversationHandle { event_tx }
    }

    /// Number of conversations with a live runtime
    #[cfg(test)]
    pub async fn active_runtimes(&self) -> usize {
        self.runtimes.read().await.len()
    }

    /// Stop all runtimes; they exit once their queued events are handled
    pub async fn shutdown(&self) {
        let count = {
            let mut runtimes = self.runtimes.write().await;
            let count = runtimes.len();
            runtimes.clear();
            count
        };
        tracing::info!(
            runtimes = count,
            open_sessions = self.store.session_count().await,
            "Conversation runtimes stopped"
        );
    }
}
