//! In-memory session store
//!
//! Sessions live only as long as the process. Entries exist while a
//! conversation is in progress and are removed when it ends.

use crate::state_machine::Session;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tokio::sync::RwLock;

/// Identity of one conversation: a user within a chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub chat_id: i64,
    pub user_id: i64,
}

impl SessionKey {
    pub fn new(chat_id: i64, user_id: i64) -> Self {
        Self { chat_id, user_id }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chat_id, self.user_id)
    }
}

/// Map from conversation to its session, safe to share across tasks
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionKey, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session, or a fresh idle one if none is stored
    pub async fn load(&self, key: SessionKey) -> Session {
        self.sessions
            .read()
            .await
            .get(&key)
            .copied()
            .unwrap_or_default()
    }

    /// Store the session; returns whether it is new
    pub async fn save(&self, key: SessionKey, session: Session) -> bool {
        self.sessions.write().await.insert(key, session).is_none()
    }

    /// Remove the session; returns whether one existed
    pub async fn clear(&self, key: SessionKey) -> bool {
        self.sessions.write().await.remove(&key).is_some()
    }

    #[cfg(test)]
    pub async fn contains(&self, key: SessionKey) -> bool {
        self.sessions.read().await.contains_key(&key)
    }

    /// Number of conversations in progress
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
