//! Per-session conversation context.
//!
//! Each web client carries a session id; everything the assistant remembers
//! about a user (their profile and chat history) is scoped to that id.

use crate::{
    llm_client::{ChatMessage, ChatRole},
    profile::UserProfile,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationTurn {
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub profile: UserProfile,
    pub history: Vec<ConversationTurn>,
}

impl SessionContext {
    pub fn push(&mut self, role: ChatRole, content: impl Into<String>) {
        self.history.push(ConversationTurn {
            role,
            content: content.into(),
            created_at: Utc::now(),
        });
    }

    /// The history as chat-completion messages, oldest first.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.history
            .iter()
            .map(|turn| ChatMessage {
                role: turn.role,
                content: turn.content.clone(),
            })
            .collect()
    }
}

struct Entry {
    context: SessionContext,
    last_seen: Instant,
}

/// In-memory map of session id to context, shared across request handlers.
///
/// Sessions untouched for `idle_timeout` are dropped, and at most `capacity`
/// sessions are kept; when full, the least recently seen one is evicted.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, Entry>>>,
    idle_timeout: Duration,
    capacity: usize,
}

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_CAPACITY: usize = 10_000;

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_IDLE_TIMEOUT, DEFAULT_CAPACITY)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(idle_timeout: Duration, capacity: usize) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            idle_timeout,
            capacity: capacity.max(1),
        }
    }

    /// Returns `id` if given, registering it when unseen, or a fresh id otherwise.
    pub async fn ensure(&self, id: Option<Uuid>) -> Uuid {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;

        if let Some(id) = id {
            if let Some(entry) = sessions.get_mut(&id) {
                entry.last_seen = now;
                return id;
            }
        }

        let idle_timeout = self.idle_timeout;
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < idle_timeout);
        while sessions.len() >= self.capacity {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| *id)
            else {
                break;
            };
            debug!(session_id = %oldest, "Evicting least recently seen session");
            sessions.remove(&oldest);
        }

        let id = id.unwrap_or_else(Uuid::new_v4);
        sessions.insert(
            id,
            Entry {
                context: SessionContext::default(),
                last_seen: now,
            },
        );
        id
    }

    /// A snapshot of the session, if it exists.
    pub async fn get(&self, id: Uuid) -> Option<SessionContext> {
        let mut sessions = self.sessions.lock().await;
        sessions.get_mut(&id).map(|entry| {
            entry.last_seen = Instant::now();
            entry.context.clone()
        })
    }

    /// Runs `f` against the session while holding the store lock.
    ///
    /// Keep `f` short; it must not await.
    pub async fn update<F, R>(&self, id: Uuid, f: F) -> Option<R>
    where
        F: FnOnce(&mut SessionContext) -> R,
    {
        let mut sessions = self.sessions.lock().await;
        sessions.get_mut(&id).map(|entry| {
            entry.last_seen = Instant::now();
            f(&mut entry.context)
        })
    }

    /// Drops sessions idle for longer than the timeout; returns how many went.
    pub async fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let idle_timeout = self.idle_timeout;
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < idle_timeout);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
