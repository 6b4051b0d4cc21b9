//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds all shared
//! resources: the routing pipeline, the LLM client, the website source, the
//! session store and the conversation rate limiter.

use advisor_core::{
    assistant::Assistant, llm_client::LLMClient, rate_limiter::RateLimiter,
    session::SessionStore, website::WebsiteSource,
};
use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tracing::debug;

/// The shared application state, created once at startup and passed to all handlers.
pub struct AppState {
    pub assistant: Arc<Assistant>,
    pub llm_client: Arc<dyn LLMClient>,
    pub website: Arc<dyn WebsiteSource>,
    pub sessions: SessionStore,
    /// Throttles `/api/conversation`, keyed by session id and by client address.
    pub rate_limiter: Mutex<RateLimiter>,
    pub chat_temperature: f32,
}

impl AppState {
    pub fn new(
        assistant: Arc<Assistant>,
        llm_client: Arc<dyn LLMClient>,
        website: Arc<dyn WebsiteSource>,
        sessions: SessionStore,
        rate_limit_window: Duration,
        chat_temperature: f32,
    ) -> Self {
        Self {
            assistant,
            llm_client,
            website,
            sessions,
            rate_limiter: Mutex::new(RateLimiter::new(1, rate_limit_window)),
            chat_temperature,
        }
    }

    /// Drops idle sessions and rate-limiter entries whose window has passed.
    pub async fn sweep(&self) {
        let evicted = self.sessions.evict_idle().await;
        let sessions = self.sessions.len().await;
        let mut limiter = self.rate_limiter.lock().await;
        limiter.prune();
        debug!(
            evicted,
            sessions,
            limited_ids = limiter.tracked_ids(),
            "Swept idle state"
        );
    }
}
