//! The deterministic question-routing pipeline.
//!
//! raw message -> normalizer -> intent classifier -> course matcher (in-domain
//! only) -> response assembler. Behaviour is entirely data-driven by an
//! [`AssistantConfig`], so every chat surface shares one implementation.

use crate::{
    curriculum::{Course, CurriculumStore},
    intent::{Intent, classify},
    lexicon::Lexicon,
    matcher::match_courses,
    normalizer::normalize,
    responses::ResponseTable,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{path::Path, sync::Arc};
use tracing::{info, instrument};

/// Keyword tables plus canned answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub lexicon: Lexicon,
    pub responses: ResponseTable,
}

impl AssistantConfig {
    /// Parses a JSON profile; omitted sections keep their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Invalid assistant profile")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read assistant profile {}", path.display()))?;
        Self::from_json(&text)
    }
}

/// The answer to one message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub intent: Intent,
    pub response: String,
    /// Courses considered for the answer; empty for out-of-domain intents.
    pub matched_courses: Vec<Course>,
}

pub struct Assistant {
    config: AssistantConfig,
    store: Arc<dyn CurriculumStore>,
}

impl Assistant {
    pub fn new(config: AssistantConfig, store: Arc<dyn CurriculumStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn CurriculumStore> {
        &self.store
    }

    pub fn normalize(&self, message: &str) -> String {
        normalize(message, &self.config.lexicon.synonyms)
    }

    /// Normalizes and classifies a raw message.
    pub fn classify(&self, message: &str) -> Intent {
        classify(&self.normalize(message), &self.config.lexicon)
    }

    /// Answers a message. `user_name` fills the greeting and exit templates.
    #[instrument(skip(self, user_name))]
    pub async fn reply(&self, message: &str, user_name: Option<&str>) -> Reply {
        let normalized = self.normalize(message);
        let intent = classify(&normalized, &self.config.lexicon);

        let (curriculum, matched_courses) = if intent.is_in_domain() {
            let curriculum = self.store.load().await;
            let matched = match_courses(&normalized, &curriculum, self.config.lexicon.match_mode);
            (curriculum, matched.courses)
        } else {
            Default::default()
        };

        let response =
            self.config
                .responses
                .assemble(&intent, &matched_courses, &curriculum, user_name);
        info!(%intent, courses = matched_courses.len(), "Message routed");

        Reply {
            intent,
            response,
            matched_courses,
        }
    }
}
