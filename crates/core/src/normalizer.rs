//! Input normalisation.
//!
//! Lower-cases the raw message and rewrites known misspellings and phrasings
//! onto the canonical keywords the classifier understands.

use serde::{Deserialize, Serialize};

/// One textual rewrite rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synonym {
    pub from: String,
    pub to: String,
}

impl Synonym {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Lower-cases `input` and applies every rule in table order.
///
/// Rules compose: a later rule sees the output of the earlier ones.
pub fn normalize(input: &str, synonyms: &[Synonym]) -> String {
    synonyms
        .iter()
        .filter(|s| !s.from.is_empty())
        .fold(input.to_lowercase(), |text, s| text.replace(&s.from, &s.to))
}
