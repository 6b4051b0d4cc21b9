//! Intent classification by keyword membership.
//!
//! Precedence is fixed: exit, greeting, the domain gate, curriculum questions,
//! then the ordered sub-intent rules. The classifier is a pure function of the
//! normalized text and the lexicon.

use crate::lexicon::Lexicon;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The classified purpose of a user message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Exit,
    /// Nothing in the message touches the course domain.
    OffTopic,
    Price,
    Duration,
    Enrollment,
    /// A general question about which courses exist.
    Catalog,
    /// In-domain, but no more specific rule applied.
    General,
    CurriculumOverview,
    CurriculumDetail {
        /// Curriculum key of the requested course.
        course: String,
    },
}

impl Intent {
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Exit => "exit",
            Intent::OffTopic => "off_topic",
            Intent::Price => "price",
            Intent::Duration => "duration",
            Intent::Enrollment => "enrollment",
            Intent::Catalog => "catalog",
            Intent::General => "general",
            Intent::CurriculumOverview => "curriculum_overview",
            Intent::CurriculumDetail { .. } => "curriculum_detail",
        }
    }

    /// Whether answering needs the course catalogue.
    pub fn is_in_domain(&self) -> bool {
        !matches!(self, Intent::Greeting | Intent::Exit | Intent::OffTopic)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::CurriculumDetail { course } => write!(f, "curriculum_detail({})", course),
            other => f.write_str(other.label()),
        }
    }
}

/// Classifies an already normalized message.
pub fn classify(normalized: &str, lexicon: &Lexicon) -> Intent {
    let mode = lexicon.match_mode;

    if mode.contains_any(normalized, &lexicon.exit) {
        return Intent::Exit;
    }
    if mode.contains_any(normalized, &lexicon.greeting) {
        return Intent::Greeting;
    }
    if !mode.contains_any(normalized, &lexicon.domain) {
        return Intent::OffTopic;
    }

    if mode.contains_any(normalized, &lexicon.curriculum) {
        return lexicon
            .course_aliases
            .iter()
            .find(|alias| mode.contains_any(normalized, &alias.aliases))
            .map(|alias| Intent::CurriculumDetail {
                course: alias.key.clone(),
            })
            .unwrap_or(Intent::CurriculumOverview);
    }

    lexicon
        .rules
        .iter()
        .find(|rule| mode.contains_any(normalized, &rule.keywords))
        .map(|rule| rule.intent.clone())
        .unwrap_or(Intent::General)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexicon::MatchMode, normalizer::normalize};

    fn classify_raw(message: &str) -> Intent {
        let lexicon = Lexicon::default();
        classify(&normalize(message, &lexicon.synonyms), &lexicon)
    }

    #[test]
    fn test_greeting_exit_and_off_topic() {
        assert_eq!(classify_raw("hi"), Intent::Greeting);
        assert_eq!(classify_raw("Good evening!"), Intent::Greeting);
        assert_eq!(classify_raw("bye"), Intent::Exit);
        assert_eq!(classify_raw("what is the weather"), Intent::OffTopic);
    }

    #[test]
    fn test_exit_takes_precedence_over_greeting() {
        assert_eq!(classify_raw("hello and goodbye"), Intent::Exit);
    }

    #[test]
    fn test_price_question() {
        assert_eq!(classify_raw("how much is the python course"), Intent::Price);
        assert_eq!(classify_raw("what are the fees"), Intent::Price);
    }

    #[test]
    fn test_sub_intents_in_rule_order() {
        assert_eq!(classify_raw("how long does it take"), Intent::Duration);
        assert_eq!(classify_raw("I want to sign up"), Intent::Enrollment);
        assert_eq!(classify_raw("what do you teach about devops"), Intent::General);
        assert_eq!(classify_raw("what course should I take"), Intent::Catalog);
        // "python" alone routes to pricing.
        assert_eq!(classify_raw("python"), Intent::Price);
    }

    #[test]
    fn test_curriculum_questions() {
        assert_eq!(
            classify_raw("show me the python curriculam"),
            Intent::CurriculumDetail {
                course: "python".to_string()
            }
        );
        assert_eq!(
            classify_raw("devops syllabus"),
            Intent::CurriculumDetail {
                course: "devops".to_string()
            }
        );
        assert_eq!(
            classify_raw("what modules are there in the course"),
            Intent::CurriculumOverview
        );
    }

    #[test]
    fn test_substring_mode_false_positive_on_greeting() {
        // "machine" contains "hi".
        assert_eq!(classify_raw("tell me about machine learning"), Intent::Greeting);
    }

    #[test]
    fn test_word_mode_avoids_false_positive() {
        let lexicon = Lexicon {
            match_mode: MatchMode::Word,
            ..Lexicon::default()
        };
        let text = normalize("tell me about machine learning", &lexicon.synonyms);
        assert_eq!(classify(&text, &lexicon), Intent::General);
        assert_eq!(classify("hi", &lexicon), Intent::Greeting);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let message = "what is the duration of the cloud course";
        assert_eq!(classify_raw(message), classify_raw(message));
    }

    #[test]
    fn test_intent_serialization() {
        let json = serde_json::to_string(&Intent::CurriculumDetail {
            course: "ai_ml".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"curriculum_detail","course":"ai_ml"}"#);
        let price: Intent = serde_json::from_str(r#"{"kind":"price"}"#).unwrap();
        assert_eq!(price, Intent::Price);
    }

    #[test]
    fn test_display() {
        assert_eq!(Intent::OffTopic.to_string(), "off_topic");
        assert_eq!(
            Intent::CurriculumDetail {
                course: "python".to_string()
            }
            .to_string(),
            "curriculum_detail(python)"
        );
    }
}
