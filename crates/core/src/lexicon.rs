//! Keyword tables that drive message routing.
//!
//! Every list here is data rather than code so that a deployment can swap in
//! its own vocabulary through a JSON profile without touching the pipeline.

use crate::{intent::Intent, normalizer::Synonym};
use serde::{Deserialize, Serialize};

/// How keyword and course-name membership is tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Plain substring search. "ai" matches inside "detail".
    #[default]
    Substring,
    /// The term must be delimited by non-alphanumeric characters or the text edges.
    Word,
}

impl MatchMode {
    pub fn contains(self, text: &str, term: &str) -> bool {
        if term.is_empty() {
            return false;
        }
        match self {
            MatchMode::Substring => text.contains(term),
            MatchMode::Word => text.match_indices(term).any(|(start, _)| {
                let before = text[..start].chars().next_back();
                let after = text[start + term.len()..].chars().next();
                !before.is_some_and(char::is_alphanumeric)
                    && !after.is_some_and(char::is_alphanumeric)
            }),
        }
    }

    pub fn contains_any<S: AsRef<str>>(self, text: &str, terms: &[S]) -> bool {
        terms.iter().any(|term| self.contains(text, term.as_ref()))
    }
}

/// Words that point a curriculum question at one specific course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseAlias {
    /// Key of the course in the curriculum file.
    pub key: String,
    pub aliases: Vec<String>,
}

/// An in-domain sub-intent triggered by any of its keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRule {
    pub keywords: Vec<String>,
    pub intent: Intent,
}

/// The complete vocabulary used by the normalizer and the classifier.
///
/// Rules and aliases are evaluated in list order and the first hit wins, so
/// reordering entries changes routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    pub match_mode: MatchMode,
    pub synonyms: Vec<Synonym>,
    pub exit: Vec<String>,
    pub greeting: Vec<String>,
    pub domain: Vec<String>,
    pub curriculum: Vec<String>,
    pub course_aliases: Vec<CourseAlias>,
    pub rules: Vec<IntentRule>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for Lexicon {
    fn default() -> Self {
        let synonyms = [
            ("curriculam", "curriculum"),
            ("trainning", "training"),
            ("enrolment", "enrollment"),
            ("skill capital", "skillcapital"),
            ("skill-capital", "skillcapital"),
            ("skill_capital", "skillcapital"),
            ("how much", "price"),
            ("costs", "cost"),
            ("fees", "fee"),
            ("hours", "duration"),
            ("time", "duration"),
            ("how long", "duration"),
            ("sign up", "enroll"),
            ("join", "enroll"),
            ("i want enroll", "enroll"),
            ("i want to enroll", "enroll"),
            ("how to enroll", "enroll"),
        ]
        .into_iter()
        .map(|(from, to)| Synonym::new(from, to))
        .collect();

        let alias = |key: &str, aliases: &[&str]| CourseAlias {
            key: key.to_string(),
            aliases: words(aliases),
        };
        let rule = |keywords: &[&str], intent: Intent| IntentRule {
            keywords: words(keywords),
            intent,
        };

        Self {
            match_mode: MatchMode::Substring,
            synonyms,
            exit: words(&["exit", "quit", "bye", "goodbye"]),
            greeting: words(&[
                "hi",
                "hello",
                "hey",
                "good morning",
                "good afternoon",
                "good evening",
                "morning",
                "afternoon",
                "evening",
                "hii",
                "helloo",
                "heyy",
                "hiii",
                "hellooo",
            ]),
            domain: words(&[
                "skillcapital",
                "skill capital",
                "skill-capital",
                "skill_capital",
                "course",
                "courses",
                "curriculum",
                "curriculam",
                "learn",
                "learning",
                "training",
                "trainning",
                "enroll",
                "enrollment",
                "enrolment",
                "register",
                "registration",
                "sign up",
                "join",
                "price",
                "pricing",
                "cost",
                "costs",
                "fee",
                "fees",
                "duration",
                "time",
                "hours",
                "how long",
                "python",
                "cloud",
                "devops",
                "ai",
                "machine learning",
                "programming",
                "coding",
                "development",
            ]),
            curriculum: words(&[
                "content",
                "curriculum",
                "curriculam",
                "modules",
                "syllabus",
                "topics",
            ]),
            course_aliases: vec![
                alias("python", &["python"]),
                alias("cloud_computing", &["cloud"]),
                alias("devops", &["devops"]),
                alias("ai_ml", &["ai", "machine learning"]),
            ],
            rules: vec![
                rule(&["price", "cost", "fee", "how much"], Intent::Price),
                rule(&["duration", "time", "hours", "how long"], Intent::Duration),
                rule(&["enroll", "join", "register", "sign up"], Intent::Enrollment),
                rule(&["python"], Intent::Price),
                rule(&["course", "learn", "training"], Intent::Catalog),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_mode_matches_inside_words() {
        assert!(MatchMode::Substring.contains("tell me the details", "ai"));
        assert!(MatchMode::Substring.contains("ai", "ai"));
    }

    #[test]
    fn test_word_mode_requires_boundaries() {
        assert!(!MatchMode::Word.contains("tell me the details", "ai"));
        assert!(MatchMode::Word.contains("what is ai?", "ai"));
        assert!(MatchMode::Word.contains("ai", "ai"));
        assert!(MatchMode::Word.contains("the ai course", "ai course"));
        // A later occurrence can still satisfy the boundary check.
        assert!(MatchMode::Word.contains("detail about ai", "ai"));
    }

    #[test]
    fn test_empty_term_never_matches() {
        assert!(!MatchMode::Substring.contains("anything", ""));
        assert!(!MatchMode::Word.contains("anything", ""));
    }

    #[test]
    fn test_lexicon_partial_override_keeps_defaults() {
        let lexicon: Lexicon =
            serde_json::from_str(r#"{"match_mode": "word", "exit": ["ciao"]}"#).unwrap();
        assert_eq!(lexicon.match_mode, MatchMode::Word);
        assert_eq!(lexicon.exit, vec!["ciao"]);
        assert_eq!(lexicon.greeting, Lexicon::default().greeting);
        assert_eq!(lexicon.rules.len(), 5);
    }
}
