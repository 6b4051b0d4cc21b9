//! Response assembly.
//!
//! Maps a classified intent to the text returned to the user. Fixed answers come
//! from a [`ResponseTable`]; curriculum answers are composed from the course data.

use crate::{
    curriculum::{Course, Curriculum},
    intent::Intent,
};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Templates for every canned answer.
///
/// `{name}` is replaced with the user's name and `{course}` with a course's
/// display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseTable {
    pub greeting: String,
    pub exit: String,
    pub price: String,
    pub duration: String,
    pub enrollment: String,
    pub catalog: String,
    pub general: String,
    pub off_topic: String,
    /// Returned whenever assembly fails.
    pub fallback: String,
    pub overview_header: String,
    /// Used for an overview when the catalogue is empty.
    pub overview_fallback: String,
    pub detail_header: String,
    /// One-line descriptions used when a course is missing from the catalogue.
    pub course_fallbacks: IndexMap<String, String>,
    /// Substituted for `{name}` when the user is anonymous.
    pub anonymous_name: String,
}

impl Default for ResponseTable {
    fn default() -> Self {
        let course_fallbacks = [
            (
                "python",
                "Python Programming: Python Fundamentals, Data Structures, OOP, File Handling, Advanced Python, Practical Projects",
            ),
            (
                "cloud_computing",
                "Cloud Computing: Cloud Fundamentals, AWS Services, Azure Services, GCP, DevOps in Cloud",
            ),
            (
                "devops",
                "DevOps Engineering: DevOps Fundamentals, CI/CD, Containerization, Orchestration, Infrastructure as Code, Monitoring",
            ),
            (
                "ai_ml",
                "AI and Machine Learning: AI Fundamentals, Supervised Learning, Unsupervised Learning, Deep Learning, AI Tools",
            ),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            greeting: "Hello {name}! How can I assist you today?".to_string(),
            exit: "Thank you {name}! 'Happy Learning'!".to_string(),
            price: "999/-".to_string(),
            duration: "30 hours".to_string(),
            enrollment: "https://www.skillcapital.ai".to_string(),
            catalog: "Python, Cloud, DevOps".to_string(),
            general: "skillcapital.ai".to_string(),
            off_topic: "I'm here to help with SkillCapital information! For general questions, I can assist you. What would you like to know about our courses, pricing, or enrollment process?".to_string(),
            fallback: "I'm here to help! For SkillCapital questions, visit skillcapital.ai. For other questions, I can assist you with general information.".to_string(),
            overview_header: "Available Courses and Modules:".to_string(),
            overview_fallback: "Python: 6 modules, Cloud: 5 modules, DevOps: 6 modules, AI/ML: 5 modules".to_string(),
            detail_header: "{course} Course Modules:".to_string(),
            course_fallbacks,
            anonymous_name: "User".to_string(),
        }
    }
}

impl ResponseTable {
    /// Produces the final answer. Never fails: errors become [`ResponseTable::fallback`].
    pub fn assemble(
        &self,
        intent: &Intent,
        matched: &[Course],
        curriculum: &Curriculum,
        user_name: Option<&str>,
    ) -> String {
        match self.try_assemble(intent, matched, curriculum, user_name) {
            Ok(text) => text,
            Err(e) => {
                warn!(%intent, error = ?e, "Response assembly failed, using fallback");
                self.fallback.clone()
            }
        }
    }

    fn try_assemble(
        &self,
        intent: &Intent,
        matched: &[Course],
        curriculum: &Curriculum,
        user_name: Option<&str>,
    ) -> Result<String> {
        let name = user_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(self.anonymous_name.as_str());

        Ok(match intent {
            Intent::Greeting => self.greeting.replace("{name}", name),
            Intent::Exit => self.exit.replace("{name}", name),
            Intent::OffTopic => self.off_topic.clone(),
            Intent::Price => self.price.clone(),
            Intent::Duration => self.duration.clone(),
            Intent::Enrollment => self.enrollment.clone(),
            Intent::Catalog => self.catalog.clone(),
            Intent::General => self.general.clone(),
            Intent::CurriculumOverview => self.overview(matched),
            Intent::CurriculumDetail { course } => self.detail(course, curriculum)?,
        })
    }

    fn overview(&self, courses: &[Course]) -> String {
        if courses.is_empty() {
            return self.overview_fallback.clone();
        }
        let lines: Vec<String> = courses
            .iter()
            .map(|c| format!("{}: {}", c.name, c.module_names().join(", ")))
            .collect();
        format!("{}\n{}", self.overview_header, lines.join("\n"))
    }

    fn detail(&self, key: &str, curriculum: &Curriculum) -> Result<String> {
        let Some(course) = curriculum.get(key) else {
            return self
                .course_fallbacks
                .get(key)
                .cloned()
                .with_context(|| format!("No curriculum entry or fallback for course '{}'", key));
        };

        let mut lines = vec![self.detail_header.replace("{course}", &course.name)];
        for module in &course.modules {
            lines.push(format!("{} ({})", module.name, module.duration));
            lines.extend(module.topics.iter().map(|topic| format!("  • {}", topic)));
        }
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Curriculum {
        Curriculum::from_json(
            r#"{"courses": {
                "python": {
                    "name": "Python",
                    "curriculum": [{"module": "Python Fundamentals", "duration": "5 hours", "topics": ["Variables", "Loops"]}]
                },
                "devops": {
                    "name": "DevOps Engineering",
                    "curriculum": [
                        {"module": "CI/CD", "duration": "6 hours", "topics": []},
                        {"module": "Containers", "duration": "4 hours", "topics": []}
                    ]
                }
            }}"#,
        )
        .unwrap()
    }

    fn all_courses(curriculum: &Curriculum) -> Vec<Course> {
        curriculum.courses().cloned().collect()
    }

    #[test]
    fn test_fixed_answers_ignore_courses() {
        let table = ResponseTable::default();
        let curriculum = fixture();
        let courses = all_courses(&curriculum);
        let none: Vec<Course> = Vec::new();
        for matched in [courses.as_slice(), none.as_slice()] {
            assert_eq!(table.assemble(&Intent::Price, matched, &curriculum, None), "999/-");
            assert_eq!(table.assemble(&Intent::Duration, matched, &curriculum, None), "30 hours");
        }
        assert_eq!(
            table.assemble(&Intent::Enrollment, &[], &curriculum, None),
            "https://www.skillcapital.ai"
        );
    }

    #[test]
    fn test_greeting_and_exit_use_name() {
        let table = ResponseTable::default();
        let curriculum = Curriculum::default();
        assert_eq!(
            table.assemble(&Intent::Greeting, &[], &curriculum, Some("Ada")),
            "Hello Ada! How can I assist you today?"
        );
        assert_eq!(
            table.assemble(&Intent::Exit, &[], &curriculum, Some("")),
            "Thank you User! 'Happy Learning'!"
        );
    }

    #[test]
    fn test_curriculum_detail_lists_modules_and_topics() {
        let table = ResponseTable::default();
        let curriculum = fixture();
        let text = table.assemble(
            &Intent::CurriculumDetail {
                course: "python".to_string(),
            },
            &[],
            &curriculum,
            None,
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Python Course Modules:",
                "Python Fundamentals (5 hours)",
                "  • Variables",
                "  • Loops",
            ]
        );
    }

    #[test]
    fn test_curriculum_detail_falls_back_to_description() {
        let table = ResponseTable::default();
        let text = table.assemble(
            &Intent::CurriculumDetail {
                course: "ai_ml".to_string(),
            },
            &[],
            &fixture(),
            None,
        );
        assert!(text.starts_with("AI and Machine Learning: AI Fundamentals"));
    }

    #[test]
    fn test_unknown_course_is_swallowed_into_fallback() {
        let table = ResponseTable::default();
        let text = table.assemble(
            &Intent::CurriculumDetail {
                course: "rust".to_string(),
            },
            &[],
            &fixture(),
            None,
        );
        assert_eq!(text, table.fallback);
    }

    #[test]
    fn test_overview_lists_matched_courses() {
        let table = ResponseTable::default();
        let curriculum = fixture();
        let text = table.assemble(
            &Intent::CurriculumOverview,
            &all_courses(&curriculum),
            &curriculum,
            None,
        );
        assert_eq!(
            text,
            "Available Courses and Modules:\nPython: Python Fundamentals\nDevOps Engineering: CI/CD, Containers"
        );
    }

    #[test]
    fn test_overview_without_courses_uses_fallback() {
        let table = ResponseTable::default();
        let text = table.assemble(&Intent::CurriculumOverview, &[], &Curriculum::default(), None);
        assert_eq!(text, table.overview_fallback);
    }

    #[test]
    fn test_table_override_from_json() {
        let table: ResponseTable = serde_json::from_str(r#"{"price": "49 EUR"}"#).unwrap();
        assert_eq!(
            table.assemble(&Intent::Price, &[], &Curriculum::default(), None),
            "49 EUR"
        );
        assert_eq!(table.duration, "30 hours");
    }
}
