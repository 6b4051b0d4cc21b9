//! Course Curriculum Store
//!
//! This module provides read-only access to the static course catalogue that the
//! assistant consults when answering course, module, and pricing questions. The
//! catalogue lives in a JSON document on disk and is re-read on every request, so
//! edits to the file are picked up without restarting the service.

use anyhow::{Context, Result};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

/// A single module inside a course, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    #[serde(rename = "module")]
    pub name: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// A course definition as stored in the curriculum file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// The identifier the course is stored under (e.g., `cloud_computing`).
    #[serde(skip)]
    pub key: String,
    /// The display name shown to users and used for name matching.
    pub name: String,
    #[serde(rename = "curriculum", default)]
    pub modules: Vec<Module>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

impl Course {
    /// Names of all modules, in display order.
    pub fn module_names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name.as_str()).collect()
    }
}

/// The full course catalogue, keyed by course identifier.
///
/// Iteration follows the order of the source document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Curriculum {
    courses: IndexMap<String, Course>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CourseCollection {
    Keyed(IndexMap<String, Course>),
    Listed(Vec<Course>),
}

/// The accepted top-level shapes. Deserialized directly so map order survives.
#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Wrapped { courses: CourseCollection },
    Bare(CourseCollection),
}

impl Curriculum {
    /// Builds a curriculum from courses, deriving keys from names where missing.
    pub fn from_courses(courses: impl IntoIterator<Item = Course>) -> Self {
        let courses = courses
            .into_iter()
            .map(|mut course| {
                if course.key.is_empty() {
                    course.key = key_from_name(&course.name);
                }
                (course.key.clone(), course)
            })
            .collect();
        Self { courses }
    }

    /// Parses a curriculum document.
    ///
    /// Accepts `{"courses": {...}}`, `{"courses": [...]}`, or a bare map of
    /// course key to course.
    pub fn from_json(text: &str) -> Result<Self> {
        let document: Document =
            serde_json::from_str(text).context("Curriculum is not a valid course document")?;
        let collection = match document {
            Document::Wrapped { courses } => courses,
            Document::Bare(courses) => courses,
        };

        Ok(match collection {
            CourseCollection::Keyed(map) => Self {
                courses: map
                    .into_iter()
                    .map(|(key, mut course)| {
                        course.key = key.clone();
                        (key, course)
                    })
                    .collect(),
            },
            CourseCollection::Listed(list) => Self::from_courses(list),
        })
    }

    pub fn get(&self, key: &str) -> Option<&Course> {
        self.courses.get(key)
    }

    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.courses.values()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

/// Derives a course key from its display name ("Cloud Computing" -> "cloud_computing").
pub fn key_from_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Defines the contract for any source of the course catalogue.
///
/// Implementations never fail: a catalogue that cannot be read is reported as
/// empty so that callers fall back to their canned answers.
#[async_trait]
pub trait CurriculumStore: Send + Sync {
    async fn load(&self) -> Curriculum;
}

/// Reads the catalogue from a JSON file on every call.
pub struct FileCurriculumStore {
    path: PathBuf,
}

impl FileCurriculumStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read(&self) -> Result<Curriculum> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read curriculum file {}", self.path.display()))?;
        Curriculum::from_json(&text)
    }
}

#[async_trait]
impl CurriculumStore for FileCurriculumStore {
    async fn load(&self) -> Curriculum {
        match self.read().await {
            Ok(curriculum) => {
                debug!(path = %self.path.display(), courses = curriculum.len(), "Loaded curriculum");
                curriculum
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = ?e, "Failed to load curriculum, using an empty one");
                Curriculum::default()
            }
        }
    }
}

/// An in-memory catalogue, used by the CLI tests and HTTP tests.
pub struct StaticCurriculumStore {
    curriculum: Curriculum,
}

impl StaticCurriculumStore {
    pub fn new(curriculum: Curriculum) -> Self {
        Self { curriculum }
    }
}

#[async_trait]
impl CurriculumStore for StaticCurriculumStore {
    async fn load(&self) -> Curriculum {
        self.curriculum.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FIXTURE: &str = r#"{
        "courses": {
            "python": {
                "name": "Python",
                "curriculum": [
                    {"module": "Python Fundamentals", "duration": "5 hours", "topics": ["Variables", "Loops"]}
                ]
            },
            "cloud_computing": {
                "name": "Cloud Computing",
                "curriculum": [
                    {"module": "Cloud Fundamentals", "duration": "4 hours", "topics": ["IaaS"]},
                    {"module": "AWS Services", "duration": "6 hours", "topics": ["EC2", "S3"]}
                ],
                "outcome": "Cloud Practitioner"
            }
        }
    }"#;

    #[test]
    fn test_parse_keyed_courses() {
        let curriculum = Curriculum::from_json(FIXTURE).unwrap();
        assert_eq!(curriculum.len(), 2);

        let python = curriculum.get("python").unwrap();
        assert_eq!(python.key, "python");
        assert_eq!(python.name, "Python");
        assert_eq!(python.modules[0].name, "Python Fundamentals");
        assert_eq!(python.modules[0].duration, "5 hours");
        assert_eq!(python.modules[0].topics, vec!["Variables", "Loops"]);
        assert_eq!(python.outcome, None);

        let cloud = curriculum.get("cloud_computing").unwrap();
        assert_eq!(cloud.outcome.as_deref(), Some("Cloud Practitioner"));
        assert_eq!(cloud.module_names(), vec!["Cloud Fundamentals", "AWS Services"]);
    }

    #[test]
    fn test_document_order_is_preserved() {
        let curriculum = Curriculum::from_json(FIXTURE).unwrap();
        let keys: Vec<&str> = curriculum.courses().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["python", "cloud_computing"]);

        let bare = Curriculum::from_json(r#"{"zeta": {"name": "Zeta"}, "alpha": {"name": "Alpha"}}"#)
            .unwrap();
        let names: Vec<&str> = bare.courses().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_parse_listed_courses_derives_keys() {
        let json = r#"{"courses": [{"name": "Machine Learning", "curriculum": []}]}"#;
        let curriculum = Curriculum::from_json(json).unwrap();
        assert!(curriculum.get("machine_learning").is_some());
    }

    #[test]
    fn test_parse_bare_map() {
        let json = r#"{"devops": {"name": "DevOps"}}"#;
        let curriculum = Curriculum::from_json(json).unwrap();
        let devops = curriculum.get("devops").unwrap();
        assert!(devops.modules.is_empty());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Curriculum::from_json("{not json").is_err());
        assert!(Curriculum::from_json(r#"{"courses": 42}"#).is_err());
    }

    #[test]
    fn test_bundled_curriculum_parses() {
        let curriculum =
            Curriculum::from_json(include_str!("../../../data/course_curriculum.json")).unwrap();
        let keys: Vec<&str> = curriculum.courses().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["python", "cloud_computing", "devops", "ai_ml"]);
        assert_eq!(curriculum.get("python").unwrap().modules.len(), 6);
    }

    #[tokio::test]
    async fn test_missing_file_yields_empty_curriculum() {
        let store = FileCurriculumStore::new("/definitely/not/here/course_curriculum.json");
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_file_yields_empty_curriculum() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[[[").unwrap();
        let store = FileCurriculumStore::new(file.path());
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_file_is_reread_on_every_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", FIXTURE).unwrap();
        let store = FileCurriculumStore::new(file.path());
        assert_eq!(store.load().await.len(), 2);

        std::fs::write(file.path(), r#"{"courses": {}}"#).unwrap();
        assert!(store.load().await.is_empty());
    }
}
