//! Course matching by display name.

use crate::{
    curriculum::{Course, Curriculum},
    lexicon::MatchMode,
};

/// The courses selected for a message.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseMatch {
    pub courses: Vec<Course>,
    /// `false` when no course was named and `courses` is the whole catalogue.
    pub filtered: bool,
}

/// Returns the courses whose lower-cased name occurs in `text`.
///
/// Falls back to every course when none is named. With [`MatchMode::Substring`]
/// a course named "AI" also matches "detail" or "maintain".
pub fn match_courses(text: &str, curriculum: &Curriculum, mode: MatchMode) -> CourseMatch {
    let text = text.to_lowercase();
    let named: Vec<Course> = curriculum
        .courses()
        .filter(|course| mode.contains(&text, &course.name.to_lowercase()))
        .cloned()
        .collect();

    if named.is_empty() {
        CourseMatch {
            courses: curriculum.courses().cloned().collect(),
            filtered: false,
        }
    } else {
        CourseMatch {
            courses: named,
            filtered: true,
        }
    }
}
