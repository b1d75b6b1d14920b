//! Course, lesson and quiz types.
//!
//! Field names serialize in camelCase so course files stay interchangeable
//! with the JSON the web client and the generation flows produce.

use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder lesson video used for generated and blank lessons.
pub const PLACEHOLDER_VIDEO_URL: &str = "https://www.youtube.com/embed/9wK4gHo1c1A";

/// Placeholder course image used for generated and blank courses.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://placehold.co/600x400.png";

/// A complete course with its lessons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// One lesson: intro, practice quiz, project and assessment quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    /// Estimated length in minutes.
    #[serde(deserialize_with = "minutes")]
    pub duration: u32,
    pub introduction: Introduction,
    pub practice: Quiz,
    pub project: Project,
    pub assessment: Quiz,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Introduction {
    pub video_url: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Quiz {
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// A multiple-choice question. The correct answer is one of the options,
/// matched by exact string equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl Question {
    /// Whether `answer` is the declared correct option.
    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.correct_answer
    }

    pub fn has_option(&self, answer: &str) -> bool {
        self.options.iter().any(|o| o == answer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
}

/// Catalog summary of a course, without lesson bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInfo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub lesson_count: usize,
    /// Sum of lesson durations in minutes.
    pub total_minutes: u32,
}

/// Lesson summary used as tutor context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonOutline {
    pub id: String,
    pub title: String,
    pub duration: u32,
}

impl Course {
    pub fn info(&self) -> CourseInfo {
        CourseInfo {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
            lesson_count: self.lessons.len(),
            total_minutes: self.lessons.iter().map(|l| l.duration).sum(),
        }
    }

    pub fn lesson(&self, lesson_id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == lesson_id)
    }

    /// The lesson following `lesson_id`, if any.
    pub fn next_lesson(&self, lesson_id: &str) -> Option<&Lesson> {
        let pos = self.lessons.iter().position(|l| l.id == lesson_id)?;
        self.lessons.get(pos + 1)
    }

    pub fn outline(&self) -> Vec<LessonOutline> {
        self.lessons.iter().map(Lesson::outline).collect()
    }
}

/// Which quiz of a lesson a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizKind {
    Practice,
    Assessment,
}

impl Lesson {
    pub fn outline(&self) -> LessonOutline {
        LessonOutline {
            id: self.id.clone(),
            title: self.title.clone(),
            duration: self.duration,
        }
    }

    pub fn quiz(&self, kind: QuizKind) -> &Quiz {
        match kind {
            QuizKind::Practice => &self.practice,
            QuizKind::Assessment => &self.assessment,
        }
    }
}

/// Accept integer or fractional minutes; models sometimes answer `12.5`.
fn minutes<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() && value >= 0.0 {
        Ok(value.round() as u32)
    } else {
        Err(serde::de::Error::custom(format!("invalid duration: {}", value)))
    }
}
