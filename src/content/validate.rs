//! Structural checks for course content.
//!
//! Checks collect every problem instead of stopping at the first one, so an
//! author (or the generation flows) can see the whole list at once.

use super::model::{Course, Lesson, Question, Quiz};
use crate::error::{Result, SprintError};
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::OnceLock;
use url::Url;

/// A single content problem, located by a JSON-ish path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Minimum sizes demanded of generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Minimums {
    pub lessons: usize,
    pub practice_questions: usize,
    pub assessment_questions: usize,
}

impl Minimums {
    /// A lesson produced by the course-creator agent's tool.
    pub const AGENT_LESSON: Minimums = Minimums {
        lessons: 1,
        practice_questions: 5,
        assessment_questions: 5,
    };

    /// A full course produced by the course generation flow.
    pub const GENERATED_COURSE: Minimums = Minimums {
        lessons: 5,
        practice_questions: 20,
        assessment_questions: 20,
    };
}

fn slug_regex() -> &'static Regex {
    static SLUG: OnceLock<Regex> = OnceLock::new();
    SLUG.get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug regex"))
}

fn non_slug_regex() -> &'static Regex {
    static NON_SLUG: OnceLock<Regex> = OnceLock::new();
    NON_SLUG.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"))
}

/// Whether `id` is a URL-friendly slug such as `python-for-data-science`.
pub fn is_slug(id: &str) -> bool {
    slug_regex().is_match(id)
}

/// Turn a title into a URL-friendly slug.
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    non_slug_regex()
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Check a whole course.
pub fn validate_course(course: &Course) -> Vec<Issue> {
    let mut issues = Vec::new();

    if !is_slug(&course.id) {
        issues.push(issue("id", format!("'{}' is not a URL-friendly slug", course.id)));
    }
    if course.title.trim().is_empty() {
        issues.push(issue("title", "title is empty"));
    }
    if Url::parse(&course.image).is_err() {
        issues.push(issue("image", format!("'{}' is not a valid URL", course.image)));
    }

    let mut seen = HashSet::new();
    for (i, lesson) in course.lessons.iter().enumerate() {
        let prefix = format!("lessons[{}]", i);
        if !seen.insert(lesson.id.as_str()) {
            issues.push(issue(
                &format!("{}.id", prefix),
                format!("duplicate lesson id '{}'", lesson.id),
            ));
        }
        issues.extend(lesson_issues(lesson, &prefix));
    }

    issues
}

/// Check a single lesson.
pub fn validate_lesson(lesson: &Lesson) -> Vec<Issue> {
    lesson_issues(lesson, "lesson")
}

fn lesson_issues(lesson: &Lesson, prefix: &str) -> Vec<Issue> {
    let mut issues = Vec::new();

    if lesson.id.trim().is_empty() {
        issues.push(issue(&format!("{}.id", prefix), "lesson id is empty"));
    }
    if lesson.duration == 0 {
        issues.push(issue(&format!("{}.duration", prefix), "duration must be positive"));
    }
    if Url::parse(&lesson.introduction.video_url).is_err() {
        issues.push(issue(
            &format!("{}.introduction.videoUrl", prefix),
            format!("'{}' is not a valid URL", lesson.introduction.video_url),
        ));
    }

    issues.extend(quiz_issues(&lesson.practice, &format!("{}.practice", prefix)));
    issues.extend(quiz_issues(&lesson.assessment, &format!("{}.assessment", prefix)));
    issues
}

fn quiz_issues(quiz: &Quiz, prefix: &str) -> Vec<Issue> {
    quiz.questions
        .iter()
        .enumerate()
        .flat_map(|(i, q)| question_issues(q, &format!("{}.questions[{}]", prefix, i)))
        .collect()
}

fn question_issues(question: &Question, path: &str) -> Vec<Issue> {
    let mut issues = Vec::new();
    if question.question.trim().is_empty() {
        issues.push(issue(path, "question text is empty"));
    }
    if question.options.len() < 2 {
        issues.push(issue(path, "needs at least 2 options"));
    }
    if !question.has_option(&question.correct_answer) {
        issues.push(issue(
            path,
            format!("correctAnswer '{}' is not one of the options", question.correct_answer),
        ));
    }
    issues
}

/// Check a lesson against minimum question counts.
pub fn lesson_minimums(lesson: &Lesson, min: Minimums) -> Vec<Issue> {
    minimum_issues(lesson, min, "lesson")
}

/// Check a course against minimum lesson and question counts.
pub fn course_minimums(course: &Course, min: Minimums) -> Vec<Issue> {
    let mut issues = Vec::new();
    if course.lessons.len() < min.lessons {
        issues.push(issue(
            "lessons",
            format!("expected at least {} lessons, got {}", min.lessons, course.lessons.len()),
        ));
    }
    for (i, lesson) in course.lessons.iter().enumerate() {
        issues.extend(minimum_issues(lesson, min, &format!("lessons[{}]", i)));
    }
    issues
}

fn minimum_issues(lesson: &Lesson, min: Minimums, prefix: &str) -> Vec<Issue> {
    let mut issues = Vec::new();
    let practice = lesson.practice.questions.len();
    if practice < min.practice_questions {
        issues.push(issue(
            &format!("{}.practice", prefix),
            format!("expected at least {} questions, got {}", min.practice_questions, practice),
        ));
    }
    let assessment = lesson.assessment.questions.len();
    if assessment < min.assessment_questions {
        issues.push(issue(
            &format!("{}.assessment", prefix),
            format!("expected at least {} questions, got {}", min.assessment_questions, assessment),
        ));
    }
    issues
}

/// Turn a non-empty issue list into a validation error.
pub fn ensure_valid(issues: Vec<Issue>) -> Result<()> {
    if issues.is_empty() {
        return Ok(());
    }
    Err(SprintError::Validation(join_issues(&issues)))
}

/// One-line summary of an issue list.
pub fn join_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn issue(path: &str, message: impl Into<String>) -> Issue {
    Issue {
        path: path.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: &str) -> Question {
        Question {
            question: "Which?".to_string(),
            options: vec!["a".to_string(), "b".to_string()],
            correct_answer: correct.to_string(),
        }
    }

    fn lesson_with(practice: usize, assessment: usize) -> Lesson {
        let mut lesson = Lesson::blank("1");
        lesson.practice.questions = (0..practice).map(|_| question("a")).collect();
        lesson.assessment.questions = (0..assessment).map(|_| question("b")).collect();
        lesson
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Intro to Python for Data Science!"), "intro-to-python-for-data-science");
        assert_eq!(slugify("  C++ & Rust  "), "c-rust");
        assert!(is_slug("react-fundamentals"));
        assert!(!is_slug("React Fundamentals"));
        assert!(!is_slug("trailing-"));
    }

    #[test]
    fn test_correct_answer_must_be_an_option() {
        let mut lesson = lesson_with(1, 0);
        lesson.practice.questions[0].correct_answer = "A".to_string();
        let issues = validate_lesson(&lesson);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "lesson.practice.questions[0]");
    }

    #[test]
    fn test_course_reports_all_problems() {
        let mut course = Course::blank();
        course.id = "Not A Slug".to_string();
        course.image = "nope".to_string();
        course.add_lesson();
        course.add_lesson();
        course.lessons[1].id = "1".to_string();
        course.lessons[1].duration = 0;

        let paths: Vec<_> = validate_course(&course).into_iter().map(|i| i.path).collect();
        assert!(paths.contains(&"id".to_string()));
        assert!(paths.contains(&"image".to_string()));
        assert!(paths.contains(&"lessons[1].id".to_string()));
        assert!(paths.contains(&"lessons[1].duration".to_string()));
    }

    #[test]
    fn test_minimums() {
        assert!(lesson_minimums(&lesson_with(5, 5), Minimums::AGENT_LESSON).is_empty());
        assert_eq!(lesson_minimums(&lesson_with(4, 5), Minimums::AGENT_LESSON).len(), 1);

        let mut course = Course::blank();
        course.lessons = vec![lesson_with(20, 20); 4];
        let issues = course_minimums(&course, Minimums::GENERATED_COURSE);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "lessons");
    }

    #[test]
    fn test_ensure_valid() {
        assert!(ensure_valid(Vec::new()).is_ok());
        let err = ensure_valid(vec![issue("id", "bad")]).unwrap_err();
        assert!(matches!(err, SprintError::Validation(ref m) if m == "id: bad"));
    }
}
