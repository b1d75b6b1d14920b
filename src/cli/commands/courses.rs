//! Catalog browsing and content validation commands.

use crate::cli::{CoursesAction, Output};
use crate::config::Settings;
use crate::content::{validate_course, validate_lesson, Course, Issue, Lesson};
use crate::error::SprintError;
use crate::platform::load_catalog;
use anyhow::Result;
use console::style;
use std::path::Path;

/// Run the courses command.
pub fn run_courses(action: &CoursesAction, settings: &Settings) -> Result<()> {
    let catalog = load_catalog(settings)?;

    match action {
        CoursesAction::List => {
            if catalog.is_empty() {
                Output::info("No courses available.");
                return Ok(());
            }
            Output::header(&format!("Courses ({})", catalog.len()));
            println!();
            for course in catalog.list() {
                Output::course_info(&course);
            }
            println!();
        }

        CoursesAction::Show { id } => {
            let course = catalog.require(id)?;
            Output::header(&course.title);
            println!();
            println!("{}", course.description);
            println!();
            Output::kv("Id", &course.id);
            Output::kv("Image", &course.image);
            println!();
            println!("{}", style("Lessons").bold());
            for lesson in course.outline() {
                Output::lesson_line(&lesson);
            }
            println!();
        }
    }

    Ok(())
}

/// What a content file turned out to hold.
enum Content {
    Course(Course),
    Lesson(Lesson),
}

fn load_content(path: &Path) -> crate::error::Result<Content> {
    let text = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    if value.get("lessons").is_some() {
        Ok(Content::Course(serde_json::from_value(value).map_err(|e| {
            SprintError::Validation(format!("{} is not a valid course: {}", path.display(), e))
        })?))
    } else {
        Ok(Content::Lesson(serde_json::from_value(value).map_err(|e| {
            SprintError::Validation(format!("{} is not a valid lesson: {}", path.display(), e))
        })?))
    }
}

fn check_file(path: &Path) -> crate::error::Result<(String, Vec<Issue>)> {
    Ok(match load_content(path)? {
        Content::Course(course) => (format!("course '{}'", course.id), validate_course(&course)),
        Content::Lesson(lesson) => (format!("lesson '{}'", lesson.id), validate_lesson(&lesson)),
    })
}

/// Run the validate command. Fails when the file has issues.
pub fn run_validate(file: &str) -> Result<()> {
    let path = Settings::expand_path(file);
    let (label, issues) = check_file(&path)?;

    if issues.is_empty() {
        Output::success(&format!("{} is valid", label));
        return Ok(());
    }

    Output::error(&format!("{} has {} issue(s):", label, issues.len()));
    for issue in &issues {
        Output::list_item(&issue.to_string());
    }
    anyhow::bail!("validation failed for {}", path.display())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_course_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("course.json");
        let mut course = Course::blank();
        course.add_lesson();
        std::fs::write(&path, course.to_pretty_json().unwrap()).unwrap();

        let (label, _issues) = check_file(&path).unwrap();
        assert_eq!(label, "course 'new-course'");
    }

    #[test]
    fn test_check_lesson_file_reports_bad_answer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lesson.json");
        let mut lesson = Lesson::blank("1");
        lesson.practice.questions.push(crate::content::Question {
            question: "Q?".to_string(),
            options: vec!["a".to_string(), "b".to_string()],
            correct_answer: "c".to_string(),
        });
        std::fs::write(&path, lesson.to_pretty_json().unwrap()).unwrap();

        let (label, issues) = check_file(&path).unwrap();
        assert_eq!(label, "lesson '1'");
        assert!(issues.iter().any(|i| i.path.contains("practice")));
    }

    #[test]
    fn test_check_rejects_non_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.json");
        std::fs::write(&path, r#"{"hello": "world"}"#).unwrap();
        assert!(matches!(check_file(&path), Err(SprintError::Validation(_))));
    }
}
