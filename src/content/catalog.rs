//! Course catalog: bundled courses plus an optional directory of JSON files.

use super::model::{Course, CourseInfo, Lesson};
use crate::error::{Result, SprintError};
use std::path::Path;
use tracing::{debug, info, warn};

const BUNDLED: [(&str, &str); 3] = [
    (
        "react-fundamentals",
        include_str!("../../data/courses/react-fundamentals.json"),
    ),
    (
        "advanced-css",
        include_str!("../../data/courses/advanced-css.json"),
    ),
    (
        "digital-productivity-mastery",
        include_str!("../../data/courses/digital-productivity-mastery.json"),
    ),
];

/// In-memory set of courses, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct CourseCatalog {
    courses: Vec<Course>,
}

impl CourseCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The courses shipped with the binary.
    pub fn bundled() -> Result<Self> {
        let mut catalog = Self::new();
        for (id, json) in BUNDLED {
            let course: Course = serde_json::from_str(json)
                .map_err(|e| SprintError::Content(format!("bundled course {}: {}", id, e)))?;
            catalog.insert(course);
        }
        Ok(catalog)
    }

    /// Bundled courses with every `*.json` file in `dir` layered on top.
    ///
    /// A file whose course id matches a bundled course replaces it.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut catalog = Self::bundled()?;

        if !dir.exists() {
            warn!("Course directory {:?} does not exist, using bundled courses", dir);
            return Ok(catalog);
        }

        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        for path in paths {
            let content = std::fs::read_to_string(&path)?;
            let course: Course = serde_json::from_str(&content)
                .map_err(|e| SprintError::Content(format!("{}: {}", path.display(), e)))?;
            debug!("Loaded course {} from {:?}", course.id, path);
            catalog.insert(course);
        }

        info!("Course catalog ready with {} courses", catalog.len());
        Ok(catalog)
    }

    /// Add a course, replacing any course with the same id in place.
    pub fn insert(&mut self, course: Course) {
        match self.courses.iter_mut().find(|c| c.id == course.id) {
            Some(existing) => *existing = course,
            None => self.courses.push(course),
        }
    }

    pub fn list(&self) -> Vec<CourseInfo> {
        self.courses.iter().map(Course::info).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn lesson(&self, course_id: &str, lesson_id: &str) -> Option<&Lesson> {
        self.get(course_id)?.lesson(lesson_id)
    }

    pub fn next_lesson(&self, course_id: &str, lesson_id: &str) -> Option<&Lesson> {
        self.get(course_id)?.next_lesson(lesson_id)
    }

    /// Like [`get`](Self::get), but a missing course is an error.
    pub fn require(&self, id: &str) -> Result<&Course> {
        self.get(id)
            .ok_or_else(|| SprintError::NotFound(format!("course '{}'", id)))
    }

    /// Like [`lesson`](Self::lesson), but a missing course or lesson is an error.
    pub fn require_lesson(&self, course_id: &str, lesson_id: &str) -> Result<&Lesson> {
        self.require(course_id)?.lesson(lesson_id).ok_or_else(|| {
            SprintError::NotFound(format!("lesson '{}' in course '{}'", lesson_id, course_id))
        })
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}
