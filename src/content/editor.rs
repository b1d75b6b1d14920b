//! Manual course editing: blank templates, lesson add/remove and JSON export.

use super::model::{Course, Introduction, Lesson, Project, Quiz, PLACEHOLDER_IMAGE_URL, PLACEHOLDER_VIDEO_URL};
use crate::error::{Result, SprintError};

impl Course {
    /// Starting point for a new course in the editor.
    pub fn blank() -> Self {
        Self {
            id: "new-course".to_string(),
            title: "New Course Title".to_string(),
            description: "A description for the new course.".to_string(),
            image: PLACEHOLDER_IMAGE_URL.to_string(),
            lessons: Vec::new(),
        }
    }

    /// Append a blank lesson numbered after the existing ones.
    pub fn add_lesson(&mut self) -> &mut Lesson {
        let id = (self.lessons.len() + 1).to_string();
        self.lessons.push(Lesson::blank(&id));
        let last = self.lessons.len() - 1;
        &mut self.lessons[last]
    }

    /// Remove and return the lesson at `index`.
    pub fn remove_lesson(&mut self, index: usize) -> Result<Lesson> {
        if index >= self.lessons.len() {
            return Err(SprintError::InvalidInput(format!(
                "lesson index {} out of range ({} lessons)",
                index,
                self.lessons.len()
            )));
        }
        Ok(self.lessons.remove(index))
    }

    /// Replace the lesson at `index`.
    pub fn replace_lesson(&mut self, index: usize, lesson: Lesson) -> Result<()> {
        let len = self.lessons.len();
        let slot = self.lessons.get_mut(index).ok_or_else(|| {
            SprintError::InvalidInput(format!("lesson index {} out of range ({} lessons)", index, len))
        })?;
        *slot = lesson;
        Ok(())
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// File name used when the course is downloaded.
    pub fn export_file_name(&self) -> String {
        export_name(&self.id, "course")
    }
}

impl Lesson {
    /// Starting point for a new lesson in the editor.
    pub fn blank(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: "New Lesson Title".to_string(),
            duration: 10,
            introduction: Introduction {
                video_url: PLACEHOLDER_VIDEO_URL.to_string(),
                text: "New lesson introduction.".to_string(),
            },
            practice: Quiz::default(),
            project: Project {
                title: "New Project".to_string(),
                description: "Project description.".to_string(),
            },
            assessment: Quiz::default(),
        }
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn export_file_name(&self) -> String {
        export_name(&self.id, "lesson")
    }
}

fn export_name(id: &str, fallback: &str) -> String {
    let id = id.trim();
    if id.is_empty() {
        format!("{}.json", fallback)
    } else {
        format!("{}.json", id)
    }
}
