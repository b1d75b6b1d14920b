//! Full multi-lesson course generation.

use super::{require, vars, FlowRunner, LESSON_SHAPE};
use crate::content::validate::{course_minimums, is_slug, join_issues, slugify, Minimums};
use crate::content::{validate_course, Course, PLACEHOLDER_IMAGE_URL};
use crate::error::{Result, SprintError};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseInput {
    pub topic: String,
}

impl FlowRunner {
    /// Generate a course and check it against the generated-course minimums.
    ///
    /// A non-slug id is replaced with one derived from the title and a
    /// missing image gets the placeholder; anything else wrong with the
    /// reply is a flow error.
    #[instrument(skip_all, fields(topic = %input.topic))]
    pub async fn generate_course(&self, input: &CourseInput) -> Result<Course> {
        require("topic", &input.topic)?;
        let mut course: Course = self
            .run(
                "course_generation",
                &self.prompts().course,
                vars([
                    ("topic", input.topic.clone()),
                    ("lesson_shape", LESSON_SHAPE.to_string()),
                ]),
                Vec::new(),
            )
            .await?;

        if !is_slug(&course.id) {
            course.id = slugify(&course.title);
        }
        if course.image.trim().is_empty() {
            course.image = PLACEHOLDER_IMAGE_URL.to_string();
        }

        let mut issues = validate_course(&course);
        issues.extend(course_minimums(&course, Minimums::GENERATED_COURSE));
        if !issues.is_empty() {
            return Err(SprintError::flow("course_generation", join_issues(&issues)));
        }

        info!(
            "Generated course '{}' with {} lessons",
            course.id,
            course.lessons.len()
        );
        Ok(course)
    }
}
