//! Single-lesson generation behind the course-creator agent's tool.

use super::{require, vars, FlowRunner, LESSON_SHAPE};
use crate::content::validate::{join_issues, lesson_minimums, validate_lesson, Minimums};
use crate::content::Lesson;
use crate::error::{Result, SprintError};
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonInput {
    pub lesson_topic: String,
}

impl FlowRunner {
    /// Generate a complete lesson, checked against the agent-lesson minimums.
    #[instrument(skip_all, fields(topic = %input.lesson_topic))]
    pub async fn generate_lesson(&self, input: &LessonInput) -> Result<Lesson> {
        require("lessonTopic", &input.lesson_topic)?;
        let lesson: Lesson = self
            .run(
                "lesson_content",
                &self.prompts().lesson,
                vars([
                    ("lesson_topic", input.lesson_topic.clone()),
                    ("lesson_shape", LESSON_SHAPE.to_string()),
                ]),
                Vec::new(),
            )
            .await?;

        let mut issues = validate_lesson(&lesson);
        issues.extend(lesson_minimums(&lesson, Minimums::AGENT_LESSON));
        if !issues.is_empty() {
            return Err(SprintError::flow("lesson_content", join_issues(&issues)));
        }
        Ok(lesson)
    }
}
