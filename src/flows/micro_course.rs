//! One-page micro-course for learners teaching what they learned.

use super::{require, require_output, vars, FlowRunner};
use crate::error::{Result, SprintError};
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MicroCourseInput {
    pub topic: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyConcept {
    pub concept: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MicroCourse {
    pub title: String,
    pub introduction: String,
    pub key_concepts: Vec<KeyConcept>,
    pub challenge: Challenge,
}

impl FlowRunner {
    #[instrument(skip_all, fields(topic = %input.topic))]
    pub async fn generate_micro_course(&self, input: &MicroCourseInput) -> Result<MicroCourse> {
        require("topic", &input.topic)?;
        let course: MicroCourse = self
            .run(
                "micro_course",
                &self.prompts().micro_course,
                vars([("topic", input.topic.clone())]),
                Vec::new(),
            )
            .await?;
        require_output("micro_course", "title", &course.title)?;
        if course.key_concepts.is_empty() {
            return Err(SprintError::flow("micro_course", "no key concepts returned"));
        }
        Ok(course)
    }
}
