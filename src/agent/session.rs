//! Conversation state for an interactive course-creation session.

use super::runner::{CourseCreatorAgent, CreatorAgentOutput, CreatorTurn};
use crate::content::Lesson;
use crate::error::Result;

/// History plus the latest lesson produced in the session.
#[derive(Debug, Default, Clone)]
pub struct CreatorSession {
    history: Vec<CreatorTurn>,
    latest_lesson: Option<Lesson>,
}

impl CreatorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[CreatorTurn] {
        &self.history
    }

    pub fn latest_lesson(&self) -> Option<&Lesson> {
        self.latest_lesson.as_ref()
    }

    /// Send one instruction. The user line stays in the history even when the
    /// turn fails.
    pub async fn send(
        &mut self,
        agent: &CourseCreatorAgent,
        instruction: &str,
    ) -> Result<CreatorAgentOutput> {
        let prior = self.history.clone();
        self.history.push(CreatorTurn::user(instruction));

        let output = agent.run(instruction, &prior).await?;
        self.history.push(CreatorTurn::model(output.response.clone()));
        if let Some(lesson) = &output.generated_lesson {
            self.latest_lesson = Some(lesson.clone());
        }
        Ok(output)
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.latest_lesson = None;
    }
}
