//! General-purpose learning assistant.

use super::{render_history, require, require_output, vars, ChatTurn, FlowRunner};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatInput {
    pub question: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatOutput {
    pub answer: String,
}

impl FlowRunner {
    /// Answer a free-form question, with optional prior turns.
    #[instrument(skip_all)]
    pub async fn chat(&self, input: &ChatInput) -> Result<ChatOutput> {
        require("question", &input.question)?;
        let output: ChatOutput = self
            .run(
                "chat",
                &self.prompts().chat,
                vars([
                    ("question", input.question.clone()),
                    ("history", render_history(&input.history)),
                ]),
                Vec::new(),
            )
            .await?;
        require_output("chat", "answer", &output.answer)?;
        Ok(output)
    }
}
