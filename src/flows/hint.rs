//! Hints for wrong practice answers.

use super::{require_output, vars, FlowRunner};
use crate::error::Result;
use crate::quiz::HintProvider;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintInput {
    pub question: String,
    pub incorrect_answer: String,
    pub correct_answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HintOutput {
    /// Plain text, no markdown.
    pub hint: String,
}

impl FlowRunner {
    #[instrument(skip_all)]
    pub async fn provide_practice_hint(&self, input: &HintInput) -> Result<HintOutput> {
        let output: HintOutput = self
            .run(
                "practice_hint",
                &self.prompts().hint,
                vars([
                    ("question", input.question.clone()),
                    ("incorrect_answer", input.incorrect_answer.clone()),
                    ("correct_answer", input.correct_answer.clone()),
                ]),
                Vec::new(),
            )
            .await?;
        let hint = strip_markdown(&output.hint);
        require_output("practice_hint", "hint", &hint)?;
        Ok(HintOutput { hint })
    }
}

#[async_trait]
impl HintProvider for FlowRunner {
    async fn hint(&self, question: &str, incorrect_answer: &str, correct_answer: &str) -> Result<String> {
        let output = self
            .provide_practice_hint(&HintInput {
                question: question.to_string(),
                incorrect_answer: incorrect_answer.to_string(),
                correct_answer: correct_answer.to_string(),
            })
            .await?;
        Ok(output.hint)
    }
}

/// Drop emphasis and code markers models add despite being asked not to.
fn strip_markdown(text: &str) -> String {
    text.replace("**", "")
        .replace("__", "")
        .replace('`', "")
        .trim()
        .to_string()
}
