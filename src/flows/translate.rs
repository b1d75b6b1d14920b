use super::{require, require_output, vars, FlowRunner};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateInput {
    pub text: String,
    /// Target language, e.g. "Spanish".
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateOutput {
    pub translated_text: String,
}

impl FlowRunner {
    #[instrument(skip_all, fields(language = %input.language))]
    pub async fn translate_content(&self, input: &TranslateInput) -> Result<TranslateOutput> {
        require("text", &input.text)?;
        require("language", &input.language)?;
        let output: TranslateOutput = self
            .run(
                "translate",
                &self.prompts().translate,
                vars([
                    ("text", input.text.clone()),
                    ("language", input.language.clone()),
                ]),
                Vec::new(),
            )
            .await?;
        require_output("translate", "translatedText", &output.translated_text)?;
        Ok(output)
    }
}
