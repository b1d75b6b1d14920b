//! Motivational tip for the dashboard.

use super::{require_output, vars, FlowRunner};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionInput {
    pub active_course: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionOutput {
    pub suggestion: String,
}

impl FlowRunner {
    #[instrument(skip_all)]
    pub async fn generate_dashboard_suggestion(
        &self,
        input: &SuggestionInput,
    ) -> Result<SuggestionOutput> {
        let output: SuggestionOutput = self
            .run(
                "dashboard_suggestion",
                &self.prompts().suggestion,
                vars([
                    ("active_course", input.active_course.clone()),
                    ("strengths", join_or_none(&input.strengths)),
                    ("weaknesses", join_or_none(&input.weaknesses)),
                ]),
                Vec::new(),
            )
            .await?;
        require_output("dashboard_suggestion", "suggestion", &output.suggestion)?;
        Ok(output)
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}
