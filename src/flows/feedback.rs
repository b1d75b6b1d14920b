//! Feedback on a free-form student submission.

use super::{require, require_output, vars, FlowRunner};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::instrument;

/// Kind of material being reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialType {
    Answer,
    Project,
    Essay,
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialType::Answer => write!(f, "answer"),
            MaterialType::Project => write!(f, "project"),
            MaterialType::Essay => write!(f, "essay"),
        }
    }
}

impl std::str::FromStr for MaterialType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "answer" => Ok(MaterialType::Answer),
            "project" => Ok(MaterialType::Project),
            "essay" => Ok(MaterialType::Essay),
            _ => Err(format!(
                "Unknown material type: {}. Valid options: answer, project, essay",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackInput {
    pub submission: String,
    pub material_type: MaterialType,
    pub topic: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackOutput {
    pub feedback: String,
    pub summary_of_mistakes: String,
    pub suggested_next_steps: String,
}

impl FlowRunner {
    #[instrument(skip_all, fields(material = %input.material_type))]
    pub async fn provide_smart_feedback(&self, input: &FeedbackInput) -> Result<FeedbackOutput> {
        require("submission", &input.submission)?;
        let output: FeedbackOutput = self
            .run(
                "smart_feedback",
                &self.prompts().feedback,
                vars([
                    ("submission", input.submission.clone()),
                    ("material_type", input.material_type.to_string()),
                    ("topic", input.topic.clone()),
                ]),
                Vec::new(),
            )
            .await?;
        require_output("smart_feedback", "feedback", &output.feedback)?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Prompts;
    use crate::error::SprintError;
    use crate::llm::scripted::ScriptedModel;
    use std::sync::Arc;

    #[test]
    fn test_material_type_parsing() {
        assert_eq!("Essay".parse::<MaterialType>().unwrap(), MaterialType::Essay);
        assert!("poem".parse::<MaterialType>().is_err());
        let json: MaterialType = serde_json::from_str("\"project\"").unwrap();
        assert_eq!(json, MaterialType::Project);
    }

    #[tokio::test]
    async fn test_feedback() {
        let model = Arc::new(ScriptedModel::new().reply(
            r#"{"feedback": "Good structure.", "summaryOfMistakes": "Missing keys.", "suggestedNextSteps": "Read about lists."}"#,
        ));
        let runner = FlowRunner::new(model, Prompts::default());
        let out = runner
            .provide_smart_feedback(&FeedbackInput {
                submission: "items.map(i => <li>{i}</li>)".to_string(),
                material_type: MaterialType::Answer,
                topic: "React lists".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(out.summary_of_mistakes, "Missing keys.");
    }

    #[tokio::test]
    async fn test_feedback_missing_field_is_flow_error() {
        let model = Arc::new(ScriptedModel::new().reply(r#"{"feedback": "ok"}"#));
        let runner = FlowRunner::new(model, Prompts::default());
        let err = runner
            .provide_smart_feedback(&FeedbackInput {
                submission: "text".to_string(),
                material_type: MaterialType::Essay,
                topic: "Productivity".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SprintError::Flow { flow: "smart_feedback", .. }));
    }
}
