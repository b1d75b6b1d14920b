//! Scored evaluation of a project submission.

use super::{require, require_output, vars, FlowRunner};
use crate::error::{Result, SprintError};
use crate::llm::Attachment;
use serde::{Deserialize, Serialize};
use tracing::instrument;

fn default_student_level() -> String {
    "beginner".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateInput {
    pub task_description: String,
    #[serde(default)]
    pub submission_text: Option<String>,
    /// Optional upload as `data:<mimetype>;base64,<encoded_data>`.
    #[serde(default)]
    pub submission_file: Option<String>,
    #[serde(default = "default_student_level")]
    pub student_level: String,
    #[serde(default)]
    pub feedback_request: Option<String>,
}

/// The evaluation returned to the student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    /// 0 to 100.
    pub score: u32,
    pub feedback: String,
    pub summary_of_mistakes: String,
    pub suggestions: String,
    pub improvement_paths: String,
}

/// The raw reply; models sometimes send fractional or out-of-range scores.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvaluation {
    score: f64,
    feedback: String,
    #[serde(default)]
    summary_of_mistakes: String,
    #[serde(default)]
    suggestions: String,
    #[serde(default)]
    improvement_paths: String,
}

impl FlowRunner {
    #[instrument(skip_all, fields(level = %input.student_level))]
    pub async fn evaluate_submitted_task(&self, input: &EvaluateInput) -> Result<Evaluation> {
        require("taskDescription", &input.task_description)?;

        let text = input
            .submission_text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        let file = input
            .submission_file
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty());

        let attachments = match file {
            Some(uri) => vec![Attachment::from_data_uri(uri)?],
            None => Vec::new(),
        };
        let submission = match (text, file) {
            (Some(t), _) => t.to_string(),
            (None, Some(_)) => "(see the attached file)".to_string(),
            (None, None) => {
                return Err(SprintError::InvalidInput("Submission is empty".to_string()))
            }
        };
        let feedback_request = match input.feedback_request.as_deref().map(str::trim) {
            Some(r) if !r.is_empty() => format!("The student asks for feedback on: {}\n", r),
            _ => String::new(),
        };

        let raw: RawEvaluation = self
            .run(
                "task_evaluation",
                &self.prompts().evaluate,
                vars([
                    ("task_description", input.task_description.clone()),
                    ("student_level", input.student_level.clone()),
                    ("feedback_request", feedback_request),
                    ("submission", submission),
                ]),
                attachments,
            )
            .await?;

        if !(0.0..=100.0).contains(&raw.score) {
            return Err(SprintError::flow(
                "task_evaluation",
                format!("score {} is outside 0..=100", raw.score),
            ));
        }
        require_output("task_evaluation", "feedback", &raw.feedback)?;

        Ok(Evaluation {
            score: raw.score.round() as u32,
            feedback: raw.feedback,
            summary_of_mistakes: raw.summary_of_mistakes,
            suggestions: raw.suggestions,
            improvement_paths: raw.improvement_paths,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Prompts;
    use crate::llm::scripted::ScriptedModel;
    use crate::llm::ChatMessage;
    use std::sync::Arc;

    fn input(text: Option<&str>, file: Option<&str>) -> EvaluateInput {
        EvaluateInput {
            task_description: "Build a profile card component".to_string(),
            submission_text: text.map(String::from),
            submission_file: file.map(String::from),
            student_level: default_student_level(),
            feedback_request: Some("naming".to_string()),
        }
    }

    fn reply(score: f64) -> serde_json::Value {
        serde_json::json!({
            "score": score,
            "feedback": "Nice work.",
            "summaryOfMistakes": "Minor naming issues.",
            "suggestions": "Use descriptive prop names.",
            "improvementPaths": "Study component composition."
        })
    }

    #[test]
    fn test_student_level_defaults_to_beginner() {
        let parsed: EvaluateInput =
            serde_json::from_str(r#"{"taskDescription": "t", "submissionText": "s"}"#).unwrap();
        assert_eq!(parsed.student_level, "beginner");
    }

    #[tokio::test]
    async fn test_evaluate_rounds_score() {
        let model = Arc::new(ScriptedModel::new().reply_json(reply(86.6)));
        let runner = FlowRunner::new(model.clone(), Prompts::default());
        let eval = runner
            .evaluate_submitted_task(&input(Some("function Card() {}"), None))
            .await
            .unwrap();
        assert_eq!(eval.score, 87);

        match &model.requests()[0].messages[1] {
            ChatMessage::User { text, attachments } => {
                assert!(attachments.is_empty());
                assert!(text.contains("Student Level: beginner"));
                assert!(text.contains("feedback on: naming"));
                assert!(text.contains("function Card() {}"));
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_evaluate_file_only() {
        let model = Arc::new(ScriptedModel::new().reply_json(reply(70.0)));
        let runner = FlowRunner::new(model.clone(), Prompts::default());
        runner
            .evaluate_submitted_task(&input(None, Some("data:image/png;base64,iVBORw0KGgo=")))
            .await
            .unwrap();

        match &model.requests()[0].messages[1] {
            ChatMessage::User { attachments, .. } => assert_eq!(attachments.len(), 1),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_evaluate_empty_submission() {
        let model = Arc::new(ScriptedModel::new());
        let runner = FlowRunner::new(model.clone(), Prompts::default());
        let err = runner
            .evaluate_submitted_task(&input(Some("   "), None))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Submission is empty");
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_evaluate_rejects_out_of_range_score() {
        let model = Arc::new(ScriptedModel::new().reply_json(reply(120.0)));
        let runner = FlowRunner::new(model, Prompts::default());
        let err = runner
            .evaluate_submitted_task(&input(Some("text"), None))
            .await
            .unwrap_err();
        assert!(matches!(err, SprintError::Flow { flow: "task_evaluation", .. }));
    }
}
