//! Structured AI features.
//!
//! A flow renders its prompt template, asks the model for a JSON object and
//! parses the reply into a typed output. Each flow lives in its own file as
//! a method on [`FlowRunner`].

mod chat;
mod course;
mod evaluate;
mod feedback;
mod hint;
mod lesson;
mod micro_course;
mod plan;
mod suggestion;
mod translate;
mod tutor;

pub use chat::{ChatInput, ChatOutput};
pub use course::CourseInput;
pub use evaluate::{Evaluation, EvaluateInput};
pub use feedback::{FeedbackInput, FeedbackOutput, MaterialType};
pub use hint::{HintInput, HintOutput};
pub use lesson::LessonInput;
pub use micro_course::{Challenge, KeyConcept, MicroCourse, MicroCourseInput};
pub use plan::{PlanInput, PlanOutput};
pub use suggestion::{SuggestionInput, SuggestionOutput};
pub use translate::{TranslateInput, TranslateOutput};
pub use tutor::{CourseContext, TutorInput, TutorOutput, UserPreferences};

use crate::config::{FlowPrompt, Prompts};
use crate::error::{Result, SprintError};
use crate::llm::{Attachment, ChatMessage, ChatModel, CompletionRequest};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// JSON shape of a lesson, shared by the course and lesson prompts.
pub(crate) const LESSON_SHAPE: &str = r#"{"id": "1", "title": "...", "duration": 15, "introduction": {"videoUrl": "https://www.youtube.com/embed/9wK4gHo1c1A", "text": "..."}, "practice": {"questions": [{"question": "...", "options": ["...", "...", "...", "..."], "correctAnswer": "..."}]}, "project": {"title": "...", "description": "..."}, "assessment": {"questions": [{"question": "...", "options": ["...", "...", "...", "..."], "correctAnswer": "..."}]}}"#;

/// One exchange of a conversation: what the user asked and what the model said.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub user: String,
    pub model: String,
}

/// Runs flows against a chat model.
pub struct FlowRunner {
    model: Arc<dyn ChatModel>,
    prompts: Prompts,
    temperature: f32,
}

impl FlowRunner {
    pub fn new(model: Arc<dyn ChatModel>, prompts: Prompts) -> Self {
        Self {
            model,
            prompts,
            temperature: 0.7,
        }
    }

    /// Set the sampling temperature used for every flow.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn prompts(&self) -> &Prompts {
        &self.prompts
    }

    pub(crate) fn model(&self) -> Arc<dyn ChatModel> {
        Arc::clone(&self.model)
    }

    /// Render `prompt`, send it in JSON mode and parse the reply as `O`.
    pub(crate) async fn run<O: DeserializeOwned>(
        &self,
        flow: &'static str,
        prompt: &FlowPrompt,
        vars: HashMap<String, String>,
        attachments: Vec<Attachment>,
    ) -> Result<O> {
        let system = format!(
            "{}\n\n{}",
            self.prompts.render_with_custom(&prompt.system, &vars),
            Prompts::json_rule()
        );
        let user = self.prompts.render_with_custom(&prompt.user, &vars);

        let request = CompletionRequest {
            messages: vec![
                ChatMessage::system(system),
                ChatMessage::User {
                    text: user,
                    attachments,
                },
            ],
            json_output: true,
            temperature: Some(self.temperature),
            ..Default::default()
        };

        let reply = self.model.complete(request).await?;
        let content = reply
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| SprintError::flow(flow, "model returned no content"))?;

        debug!(flow, "Flow reply: {} bytes", content.len());
        parse_reply(flow, &content)
    }
}

/// Parse a model reply into `O`, tolerating code fences and stray prose.
pub(crate) fn parse_reply<O: DeserializeOwned>(flow: &'static str, content: &str) -> Result<O> {
    let json = extract_json(content)
        .ok_or_else(|| SprintError::flow(flow, "reply contained no JSON object"))?;
    serde_json::from_str(json)
        .map_err(|e| SprintError::flow(flow, format!("reply did not match the expected shape: {}", e)))
}

/// The outermost `{...}` span of `text`.
pub(crate) fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Build a template variable map.
pub(crate) fn vars<const N: usize>(pairs: [(&str, String); N]) -> HashMap<String, String> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Render prior turns for the `{{history}}` slot, or nothing when empty.
pub(crate) fn render_history(history: &[ChatTurn]) -> String {
    if history.is_empty() {
        return String::new();
    }
    let mut out = String::from("Conversation so far:\n");
    for turn in history {
        out.push_str(&format!("User: {}\nAI: {}\n", turn.user, turn.model));
    }
    out.push('\n');
    out
}

/// Reject blank required inputs before spending a model call.
pub(crate) fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SprintError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// Reject blank required outputs.
pub(crate) fn require_output(flow: &'static str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SprintError::flow(flow, format!("'{}' was empty", field)));
    }
    Ok(())
}

/// A well-formed lesson reply with `questions` questions per quiz.
#[cfg(test)]
pub(crate) fn lesson_json(id: &str, questions: usize) -> serde_json::Value {
    let quiz = |kind: &str| {
        (0..questions)
            .map(|i| {
                serde_json::json!({
                    "question": format!("{} question {}?", kind, i + 1),
                    "options": ["A", "B", "C", "D"],
                    "correctAnswer": "B"
                })
            })
            .collect::<Vec<_>>()
    };
    serde_json::json!({
        "id": id,
        "title": format!("Lesson {}", id),
        "duration": 12,
        "introduction": {"videoUrl": crate::content::PLACEHOLDER_VIDEO_URL, "text": "Intro."},
        "practice": {"questions": quiz("Practice")},
        "project": {"title": "Build it", "description": "Build the thing."},
        "assessment": {"questions": quiz("Assessment")}
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::scripted::ScriptedModel;

    #[derive(Debug, Deserialize)]
    struct Answer {
        answer: String,
    }

    #[test]
    fn test_extract_json_strips_fences() {
        let text = "```json\n{\"answer\": \"hi\"}\n```";
        assert_eq!(extract_json(text), Some("{\"answer\": \"hi\"}"));
        assert_eq!(extract_json("no json here"), None);
        assert_eq!(extract_json("} backwards {"), None);
    }

    #[test]
    fn test_render_history() {
        assert_eq!(render_history(&[]), "");
        let out = render_history(&[ChatTurn {
            user: "What is JSX?".to_string(),
            model: "A syntax extension.".to_string(),
        }]);
        assert!(out.starts_with("Conversation so far:\n"));
        assert!(out.contains("User: What is JSX?\nAI: A syntax extension.\n"));
    }

    #[tokio::test]
    async fn test_run_sends_json_request() {
        let model = Arc::new(ScriptedModel::new().reply("Sure! {\"answer\": \"42\"}"));
        let runner = FlowRunner::new(model.clone(), Prompts::default()).with_temperature(0.2);
        let prompt = FlowPrompt {
            system: "Be {{tone}}.".to_string(),
            user: "Q: {{question}}".to_string(),
        };

        let out: Answer = runner
            .run(
                "test",
                &prompt,
                vars([("tone", "kind".to_string()), ("question", "why".to_string())]),
                Vec::new(),
            )
            .await
            .unwrap();
        assert_eq!(out.answer, "42");

        let requests = model.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].json_output);
        assert_eq!(requests[0].temperature, Some(0.2));
        match &requests[0].messages[0] {
            ChatMessage::System(s) => {
                assert!(s.starts_with("Be kind."));
                assert!(s.contains(Prompts::json_rule()));
            }
            other => panic!("unexpected message: {:?}", other),
        }
        match &requests[0].messages[1] {
            ChatMessage::User { text, .. } => assert_eq!(text, "Q: why"),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_run_rejects_wrong_shape() {
        let model = Arc::new(ScriptedModel::new().reply("{\"reply\": \"x\"}").reply("   "));
        let runner = FlowRunner::new(model, Prompts::default());
        let prompt = FlowPrompt::default();

        let err = runner
            .run::<Answer>("test", &prompt, HashMap::new(), Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SprintError::Flow { flow: "test", .. }));

        let err = runner
            .run::<Answer>("test", &prompt, HashMap::new(), Vec::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no content"));
    }

    #[tokio::test]
    async fn test_model_errors_pass_through() {
        let model = Arc::new(ScriptedModel::new().fail("rate limited"));
        let runner = FlowRunner::new(model, Prompts::default());
        let err = runner
            .run::<Answer>("test", &FlowPrompt::default(), HashMap::new(), Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SprintError::OpenAI(_)));
    }
}
