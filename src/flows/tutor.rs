//! Course-scoped AI teacher.

use super::{render_history, require, require_output, vars, ChatTurn, FlowRunner};
use crate::content::{Course, LessonOutline};
use crate::error::Result;
use crate::llm::Attachment;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// What the tutor knows about the course it is teaching.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseContext {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub lessons: Vec<LessonOutline>,
}

impl From<&Course> for CourseContext {
    fn from(course: &Course) -> Self {
        Self {
            title: course.title.clone(),
            description: course.description.clone(),
            lessons: course.outline(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub learning_style: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorInput {
    pub question: String,
    /// Optional upload as `data:<mimetype>;base64,<encoded_data>`.
    #[serde(default)]
    pub file_data_uri: Option<String>,
    pub course_context: CourseContext,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    #[serde(default)]
    pub user_preferences: Option<UserPreferences>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorOutput {
    pub answer: String,
}

impl FlowRunner {
    /// Answer a question in the context of one course.
    #[instrument(skip_all, fields(course = %input.course_context.title))]
    pub async fn course_tutor(&self, input: &TutorInput) -> Result<TutorOutput> {
        require("question", &input.question)?;

        let attachments = match &input.file_data_uri {
            Some(uri) => vec![Attachment::from_data_uri(uri)?],
            None => Vec::new(),
        };
        let file_note = if attachments.is_empty() {
            String::new()
        } else {
            "The student attached a file to this question. Use it when answering.\n".to_string()
        };

        let output: TutorOutput = self
            .run(
                "course_tutor",
                &self.prompts().tutor,
                vars([
                    ("question", input.question.clone()),
                    ("course_title", input.course_context.title.clone()),
                    ("course_description", input.course_context.description.clone()),
                    ("lessons", format_lessons(&input.course_context.lessons)),
                    ("preferences", format_preferences(input.user_preferences.as_ref())),
                    ("file_note", file_note),
                    ("history", render_history(&input.history)),
                ]),
                attachments,
            )
            .await?;
        require_output("course_tutor", "answer", &output.answer)?;
        Ok(output)
    }
}

fn format_lessons(lessons: &[LessonOutline]) -> String {
    lessons
        .iter()
        .map(|l| format!("- {}. {} ({} min)", l.id, l.title, l.duration))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_preferences(prefs: Option<&UserPreferences>) -> String {
    match prefs.and_then(|p| p.learning_style.as_deref()) {
        Some(style) if !style.trim().is_empty() => format!(
            "The student prefers a {} learning style. Tailor explanations to it.\n",
            style.trim()
        ),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Prompts;
    use crate::content::CourseCatalog;
    use crate::error::SprintError;
    use crate::llm::scripted::ScriptedModel;
    use crate::llm::ChatMessage;
    use std::sync::Arc;

    fn react_context() -> CourseContext {
        let catalog = CourseCatalog::bundled().unwrap();
        CourseContext::from(catalog.get("react-fundamentals").unwrap())
    }

    #[tokio::test]
    async fn test_tutor_with_file_and_preferences() {
        let model = Arc::new(ScriptedModel::new().reply(r#"{"answer": "Props flow down."}"#));
        let runner = FlowRunner::new(model.clone(), Prompts::default());

        let out = runner
            .course_tutor(&TutorInput {
                question: "Why is my component not updating?".to_string(),
                file_data_uri: Some("data:image/png;base64,iVBORw0KGgo=".to_string()),
                course_context: react_context(),
                history: Vec::new(),
                user_preferences: Some(UserPreferences {
                    learning_style: Some("visual".to_string()),
                }),
            })
            .await
            .unwrap();
        assert_eq!(out.answer, "Props flow down.");

        let requests = model.requests();
        let system = match &requests[0].messages[0] {
            ChatMessage::System(s) => s.clone(),
            other => panic!("unexpected message: {:?}", other),
        };
        assert!(system.contains("React Fundamentals"));
        match &requests[0].messages[1] {
            ChatMessage::User { text, attachments } => {
                assert_eq!(attachments.len(), 1);
                assert!(text.contains("visual learning style"));
                assert!(text.contains("- 2. Components and Props"));
                assert!(text.contains("attached a file"));
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_tutor_rejects_bad_file() {
        let model = Arc::new(ScriptedModel::new());
        let runner = FlowRunner::new(model.clone(), Prompts::default());
        let err = runner
            .course_tutor(&TutorInput {
                question: "Help".to_string(),
                file_data_uri: Some("not a uri".to_string()),
                course_context: react_context(),
                history: Vec::new(),
                user_preferences: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SprintError::InvalidInput(_)));
        assert_eq!(model.calls(), 0);
    }
}
