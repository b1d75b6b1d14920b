//! Tool definitions and implementations for the course-creator agent.

use crate::content::Lesson;
use crate::error::{Result, SprintError};
use crate::flows::{FlowRunner, LessonInput};
use crate::llm::ToolSpec;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Name the model uses to request a lesson.
pub const GENERATE_LESSON_TOOL: &str = "generateLessonContent";

/// Tools the agent can call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ToolCall {
    /// Generate a complete lesson on a topic.
    GenerateLessonContent { lesson_topic: String },
}

/// Tool execution context.
pub struct ToolContext {
    flows: Arc<FlowRunner>,
}

impl ToolContext {
    pub fn new(flows: Arc<FlowRunner>) -> Self {
        Self { flows }
    }

    /// Execute a tool call and return the lesson it produced.
    pub async fn execute(&self, tool: &ToolCall) -> Result<Lesson> {
        match tool {
            ToolCall::GenerateLessonContent { lesson_topic } => {
                self.flows
                    .generate_lesson(&LessonInput {
                        lesson_topic: lesson_topic.clone(),
                    })
                    .await
            }
        }
    }
}

/// Tool declarations sent with every agent request.
pub fn tool_definitions() -> Vec<ToolSpec> {
    vec![ToolSpec {
        name: GENERATE_LESSON_TOOL.to_string(),
        description: "Generates a complete lesson, including introduction, practice questions, \
            a project, and assessment questions, based on a topic."
            .to_string(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "lessonTopic": {
                    "type": "string",
                    "description": "The specific topic for the lesson to be generated."
                }
            },
            "required": ["lessonTopic"]
        }),
    }]
}

/// Parse a tool call requested by the model.
pub fn parse_tool_call(name: &str, arguments: &str) -> Result<ToolCall> {
    let args: serde_json::Value = serde_json::from_str(arguments)
        .map_err(|e| SprintError::Agent(format!("Invalid tool arguments: {}", e)))?;

    match name {
        GENERATE_LESSON_TOOL => {
            let lesson_topic = args["lessonTopic"]
                .as_str()
                .filter(|t| !t.trim().is_empty())
                .ok_or_else(|| SprintError::Agent("Missing 'lessonTopic' argument".to_string()))?
                .to_string();
            Ok(ToolCall::GenerateLessonContent { lesson_topic })
        }
        _ => Err(SprintError::Agent(format!("Unknown tool: {}", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate_lesson_tool() {
        let tool = parse_tool_call(GENERATE_LESSON_TOOL, r#"{"lessonTopic": "CSS Variables"}"#)
            .unwrap();
        assert_eq!(
            tool,
            ToolCall::GenerateLessonContent {
                lesson_topic: "CSS Variables".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_calls() {
        assert!(parse_tool_call(GENERATE_LESSON_TOOL, "{}").is_err());
        assert!(parse_tool_call(GENERATE_LESSON_TOOL, "not json").is_err());
        let err = parse_tool_call("deleteCourse", "{}").unwrap_err();
        assert_eq!(err.to_string(), "Agent error: Unknown tool: deleteCourse");
    }

    #[test]
    fn test_tool_definitions() {
        let tools = tool_definitions();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "generateLessonContent");
        assert_eq!(tools[0].parameters["required"][0], "lessonTopic");
    }
}
