//! Agent runner with tool calling loop.

use super::tools::{parse_tool_call, tool_definitions, ToolContext};
use crate::content::Lesson;
use crate::error::{Result, SprintError};
use crate::llm::{ChatMessage, ChatModel, CompletionRequest, ToolInvocation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reply used when the model produced a lesson but no text.
const LESSON_READY_RESPONSE: &str =
    "I've generated the lesson. You can review and edit it in the lesson editor.";

/// Who said a history line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One line of the creator conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatorTurn {
    pub role: Role,
    pub text: String,
}

impl CreatorTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// Agent that helps an administrator build course content.
pub struct CourseCreatorAgent {
    model: Arc<dyn ChatModel>,
    model_name: Option<String>,
    tools: ToolContext,
    max_iterations: usize,
    system_prompt: String,
}

impl CourseCreatorAgent {
    /// Create a new agent with the given model, tools and persona.
    pub fn new(model: Arc<dyn ChatModel>, tools: ToolContext, system_prompt: &str) -> Self {
        Self {
            model,
            model_name: None,
            tools,
            max_iterations: 6,
            system_prompt: system_prompt.to_string(),
        }
    }

    /// Use a specific model instead of the client's default.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model_name = Some(model.to_string());
        self
    }

    /// Set maximum model calls per run.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Run one instruction against the conversation so far.
    pub async fn run(&self, instruction: &str, history: &[CreatorTurn]) -> Result<CreatorAgentOutput> {
        if instruction.trim().is_empty() {
            return Err(SprintError::InvalidInput("instruction must not be empty".to_string()));
        }

        let mut messages = vec![ChatMessage::system(self.system_prompt.clone())];
        messages.extend(history.iter().map(|turn| match turn.role {
            Role::User => ChatMessage::user(turn.text.clone()),
            Role::Model => ChatMessage::assistant(turn.text.clone()),
        }));
        messages.push(ChatMessage::user(instruction));

        let mut iterations = 0;
        let mut tool_calls_made = Vec::new();
        let mut generated_lesson = None;

        loop {
            iterations += 1;
            if iterations > self.max_iterations {
                return Err(SprintError::Agent(format!(
                    "Agent exceeded maximum iterations ({})",
                    self.max_iterations
                )));
            }

            debug!("Agent iteration {}", iterations);

            let reply = self
                .model
                .complete(CompletionRequest {
                    messages: messages.clone(),
                    tools: tool_definitions(),
                    model: self.model_name.clone(),
                    ..Default::default()
                })
                .await?;

            if !reply.wants_tools() {
                return build_response(reply.content, generated_lesson, tool_calls_made, iterations);
            }

            messages.push(ChatMessage::Assistant {
                content: reply.content.clone(),
                tool_calls: reply.tool_calls.clone(),
            });

            for call in &reply.tool_calls {
                let (record, lesson) = self.execute_tool_call(call).await;
                if lesson.is_some() {
                    generated_lesson = lesson;
                }
                messages.push(ChatMessage::Tool {
                    call_id: call.id.clone(),
                    content: record.result.clone(),
                });
                tool_calls_made.push(record);
            }
        }
    }

    /// Execute a single tool call. Failures become the tool's result text.
    async fn execute_tool_call(&self, call: &ToolInvocation) -> (ToolCallRecord, Option<Lesson>) {
        info!("Agent calling tool: {} with args: {}", call.name, call.arguments);

        let (result, lesson) = match parse_tool_call(&call.name, &call.arguments) {
            Ok(tool) => match self.tools.execute(&tool).await {
                Ok(lesson) => match serde_json::to_string(&lesson) {
                    Ok(json) => (json, Some(lesson)),
                    Err(e) => (format!("Tool error: {}", e), None),
                },
                Err(e) => {
                    warn!("Tool {} failed: {}", call.name, e);
                    (format!("Tool error: {}", e), None)
                }
            },
            Err(e) => (format!("Failed to parse tool call: {}", e), None),
        };

        let record = ToolCallRecord {
            name: call.name.clone(),
            arguments: call.arguments.clone(),
            result,
        };
        (record, lesson)
    }
}

fn build_response(
    content: Option<String>,
    generated_lesson: Option<Lesson>,
    tool_calls: Vec<ToolCallRecord>,
    iterations: usize,
) -> Result<CreatorAgentOutput> {
    let text = content.unwrap_or_default().trim().to_string();
    let response = match (text.is_empty(), generated_lesson.is_some()) {
        (false, _) => text,
        (true, true) => LESSON_READY_RESPONSE.to_string(),
        (true, false) => {
            return Err(SprintError::Agent("Model returned an empty response".to_string()))
        }
    };

    Ok(CreatorAgentOutput {
        response,
        generated_lesson,
        tool_calls,
        iterations,
    })
}

/// Response from an agent run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorAgentOutput {
    /// The agent's text reply.
    pub response: String,
    /// The last lesson the tool generated during this run, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_lesson: Option<Lesson>,
    #[serde(skip)]
    pub tool_calls: Vec<ToolCallRecord>,
    #[serde(skip)]
    pub iterations: usize,
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    pub name: String,
    pub arguments: String,
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}
