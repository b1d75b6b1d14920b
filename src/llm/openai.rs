//! [`ChatModel`] backed by the OpenAI chat completions API.

use super::{ChatMessage, ChatModel, CompletionRequest, ModelReply, ToolInvocation, ToolSpec};
use crate::error::{Result, SprintError};
use crate::openai::create_client_with_timeout;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
    ChatCompletionRequestMessageContentPartText, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionRequestUserMessageContent, ChatCompletionRequestUserMessageContentPart,
    ChatCompletionTool, ChatCompletionToolType, CreateChatCompletionRequestArgs, FunctionCall,
    FunctionObject, ImageUrl, ResponseFormat,
};
use async_openai::Client;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// OpenAI-hosted chat model.
pub struct OpenAiChatModel {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiChatModel {
    /// Create a model client with the given default model and request timeout.
    pub fn new(model: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(timeout)?,
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    #[instrument(skip_all, fields(model))]
    async fn complete(&self, request: CompletionRequest) -> Result<ModelReply> {
        let model = request.model.clone().unwrap_or_else(|| self.model.clone());
        tracing::Span::current().record("model", model.as_str());

        let messages = request
            .messages
            .iter()
            .map(to_openai_message)
            .collect::<Result<Vec<_>>>()?;

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&model).messages(messages);
        if !request.tools.is_empty() {
            builder.tools(request.tools.iter().map(to_openai_tool).collect::<Vec<_>>());
        }
        if request.json_output {
            builder.response_format(ResponseFormat::JsonObject);
        }
        if let Some(t) = request.temperature {
            builder.temperature(t);
        }
        let api_request = builder.build().map_err(|e| SprintError::OpenAI(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(api_request)
            .await
            .map_err(|e| SprintError::OpenAI(format!("Chat completion failed: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| SprintError::OpenAI("No response from model".to_string()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolInvocation {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments,
            })
            .collect::<Vec<_>>();

        debug!("Model replied with {} tool call(s)", tool_calls.len());

        Ok(ModelReply {
            content: choice.message.content,
            tool_calls,
        })
    }
}

fn to_openai_message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage> {
    let built: ChatCompletionRequestMessage = match message {
        ChatMessage::System(text) => ChatCompletionRequestSystemMessageArgs::default()
            .content(text.clone())
            .build()
            .map_err(|e| SprintError::OpenAI(e.to_string()))?
            .into(),

        ChatMessage::User { text, attachments } if attachments.is_empty() => {
            ChatCompletionRequestUserMessageArgs::default()
                .content(text.clone())
                .build()
                .map_err(|e| SprintError::OpenAI(e.to_string()))?
                .into()
        }

        ChatMessage::User { text, attachments } => {
            let mut parts = vec![text_part(text.clone())];
            for attachment in attachments {
                if attachment.is_image() {
                    parts.push(ChatCompletionRequestUserMessageContentPart::ImageUrl(
                        ChatCompletionRequestMessageContentPartImage {
                            image_url: ImageUrl {
                                url: attachment.data_uri.clone(),
                                detail: None,
                            },
                        },
                    ));
                } else if let Some(inline) = attachment.inline_text() {
                    parts.push(text_part(format!("Attached file:\n{}", inline)));
                } else {
                    // The chat API only takes images inline.
                    parts.push(text_part(format!(
                        "[The user attached a {} file that cannot be shown inline. Ask them to paste the relevant text if you need it.]",
                        attachment.mime_type
                    )));
                }
            }
            ChatCompletionRequestUserMessageArgs::default()
                .content(ChatCompletionRequestUserMessageContent::Array(parts))
                .build()
                .map_err(|e| SprintError::OpenAI(e.to_string()))?
                .into()
        }

        ChatMessage::Assistant { content, tool_calls } => {
            let mut args = ChatCompletionRequestAssistantMessageArgs::default();
            if let Some(text) = content {
                args.content(text.clone());
            }
            if !tool_calls.is_empty() {
                args.tool_calls(
                    tool_calls
                        .iter()
                        .map(|call| ChatCompletionMessageToolCall {
                            id: call.id.clone(),
                            r#type: ChatCompletionToolType::Function,
                            function: FunctionCall {
                                name: call.name.clone(),
                                arguments: call.arguments.clone(),
                            },
                        })
                        .collect::<Vec<_>>(),
                );
            }
            args.build()
                .map_err(|e| SprintError::OpenAI(e.to_string()))?
                .into()
        }

        ChatMessage::Tool { call_id, content } => ChatCompletionRequestToolMessageArgs::default()
            .tool_call_id(call_id.clone())
            .content(content.clone())
            .build()
            .map_err(|e| SprintError::OpenAI(e.to_string()))?
            .into(),
    };
    Ok(built)
}

fn text_part(text: String) -> ChatCompletionRequestUserMessageContentPart {
    ChatCompletionRequestUserMessageContentPart::Text(ChatCompletionRequestMessageContentPartText {
        text,
    })
}

fn to_openai_tool(spec: &ToolSpec) -> ChatCompletionTool {
    ChatCompletionTool {
        r#type: ChatCompletionToolType::Function,
        function: FunctionObject {
            name: spec.name.clone(),
            description: Some(spec.description.clone()),
            parameters: Some(spec.parameters.clone()),
            strict: None,
        },
    }
}
