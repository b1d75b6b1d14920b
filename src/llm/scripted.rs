//! Test double that replays canned replies and records every request.

use super::{ChatModel, CompletionRequest, ModelReply, ToolInvocation};
use crate::error::{Result, SprintError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

enum Step {
    Reply(ModelReply),
    Fail(String),
}

#[derive(Default)]
pub(crate) struct ScriptedModel {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(self, content: &str) -> Self {
        self.push(Step::Reply(ModelReply::text(content)))
    }

    pub(crate) fn reply_json(self, value: serde_json::Value) -> Self {
        self.reply(&value.to_string())
    }

    pub(crate) fn tool_call(self, id: &str, name: &str, arguments: serde_json::Value) -> Self {
        self.push(Step::Reply(ModelReply {
            content: None,
            tool_calls: vec![ToolInvocation {
                id: id.to_string(),
                name: name.to_string(),
                arguments: arguments.to_string(),
            }],
        }))
    }

    pub(crate) fn fail(self, message: &str) -> Self {
        self.push(Step::Fail(message.to_string()))
    }

    fn push(self, step: Step) -> Self {
        self.steps.lock().unwrap().push_back(step);
        self
    }

    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, request: CompletionRequest) -> Result<ModelReply> {
        self.requests.lock().unwrap().push(request);
        match self.steps.lock().unwrap().pop_front() {
            Some(Step::Reply(reply)) => Ok(reply),
            Some(Step::Fail(message)) => Err(SprintError::OpenAI(message)),
            None => Err(SprintError::OpenAI("script exhausted".to_string())),
        }
    }
}
