//! Initial learning plan for a new learner.

use super::{require, require_output, vars, FlowRunner};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInput {
    pub user_skill_level: String,
    pub user_learning_goals: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOutput {
    /// Markdown plan.
    pub learning_plan: String,
}

impl FlowRunner {
    #[instrument(skip_all)]
    pub async fn generate_initial_learning_plan(&self, input: &PlanInput) -> Result<PlanOutput> {
        require("userSkillLevel", &input.user_skill_level)?;
        require("userLearningGoals", &input.user_learning_goals)?;
        let output: PlanOutput = self
            .run(
                "learning_plan",
                &self.prompts().plan,
                vars([
                    ("skill_level", input.user_skill_level.clone()),
                    ("learning_goals", input.user_learning_goals.clone()),
                ]),
                Vec::new(),
            )
            .await?;
        require_output("learning_plan", "learningPlan", &output.learning_plan)?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Prompts;
    use crate::llm::scripted::ScriptedModel;
    use crate::llm::ChatMessage;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_plan_renders_inputs() {
        let model = Arc::new(
            ScriptedModel::new().reply(r#"{"learningPlan": "**Week 1**\n- Learn JSX"}"#),
        );
        let runner = FlowRunner::new(model.clone(), Prompts::default());
        let out = runner
            .generate_initial_learning_plan(&PlanInput {
                user_skill_level: "Beginner".to_string(),
                user_learning_goals: "Build a React app".to_string(),
            })
            .await
            .unwrap();
        assert!(out.learning_plan.starts_with("**Week 1**"));

        match &model.requests()[0].messages[1] {
            ChatMessage::User { text, .. } => {
                assert!(text.contains("Current Skill Level: Beginner"));
                assert!(text.contains("Learning Goals: Build a React app"));
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }
}
