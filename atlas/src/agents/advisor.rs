//! Advisor: situation analysis → personalized academic guidance.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::warn;

use crate::error::AgentError;
use crate::llm::LlmClient;
use crate::message::Message;
use crate::prompts;
use crate::state::{SharedState, StateUpdate};

use super::{Agent, AgentKind};

const GUIDANCE_ERROR_PLACEHOLDER: &str = "Error generating guidance. Please try again.";

/// Guidance specialist: two stages, each one oracle call.
pub struct Advisor {
    llm: Arc<dyn LlmClient>,
}

impl Advisor {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Assesses the student's situation; writes `results.situation_analysis`.
    pub async fn analyze_situation(&self, state: &SharedState) -> Result<StateUpdate, AgentError> {
        let learning_prefs = state
            .profile
            .get("learning_preferences")
            .cloned()
            .unwrap_or_else(|| json!({}));
        let request = state
            .latest_message()
            .map(|m| m.content())
            .ok_or_else(|| AgentError::MissingField("messages".to_string()))?;

        let prompt = prompts::situation_analysis_prompt(&state.profile, &learning_prefs, request);
        let response = self
            .llm
            .generate(&[Message::system(prompt)], None)
            .await?;

        Ok(StateUpdate::results(json!({
            "situation_analysis": { "analysis": response }
        })))
    }

    /// Turns the analysis into structured advice; writes `results.guidance`.
    pub async fn generate_guidance(&self, state: &SharedState) -> Result<StateUpdate, AgentError> {
        let analysis = state
            .result("situation_analysis")
            .cloned()
            .unwrap_or_else(|| json!(""));

        let prompt = prompts::guidance_prompt(&analysis);
        let response = self
            .llm
            .generate(&[Message::system(prompt)], None)
            .await?;

        Ok(StateUpdate::results(json!({
            "guidance": { "advice": response }
        })))
    }

    async fn pipeline(&self, state: &SharedState) -> Result<Value, AgentError> {
        let mut fork = state.clone();
        fork.apply(self.analyze_situation(&fork).await?);
        fork.apply(self.generate_guidance(&fork).await?);

        let guidance = fork.result("guidance").cloned().unwrap_or(Value::Null);
        // The metadata flags are constants carried for display, not derived.
        Ok(json!({
            "advisor_output": {
                "guidance": guidance,
                "metadata": {
                    "course_specific": true,
                    "considers_learning_style": true
                }
            }
        }))
    }
}

#[async_trait]
impl Agent for Advisor {
    fn kind(&self) -> AgentKind {
        AgentKind::Advisor
    }

    async fn run(&self, state: &SharedState) -> Result<Value, AgentError> {
        match self.pipeline(state).await {
            Ok(payload) => Ok(payload),
            Err(error) => {
                warn!(%error, "advisor pipeline failed, degrading to placeholder");
                Ok(json!({
                    "advisor_output": { "guidance": GUIDANCE_ERROR_PLACEHOLDER }
                }))
            }
        }
    }
}
