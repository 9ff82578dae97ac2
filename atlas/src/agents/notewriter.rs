//! NoteWriter: learning-style analysis → personalized study notes.

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

const NOTES_ERROR_PLACEHOLDER: &str = "Error generating notes. Please try again.";

/// Study-material specialist: two stages, each one oracle call.
pub struct NoteWriter {
    llm: Arc<dyn LlmClient>,
}

impl NoteWriter {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Determines note structure from the learning style and the request;
    /// writes `results.learning_analysis`.
    pub async fn analyze_learning_style(
        &self,
        state: &SharedState,
    ) -> Result<StateUpdate, AgentError> {
        let learning_style = learning_style(state)?;
        let request = latest_request(state)?;

        let prompt = prompts::learning_style_prompt(learning_style, request);
        let response = self
            .llm
            .generate(&[Message::system(prompt)], None)
            .await?;

        Ok(StateUpdate::results(json!({
            "learning_analysis": { "analysis": response }
        })))
    }

    /// Generates the notes from the analysis; writes
    /// `results.generated_notes`.
    pub async fn generate_notes(&self, state: &SharedState) -> Result<StateUpdate, AgentError> {
        // Absent analysis degrades to an empty context, as the original did.
        let analysis = state
            .result("learning_analysis")
            .cloned()
            .unwrap_or_else(|| json!(""));
        let learning_style = learning_style(state)?;
        let request = latest_request(state)?;

        let prompt = prompts::note_generation_prompt(&analysis, learning_style, request);
        let response = self
            .llm
            .generate(&[Message::system(prompt)], None)
            .await?;

        Ok(StateUpdate::results(json!({
            "generated_notes": { "notes": response }
        })))
    }

    async fn pipeline(&self, state: &SharedState) -> Result<Value, AgentError> {
        let mut fork = state.clone();
        fork.apply(self.analyze_learning_style(&fork).await?);
        fork.apply(self.generate_notes(&fork).await?);

        let notes = fork
            .result("generated_notes")
            .cloned()
            .unwrap_or(Value::Null);
        Ok(json!({ "notes": notes }))
    }
}

#[async_trait]
impl Agent for NoteWriter {
    fn kind(&self) -> AgentKind {
        AgentKind::NoteWriter
    }

    async fn run(&self, state: &SharedState) -> Result<Value, AgentError> {
        match self.pipeline(state).await {
            Ok(payload) => Ok(payload),
            Err(error) => {
                warn!(%error, "notewriter pipeline failed, degrading to placeholder");
                Ok(json!({ "notes": NOTES_ERROR_PLACEHOLDER }))
            }
        }
    }
}

fn learning_style(state: &SharedState) -> Result<&Value, AgentError> {
    state
        .profile
        .pointer("/learning_preferences/learning_style")
        .ok_or_else(|| {
            AgentError::MissingField("profile.learning_preferences.learning_style".to_string())
        })
}

fn latest_request(state: &SharedState) -> Result<&str, AgentError> {
    state
        .latest_message()
        .map(|m| m.content())
        .ok_or_else(|| AgentError::MissingField("messages".to_string()))
}
