//! Profile analysis stage: the first thing that runs after coordination.

use std::sync::Arc;

use serde_json::json;

use crate::error::AgentError;
use crate::llm::LlmClient;
use crate::message::Message;
use crate::prompts;
use crate::state::{SharedState, StateUpdate};

/// Extracts learning patterns from the raw profile; every specialist chain
/// downstream reads `results.profile_analysis`.
pub struct ProfileAnalyzer {
    llm: Arc<dyn LlmClient>,
}

impl ProfileAnalyzer {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn analyze(&self, state: &SharedState) -> Result<StateUpdate, AgentError> {
        let messages = [
            Message::system(prompts::PROFILE_ANALYZER_PROMPT),
            Message::user(serde_json::to_string(&state.profile)?),
        ];
        let response = self.llm.generate(&messages, None).await?;

        Ok(StateUpdate::results(json!({
            "profile_analysis": { "analysis": response }
        })))
    }
}
