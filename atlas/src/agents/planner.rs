//! Planner: calendar analysis → task analysis → study plan.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tracing::warn;

use crate::data::parse_datetime_utc;
use crate::error::AgentError;
use crate::llm::LlmClient;
use crate::message::Message;
use crate::prompts;
use crate::state::{SharedState, StateUpdate};

use super::{Agent, AgentKind};

const NO_PLAN_PLACEHOLDER: &str = "No plan generated";
const PLAN_ERROR_PLACEHOLDER: &str = "Error generating plan. Please try again.";

/// Study-plan specialist: three stages, each one oracle call.
pub struct Planner {
    llm: Arc<dyn LlmClient>,
}

impl Planner {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Analyzes the next 7 days of calendar events; writes
    /// `results.calendar_analysis`.
    pub async fn analyze_calendar(&self, state: &SharedState) -> Result<StateUpdate, AgentError> {
        let now = Utc::now();
        let future = now + Duration::days(7);
        let events: Vec<&Value> = state
            .calendar
            .get("events")
            .and_then(Value::as_array)
            .map(|events| {
                events
                    .iter()
                    .filter(|event| {
                        event
                            .pointer("/start/dateTime")
                            .and_then(Value::as_str)
                            .and_then(|stamp| parse_datetime_utc(stamp).ok())
                            .is_some_and(|start| now <= start && start <= future)
                    })
                    .collect()
            })
            .unwrap_or_default();

        let messages = [
            Message::system(prompts::CALENDAR_ANALYSIS_PROMPT),
            Message::user(serde_json::to_string(&events)?),
        ];
        let response = self.llm.generate(&messages, None).await?;

        Ok(StateUpdate::results(json!({
            "calendar_analysis": { "analysis": response }
        })))
    }

    /// Analyzes the task load; writes `results.task_analysis`.
    pub async fn analyze_tasks(&self, state: &SharedState) -> Result<StateUpdate, AgentError> {
        // assignments is the historical key, tasks the canonical one.
        let tasks = state
            .tasks
            .get("assignments")
            .and_then(Value::as_array)
            .filter(|list| !list.is_empty())
            .or_else(|| state.tasks.get("tasks").and_then(Value::as_array))
            .cloned()
            .unwrap_or_default();

        let messages = [
            Message::system(prompts::TASK_ANALYSIS_PROMPT),
            Message::user(serde_json::to_string(&tasks)?),
        ];
        let response = self.llm.generate(&messages, None).await?;

        Ok(StateUpdate::results(json!({
            "task_analysis": { "analysis": response }
        })))
    }

    /// Combines the three prior analyses into a plan; writes
    /// `results.final_plan`.
    pub async fn generate_plan(&self, state: &SharedState) -> Result<StateUpdate, AgentError> {
        let profile_analysis = require_result(state, "profile_analysis")?;
        let calendar_analysis = require_result(state, "calendar_analysis")?;
        let task_analysis = require_result(state, "task_analysis")?;
        let request = state
            .latest_message()
            .ok_or_else(|| AgentError::MissingField("messages".to_string()))?;

        let prompt =
            prompts::plan_generation_prompt(profile_analysis, calendar_analysis, task_analysis);
        let messages = [Message::system(prompt), Message::user(request.content())];
        let response = self.llm.generate(&messages, Some(0.5)).await?;

        Ok(StateUpdate::results(json!({
            "final_plan": { "plan": response }
        })))
    }

    async fn pipeline(&self, state: &SharedState) -> Result<Value, AgentError> {
        let mut fork = state.clone();
        fork.apply(self.analyze_calendar(&fork).await?);
        fork.apply(self.analyze_tasks(&fork).await?);
        fork.apply(self.generate_plan(&fork).await?);

        let plan = fork
            .result("final_plan")
            .and_then(|p| p.get("plan"))
            .and_then(Value::as_str)
            .unwrap_or(NO_PLAN_PLACEHOLDER);
        Ok(json!({ "notes": plan }))
    }
}

#[async_trait]
impl Agent for Planner {
    fn kind(&self) -> AgentKind {
        AgentKind::Planner
    }

    async fn run(&self, state: &SharedState) -> Result<Value, AgentError> {
        match self.pipeline(state).await {
            Ok(payload) => Ok(payload),
            Err(error) => {
                warn!(%error, "planner pipeline failed, degrading to placeholder");
                Ok(json!({ "notes": PLAN_ERROR_PLACEHOLDER }))
            }
        }
    }
}

fn require_result<'a>(state: &'a SharedState, stage: &str) -> Result<&'a Value, AgentError> {
    state
        .result(stage)
        .ok_or_else(|| AgentError::MissingField(format!("results.{}", stage)))
}
