//! Session facade: data documents in, finished answer out.
//!
//! [`AtlasRunner`] owns the loaded [`DataManager`] and a workflow over one
//! oracle. Each `ask` seeds a fresh [`SharedState`] from the student's
//! documents, drives the workflow to completion and renders the agent
//! outputs into a plain-text answer.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::agents::AgentKind;
use crate::coordinator::CoordinatorAnalysis;
use crate::data::{DataManager, DEFAULT_HORIZON_DAYS};
use crate::llm::LlmClient;
use crate::state::SharedState;
use crate::workflow::Workflow;

pub const DEFAULT_STUDENT_ID: &str = "student_123";

/// One finished request: the full final state plus the two views the
/// session layer displays.
pub struct AtlasResponse {
    pub state: SharedState,
    pub analysis: CoordinatorAnalysis,
    pub answer: String,
}

/// Entry point for sessions: construct once, `ask` per request.
pub struct AtlasRunner {
    data: DataManager,
    workflow: Workflow,
    student_id: String,
    horizon_days: i64,
}

impl AtlasRunner {
    pub fn new(data: DataManager, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            data,
            workflow: Workflow::new(llm),
            student_id: DEFAULT_STUDENT_ID.to_string(),
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }

    pub fn with_student(mut self, student_id: impl Into<String>) -> Self {
        self.student_id = student_id.into();
        self
    }

    pub fn with_horizon_days(mut self, horizon_days: i64) -> Self {
        self.horizon_days = horizon_days;
        self
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.workflow = self.workflow.with_max_passes(max_passes);
        self
    }

    /// Runs one request end to end. Never errors: an unknown student id
    /// seeds an empty profile and the workflow degrades from there.
    pub async fn ask(&self, request: &str) -> AtlasResponse {
        let mut state = SharedState::for_request(request);
        state.profile = self
            .data
            .student_profile(&self.student_id)
            .cloned()
            .unwrap_or_else(|| json!({}));
        state.calendar = json!({
            "events": self
                .data
                .upcoming_events(self.horizon_days)
                .iter()
                .map(|event| event.to_value())
                .collect::<Vec<_>>()
        });
        state.tasks = json!({
            "tasks": self
                .data
                .active_tasks()
                .iter()
                .map(|task| task.to_value())
                .collect::<Vec<_>>()
        });

        let state = self.workflow.run(state).await;
        let analysis = CoordinatorAnalysis::from_state(&state);
        let answer = flatten_outputs(&state);
        AtlasResponse {
            state,
            analysis,
            answer,
        }
    }
}

/// Renders `results.agent_outputs` as console text: one uppercase header per
/// agent in the fixed Planner / NoteWriter / Advisor order, followed by the
/// payload's string leaves, flattened two object-levels deep.
pub fn flatten_outputs(state: &SharedState) -> String {
    let outputs = match state.result("agent_outputs").and_then(Value::as_object) {
        Some(outputs) => outputs,
        None => return String::new(),
    };

    let mut sections = Vec::new();
    for kind in AgentKind::ALL {
        if let Some(payload) = outputs.get(kind.output_key()) {
            let mut lines = Vec::new();
            collect_strings(payload, 2, &mut lines);
            sections.push(format!(
                "{} Output:\n{}",
                kind.wire_name(),
                lines.join("\n")
            ));
        }
    }
    sections.join("\n\n")
}

fn collect_strings(value: &Value, depth: usize, lines: &mut Vec<String>) {
    match value {
        Value::String(text) => lines.push(text.clone()),
        Value::Object(map) if depth > 0 => {
            for nested in map.values() {
                collect_strings(nested, depth - 1, lines);
            }
        }
        _ => {}
    }
}
