//! Executor: grouped concurrent agent runs with graceful degradation.
//!
//! Reads the coordinator analysis, runs each concurrency group's required and
//! registered agents on forks of the state, joins each group before the next
//! starts, and drops failed runs with a warning. If nothing at all succeeds
//! the planner runs alone as a last resort, and if even that fails the fixed
//! emergency payload comes back. `execute` never returns an error.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::{json, Map, Value};
use tracing::warn;

use crate::agents::{AgentKind, AgentRegistry};
use crate::coordinator::CoordinatorAnalysis;
use crate::state::{SharedState, StateUpdate};

/// Fixed payload for a total execution failure.
fn emergency_outputs() -> Value {
    json!({
        "agent_outputs": {
            "planner": {
                "plan": "Emergency fallback plan: Please try again or contact support."
            }
        }
    })
}

/// Runs the agents the coordinator asked for.
pub struct Executor {
    registry: AgentRegistry,
}

impl Executor {
    pub fn new(registry: AgentRegistry) -> Self {
        Self { registry }
    }

    /// Produces the `results.agent_outputs` delta for the current state.
    pub async fn execute(&self, state: &SharedState) -> StateUpdate {
        let analysis = CoordinatorAnalysis::from_state(state);
        let mut outputs = Map::new();

        for group in &analysis.concurrent_groups {
            // Only the intersection of the group, the required set and the
            // registry runs; each agent gets its own fork.
            let runs: Vec<(AgentKind, _)> = group
                .iter()
                .filter(|kind| analysis.required_agents.contains(kind))
                .filter_map(|kind| {
                    self.registry
                        .get(*kind)
                        .map(|agent| (*kind, Arc::clone(agent)))
                })
                .map(|(kind, agent)| {
                    let fork = state.clone();
                    (kind, async move { agent.run(&fork).await })
                })
                .collect();

            let (kinds, futures): (Vec<_>, Vec<_>) = runs.into_iter().unzip();
            for (kind, result) in kinds.into_iter().zip(join_all(futures).await) {
                match result {
                    Ok(payload) => {
                        outputs.insert(kind.output_key().to_string(), payload);
                    }
                    Err(error) => {
                        warn!(agent = %kind, %error, "agent run failed, dropping its output");
                    }
                }
            }
        }

        if outputs.is_empty() {
            if let Some(planner) = self.registry.get(AgentKind::Planner) {
                match planner.run(state).await {
                    Ok(payload) => {
                        outputs.insert(AgentKind::Planner.output_key().to_string(), payload);
                    }
                    Err(error) => {
                        warn!(%error, "last-resort planner run failed");
                    }
                }
            }
        }

        if outputs.is_empty() {
            warn!("no agent produced output, returning emergency fallback plan");
            return StateUpdate::results(emergency_outputs());
        }

        StateUpdate::results(json!({ "agent_outputs": outputs }))
    }
}
