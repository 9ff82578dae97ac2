//! Specialist agents and their composition-time registry.
//!
//! Each specialist (Planner, NoteWriter, Advisor) is a short fixed pipeline
//! of prompt-and-generate stages over [`SharedState`]. The stages are public
//! — the top-level workflow runs them as its own nodes — and [`Agent::run`]
//! composes them on a fork of the state for the executor's grouped runs.
//!
//! Failure policy: stages return tagged [`AgentError`]s; the `run` boundary
//! degrades a failed pipeline to the agent's fixed placeholder payload
//! instead of propagating, so a broken oracle never breaks the request.

mod advisor;
mod notewriter;
mod planner;

pub use advisor::Advisor;
pub use notewriter::NoteWriter;
pub use planner::Planner;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AgentError;
use crate::llm::LlmClient;
use crate::state::SharedState;

/// The closed set of specialist agents.
///
/// Wire names (coordinator analysis, serde) are uppercase; output keys in
/// `results.agent_outputs` are lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum AgentKind {
    #[serde(rename = "PLANNER")]
    Planner,
    #[serde(rename = "NOTEWRITER")]
    NoteWriter,
    #[serde(rename = "ADVISOR")]
    Advisor,
}

impl AgentKind {
    pub const ALL: [AgentKind; 3] = [Self::Planner, Self::NoteWriter, Self::Advisor];

    /// Uppercase name used in coordinator analyses.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Planner => "PLANNER",
            Self::NoteWriter => "NOTEWRITER",
            Self::Advisor => "ADVISOR",
        }
    }

    /// Lowercase key under `results.agent_outputs`.
    pub fn output_key(&self) -> &'static str {
        match self {
            Self::Planner => "planner",
            Self::NoteWriter => "notewriter",
            Self::Advisor => "advisor",
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// One runnable specialist: fork of the shared state in, output payload out.
///
/// The payload lands under [`AgentKind::output_key`] in
/// `results.agent_outputs`. Concrete specialists degrade internal pipeline
/// failures to placeholder payloads; an `Err` from `run` is still tolerated
/// by the executor (dropped with a warning), which matters for test doubles
/// and future agents with different policies.
#[async_trait]
pub trait Agent: Send + Sync {
    fn kind(&self) -> AgentKind;

    async fn run(&self, state: &SharedState) -> Result<Value, AgentError>;
}

/// Explicit `AgentKind → implementation` mapping, built once at composition
/// time and passed to the executor. No global registry, no late mutation.
#[derive(Clone, Default)]
pub struct AgentRegistry {
    agents: HashMap<AgentKind, Arc<dyn Agent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with all three specialists over the given oracle.
    pub fn full(llm: Arc<dyn LlmClient>) -> Self {
        Self::new()
            .with_agent(Arc::new(Planner::new(Arc::clone(&llm))))
            .with_agent(Arc::new(NoteWriter::new(Arc::clone(&llm))))
            .with_agent(Arc::new(Advisor::new(llm)))
    }

    /// Registers one agent under its own kind, replacing any previous entry.
    pub fn with_agent(mut self, agent: Arc<dyn Agent>) -> Self {
        self.agents.insert(agent.kind(), agent);
        self
    }

    pub fn get(&self, kind: AgentKind) -> Option<&Arc<dyn Agent>> {
        self.agents.get(&kind)
    }

    pub fn contains(&self, kind: AgentKind) -> bool {
        self.agents.contains_key(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlm;
    use serde_json::json;

    /// **Scenario**: wire names round-trip through serde as the uppercase
    /// strings coordinator analyses carry.
    #[test]
    fn agent_kind_serde_uses_wire_names() {
        assert_eq!(serde_json::to_value(AgentKind::NoteWriter).unwrap(), json!("NOTEWRITER"));
        let kind: AgentKind = serde_json::from_value(json!("ADVISOR")).unwrap();
        assert_eq!(kind, AgentKind::Advisor);
        assert!(serde_json::from_value::<AgentKind>(json!("PROFESSOR")).is_err());
    }

    /// **Scenario**: output keys are the lowercased wire names used by the
    /// executor and the termination check.
    #[test]
    fn output_keys_are_lowercased_wire_names() {
        for kind in AgentKind::ALL {
            assert_eq!(kind.output_key(), kind.wire_name().to_lowercase());
        }
    }

    /// **Scenario**: the full registry answers all three kinds; an empty one
    /// answers none.
    #[test]
    fn full_registry_contains_every_specialist() {
        let llm: Arc<dyn crate::llm::LlmClient> = Arc::new(MockLlm::with_responses(["ok"]));
        let registry = AgentRegistry::full(llm);
        for kind in AgentKind::ALL {
            assert!(registry.contains(kind), "missing {}", kind);
            assert_eq!(registry.get(kind).unwrap().kind(), kind);
        }
        assert!(!AgentRegistry::new().contains(AgentKind::Planner));
    }
}
