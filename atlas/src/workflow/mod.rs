//! Top-level workflow: an explicit finite-state machine over the request.
//!
//! Nodes and edges are static: coordinator → profile analysis → fan-out into
//! the required specialists' chains → execute → loop or terminate. The
//! driver suspends at each node's oracle call and joins concurrent chains
//! with an all-of join on forked states; a failed branch is dropped with a
//! warning, never a crash.
//!
//! The loop-back edge is bounded: when a required agent keeps failing (so
//! its output never lands in `agent_outputs`), the termination check can
//! never pass, and `max_passes` is what ends the request — with a degraded
//! answer, not an error.

mod profile;

pub use profile::ProfileAnalyzer;

use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, warn};

use crate::agents::{Advisor, AgentKind, AgentRegistry, NoteWriter, Planner};
use crate::coordinator::{Coordinator, CoordinatorAnalysis};
use crate::error::AgentError;
use crate::executor::Executor;
use crate::llm::LlmClient;
use crate::state::{SharedState, StateUpdate};

/// Upper bound on coordinator passes for one request.
pub const DEFAULT_MAX_PASSES: usize = 3;

/// Every node of the workflow graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowNode {
    Coordinator,
    ProfileAnalyzer,
    CalendarAnalyzer,
    TaskAnalyzer,
    PlanGenerator,
    NotewriterAnalyze,
    NotewriterGenerate,
    AdvisorAnalyze,
    AdvisorGenerate,
    Execute,
}

/// Where the graph goes after a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// One successor.
    Next(WorkflowNode),
    /// Concurrent successors: the entry node of every required chain.
    Fanout(Vec<WorkflowNode>),
    /// End of a branch chain: rejoin the driver at the execute node.
    Converge,
    /// All required agents have reported; the request is done.
    End,
}

/// The pure transition function of the state machine.
pub fn transition(state: &SharedState, node: WorkflowNode) -> Transition {
    use WorkflowNode::*;
    match node {
        Coordinator => Transition::Next(ProfileAnalyzer),
        ProfileAnalyzer => Transition::Fanout(route_to_chains(state)),
        CalendarAnalyzer => Transition::Next(TaskAnalyzer),
        TaskAnalyzer => Transition::Next(PlanGenerator),
        NotewriterAnalyze => Transition::Next(NotewriterGenerate),
        AdvisorAnalyze => Transition::Next(AdvisorGenerate),
        PlanGenerator | NotewriterGenerate | AdvisorGenerate => Transition::Converge,
        Execute => {
            if all_required_executed(state) {
                Transition::End
            } else {
                Transition::Next(Coordinator)
            }
        }
    }
}

/// Chain entry nodes for the coordinator's required agents, in the fixed
/// Planner / NoteWriter / Advisor order; the planner chain is the default
/// when nothing matches.
fn route_to_chains(state: &SharedState) -> Vec<WorkflowNode> {
    let required = CoordinatorAnalysis::from_state(state).required_agents;
    let mut entries = Vec::new();
    if required.contains(&AgentKind::Planner) {
        entries.push(WorkflowNode::CalendarAnalyzer);
    }
    if required.contains(&AgentKind::NoteWriter) {
        entries.push(WorkflowNode::NotewriterAnalyze);
    }
    if required.contains(&AgentKind::Advisor) {
        entries.push(WorkflowNode::AdvisorAnalyze);
    }
    if entries.is_empty() {
        entries.push(WorkflowNode::CalendarAnalyzer);
    }
    entries
}

/// Termination check: lowercased required set ⊆ `agent_outputs` keys.
fn all_required_executed(state: &SharedState) -> bool {
    let required = CoordinatorAnalysis::from_state(state).required_agents;
    let executed = state
        .result("agent_outputs")
        .and_then(Value::as_object)
        .map(|outputs| outputs.keys().cloned().collect::<Vec<_>>())
        .unwrap_or_default();
    required
        .iter()
        .all(|kind| executed.iter().any(|key| key == kind.output_key()))
}

/// The workflow driver: owns the coordinator, the specialists (both as chain
/// stages and as executor-registered agents), and the executor.
pub struct Workflow {
    coordinator: Coordinator,
    profile_analyzer: ProfileAnalyzer,
    planner: Arc<Planner>,
    notewriter: Arc<NoteWriter>,
    advisor: Arc<Advisor>,
    executor: Executor,
    max_passes: usize,
}

impl Workflow {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        let planner = Arc::new(Planner::new(Arc::clone(&llm)));
        let notewriter = Arc::new(NoteWriter::new(Arc::clone(&llm)));
        let advisor = Arc::new(Advisor::new(Arc::clone(&llm)));
        let registry = AgentRegistry::new()
            .with_agent(Arc::clone(&planner) as Arc<dyn crate::agents::Agent>)
            .with_agent(Arc::clone(&notewriter) as Arc<dyn crate::agents::Agent>)
            .with_agent(Arc::clone(&advisor) as Arc<dyn crate::agents::Agent>);
        Self {
            coordinator: Coordinator::new(Arc::clone(&llm)),
            profile_analyzer: ProfileAnalyzer::new(llm),
            planner,
            notewriter,
            advisor,
            executor: Executor::new(registry),
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    /// Overrides the coordinator pass budget.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }

    /// Drives the state machine to completion (or to the pass budget) and
    /// returns the final state. Never errors: every failure degrades.
    pub async fn run(&self, mut state: SharedState) -> SharedState {
        for pass in 1..=self.max_passes {
            debug!(pass, "workflow pass starting");
            state.apply(self.coordinator.coordinate(&state).await);

            match self.profile_analyzer.analyze(&state).await {
                Ok(update) => state.apply(update),
                Err(error) => {
                    warn!(%error, "profile analysis failed, continuing without it");
                }
            }

            let entries = match transition(&state, WorkflowNode::ProfileAnalyzer) {
                Transition::Fanout(entries) => entries,
                _ => vec![WorkflowNode::CalendarAnalyzer],
            };
            let chains = entries
                .iter()
                .map(|entry| self.run_chain(*entry, state.clone()));
            for (entry, result) in entries.iter().zip(join_all(chains).await) {
                match result {
                    Ok(updates) => {
                        for update in updates {
                            state.apply(update);
                        }
                    }
                    Err(error) => {
                        warn!(entry = ?entry, %error, "chain failed, dropping its branch");
                    }
                }
            }

            state.apply(self.executor.execute(&state).await);

            match transition(&state, WorkflowNode::Execute) {
                Transition::End => return state,
                _ if pass == self.max_passes => {
                    warn!(
                        passes = pass,
                        "pass budget exhausted before all required agents reported; \
                         returning degraded state"
                    );
                }
                _ => {}
            }
        }
        state
    }

    /// Walks one linear chain on a fork, returning the collected deltas.
    /// Stops when the transition converges at the execute node.
    async fn run_chain(
        &self,
        entry: WorkflowNode,
        mut fork: SharedState,
    ) -> Result<Vec<StateUpdate>, AgentError> {
        let mut node = entry;
        let mut collected = Vec::new();
        loop {
            let update = self.run_stage(node, &fork).await?;
            fork.apply(update.clone());
            collected.push(update);

            match transition(&fork, node) {
                Transition::Next(next) => node = next,
                Transition::Converge | Transition::Fanout(_) | Transition::End => {
                    return Ok(collected)
                }
            }
        }
    }

    async fn run_stage(
        &self,
        node: WorkflowNode,
        state: &SharedState,
    ) -> Result<StateUpdate, AgentError> {
        use WorkflowNode::*;
        match node {
            CalendarAnalyzer => self.planner.analyze_calendar(state).await,
            TaskAnalyzer => self.planner.analyze_tasks(state).await,
            PlanGenerator => self.planner.generate_plan(state).await,
            NotewriterAnalyze => self.notewriter.analyze_learning_style(state).await,
            NotewriterGenerate => self.notewriter.generate_notes(state).await,
            AdvisorAnalyze => self.advisor.analyze_situation(state).await,
            AdvisorGenerate => self.advisor.generate_guidance(state).await,
            // Control nodes are driven directly by run(), never as a stage.
            Coordinator | ProfileAnalyzer | Execute => Ok(StateUpdate::default()),
        }
    }
}
