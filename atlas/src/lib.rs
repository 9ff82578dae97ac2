//! # ATLAS
//!
//! Academic Task and Learning Agent System: a multi-agent assistant that
//! turns a student's request plus their profile, calendar and task documents
//! into a study plan, study notes or guidance. One shared state flows through
//! every step with a **state-in, delta-out** design: steps never mutate the
//! state they receive, they return a [`StateUpdate`] the driver merges back.
//!
//! ## Architecture
//!
//! - **Coordinator** ([`coordinator`]): one oracle call plus a heuristic
//!   parse decides which specialists the request needs and how to group them.
//! - **Specialists** ([`agents`]): Planner, NoteWriter and Advisor, each a
//!   short fixed pipeline of prompt-and-generate stages; failures degrade to
//!   placeholder payloads, never to a broken request.
//! - **Executor** ([`executor`]): runs each concurrency group's agents on
//!   forks of the state, joins them, and falls back through a last-resort
//!   planner run to a fixed emergency payload.
//! - **Workflow** ([`workflow`]): the explicit finite-state machine over one
//!   request — coordinate, analyze the profile, fan out into specialist
//!   chains, execute, and loop until every required agent has reported (or
//!   the bounded pass budget runs out).
//! - **Runner** ([`runner`]): the session facade — seed state from the
//!   [`DataManager`] documents, drive the workflow, flatten the answer.
//!
//! ## Main modules
//!
//! - [`state`]: [`SharedState`], [`StateUpdate`], [`merge_values`].
//! - [`data`]: [`DataManager`] and canonical event/task records.
//! - [`llm`]: [`LlmClient`] trait, [`ChatNvidia`], [`MockLlm`].
//! - [`prompts`]: prompt templates and worked examples per stage.
//! - [`agents`]: [`Agent`] trait, [`AgentKind`], [`AgentRegistry`], the
//!   three specialists.
//! - [`coordinator`]: [`Coordinator`], [`CoordinatorAnalysis`].
//! - [`executor`]: [`Executor`].
//! - [`workflow`]: [`Workflow`], [`WorkflowNode`], [`transition`].
//! - [`runner`]: [`AtlasRunner`], [`AtlasResponse`].

pub mod agents;
pub mod coordinator;
pub mod data;
pub mod error;
pub mod executor;
pub mod llm;
pub mod message;
pub mod prompts;
pub mod runner;
pub mod state;
pub mod workflow;

pub use agents::{Agent, AgentKind, AgentRegistry};
pub use coordinator::{Coordinator, CoordinatorAnalysis};
pub use data::{DataError, DataManager, DEFAULT_HORIZON_DAYS};
pub use error::AgentError;
pub use executor::Executor;
pub use llm::{ChatNvidia, LlmClient, LlmConfig, LlmError, MockLlm};
pub use message::Message;
pub use runner::{AtlasResponse, AtlasRunner};
pub use state::{merge_values, SharedState, StateUpdate};
pub use workflow::{transition, Workflow, WorkflowNode};
