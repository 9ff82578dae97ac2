//! Shared academic state threaded through every workflow step.
//!
//! One [`SharedState`] is constructed per incoming request, seeded with the
//! student's profile/calendar/task snapshots and the request message, then
//! handed (by clone, for concurrent participants) to the coordinator, the
//! specialist pipelines and the executor. Steps never mutate the state they
//! receive; they return a [`StateUpdate`] delta that the driver merges back
//! with the per-field policies declared here:
//!
//! - `messages`: append-only, chronological, never reordered;
//! - `profile`/`calendar`/`tasks`/`results`: recursive key-wise merge
//!   ([`merge_values`]) — later writers override leaves, sibling keys
//!   survive, nothing is ever deleted.
//!
//! The `results` map is the coordination substrate: every stage writes its
//! output under a stage name (`coordinator_analysis`, `calendar_analysis`,
//! `agent_outputs`, ...) and every later stage can still see it.

mod merge;

pub use merge::merge_values;

use serde_json::{Map, Value};

use crate::message::Message;

/// The single state record passed through coordinator, agents and executor.
///
/// Map fields are free-form JSON objects; the typed views (canonical
/// event/task records, `CoordinatorAnalysis`) live at the edges that
/// produce and consume them.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SharedState {
    /// Conversation so far; the last entry is the current request or reply.
    pub messages: Vec<Message>,
    /// Student profile snapshot (major, learning preferences, courses, ...).
    pub profile: Value,
    /// Calendar snapshot; `events` holds canonical event records.
    pub calendar: Value,
    /// Task snapshot; `tasks` holds canonical task records.
    pub tasks: Value,
    /// Stage-name → output payload; append/deep-merge only.
    pub results: Value,
}

impl Default for SharedState {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            profile: Value::Object(Map::new()),
            calendar: Value::Object(Map::new()),
            tasks: Value::Object(Map::new()),
            results: Value::Object(Map::new()),
        }
    }
}

impl SharedState {
    /// State for a fresh request: one user message, empty snapshots.
    pub fn for_request(request: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(request)],
            ..Self::default()
        }
    }

    /// The most recent conversation entry, if any.
    pub fn latest_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// A named entry of the `results` map (e.g. `"coordinator_analysis"`).
    pub fn result(&self, stage: &str) -> Option<&Value> {
        self.results.get(stage)
    }

    /// Merges a step's delta back into this state, field by field.
    pub fn apply(&mut self, update: StateUpdate) {
        self.messages.extend(update.messages);
        if let Some(patch) = update.profile {
            merge_values(&mut self.profile, patch);
        }
        if let Some(patch) = update.calendar {
            merge_values(&mut self.calendar, patch);
        }
        if let Some(patch) = update.tasks {
            merge_values(&mut self.tasks, patch);
        }
        if let Some(patch) = update.results {
            merge_values(&mut self.results, patch);
        }
    }
}

/// Partial state returned by one workflow step, merged via [`SharedState::apply`].
///
/// `messages` entries are appended; each `Some` map patch deep-merges into
/// the matching field. Most stages only populate `results`.
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub messages: Vec<Message>,
    pub profile: Option<Value>,
    pub calendar: Option<Value>,
    pub tasks: Option<Value>,
    pub results: Option<Value>,
}

impl StateUpdate {
    /// Update that only patches the `results` map — the common stage shape.
    pub fn results(patch: Value) -> Self {
        Self {
            results: Some(patch),
            ..Self::default()
        }
    }

    /// Update that only appends one message.
    pub fn message(message: Message) -> Self {
        Self {
            messages: vec![message],
            ..Self::default()
        }
    }
}
