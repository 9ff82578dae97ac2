//! Data access for the three student JSON documents.
//!
//! [`DataManager`] loads profile, calendar and task documents and normalizes
//! the two historical record layouts into one canonical shape immediately at
//! load, so nothing downstream ever branches on field layout again:
//!
//! - events: either `date` + `time` range (only the range's start bound is
//!   the instant) or an absolute `start.dateTime`;
//! - tasks: either `due_date` + `due_time` or an absolute `due`, sourced from
//!   the `assignments` array with `tasks` as the fallback key.
//!
//! Records matching neither layout are silently excluded; records whose
//! timestamp fields fail to parse are skipped with a warning. JSON syntax
//! errors in the documents themselves do fail the load — that is the one
//! data error a caller sees.

mod datetime;

pub use datetime::parse_datetime_utc;

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::warn;

/// Default look-ahead window for [`DataManager::upcoming_events`], in days.
pub const DEFAULT_HORIZON_DAYS: i64 = 7;

/// Error loading the three JSON documents.
#[derive(Debug, Error)]
pub enum DataError {
    /// One of the documents is not valid JSON.
    #[error("invalid {document} JSON: {source}")]
    Json {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Status tag carried by task records.
///
/// Anything outside the three active tags counts as done (or unknown) and is
/// filtered out of [`DataManager::active_tasks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    NeedsAction,
    Completed,
    Other,
}

impl TaskStatus {
    fn parse(raw: &str) -> Self {
        match raw {
            "not_started" => Self::NotStarted,
            "in_progress" => Self::InProgress,
            "needsAction" => Self::NeedsAction,
            "completed" | "done" => Self::Completed,
            _ => Self::Other,
        }
    }

    /// True for the "not yet done" set.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::NotStarted | Self::InProgress | Self::NeedsAction)
    }
}

/// Canonical calendar event: the source metadata plus a guaranteed UTC start.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// Parsed start instant, always UTC.
    pub start: DateTime<Utc>,
    fields: Map<String, Value>,
}

impl EventRecord {
    /// JSON form with the `start` object rewritten to the canonical
    /// `{"dateTime": <RFC 3339 UTC>}`; all other source fields survive.
    pub fn to_value(&self) -> Value {
        let mut fields = self.fields.clone();
        fields.insert(
            "start".to_string(),
            json!({ "dateTime": self.start.to_rfc3339() }),
        );
        Value::Object(fields)
    }
}

/// Canonical task: the source metadata plus parsed due instant and status.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    /// Parsed due instant, always UTC.
    pub due: DateTime<Utc>,
    /// Parsed status tag; the raw string stays in the metadata.
    pub status: TaskStatus,
    fields: Map<String, Value>,
}

impl TaskRecord {
    /// JSON form enriched with the canonical `due_datetime` field
    /// (RFC 3339 UTC); all source fields survive.
    pub fn to_value(&self) -> Value {
        let mut fields = self.fields.clone();
        fields.insert("due_datetime".to_string(), json!(self.due.to_rfc3339()));
        Value::Object(fields)
    }
}

/// Loads and serves the three student data documents.
///
/// All documents start empty until [`load_data`](Self::load_data) runs; the
/// accessors then answer from the normalized records. Filters evaluate
/// against the current instant at call time.
#[derive(Debug, Default)]
pub struct DataManager {
    profile_data: Option<Value>,
    events: Vec<EventRecord>,
    tasks: Vec<TaskRecord>,
}

impl DataManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the three raw JSON documents and normalizes calendar/task
    /// records. Syntax errors propagate; malformed individual records are
    /// skipped per the module policy.
    pub fn load_data(
        &mut self,
        profile_json: &str,
        calendar_json: &str,
        task_json: &str,
    ) -> Result<(), DataError> {
        let profile: Value = serde_json::from_str(profile_json).map_err(|source| {
            DataError::Json {
                document: "profile",
                source,
            }
        })?;
        let calendar: Value = serde_json::from_str(calendar_json).map_err(|source| {
            DataError::Json {
                document: "calendar",
                source,
            }
        })?;
        let tasks: Value = serde_json::from_str(task_json).map_err(|source| DataError::Json {
            document: "task",
            source,
        })?;

        self.profile_data = Some(profile);
        self.events = normalize_events(&calendar);
        self.tasks = normalize_tasks(&tasks);
        Ok(())
    }

    /// Looks up one profile by `id` in the document's `profiles` array.
    pub fn student_profile(&self, student_id: &str) -> Option<&Value> {
        self.profile_data
            .as_ref()?
            .get("profiles")?
            .as_array()?
            .iter()
            .find(|profile| profile.get("id").and_then(Value::as_str) == Some(student_id))
    }

    /// Events whose start instant falls in `[now, now + horizon_days]`,
    /// inclusive at both ends, in source order.
    pub fn upcoming_events(&self, horizon_days: i64) -> Vec<&EventRecord> {
        let now = Utc::now();
        let future = now + Duration::days(horizon_days);
        self.events
            .iter()
            .filter(|event| now <= event.start && event.start <= future)
            .collect()
    }

    /// Tasks with an active status and a due instant strictly in the future,
    /// in source order.
    pub fn active_tasks(&self) -> Vec<&TaskRecord> {
        let now = Utc::now();
        self.tasks
            .iter()
            .filter(|task| task.status.is_active() && task.due > now)
            .collect()
    }
}

fn normalize_events(calendar: &Value) -> Vec<EventRecord> {
    let raw_events = match calendar.get("events").and_then(Value::as_array) {
        Some(events) => events,
        None => return Vec::new(),
    };
    raw_events.iter().filter_map(normalize_event).collect()
}

fn normalize_event(raw: &Value) -> Option<EventRecord> {
    let fields = raw.as_object()?.clone();

    let stamp = if let (Some(date), Some(time)) = (
        fields.get("date").and_then(Value::as_str),
        fields.get("time").and_then(Value::as_str),
    ) {
        // Only the start bound of a "09:00-10:30" range is the instant.
        let start_bound = time.split('-').next().unwrap_or(time);
        format!("{}T{}:00", date, start_bound)
    } else if let Some(date_time) = raw.pointer("/start/dateTime").and_then(Value::as_str) {
        date_time.to_string()
    } else {
        // Neither layout: silently excluded.
        return None;
    };

    match parse_datetime_utc(&stamp) {
        Ok(start) => Some(EventRecord { start, fields }),
        Err(error) => {
            warn!(%error, stamp = %stamp, "skipping calendar event with unparseable start");
            None
        }
    }
}

fn normalize_tasks(document: &Value) -> Vec<TaskRecord> {
    // "assignments" is the primary key; fall back to "tasks" when it is
    // absent or empty.
    let raw_tasks = document
        .get("assignments")
        .and_then(Value::as_array)
        .filter(|list| !list.is_empty())
        .or_else(|| document.get("tasks").and_then(Value::as_array));
    let raw_tasks = match raw_tasks {
        Some(tasks) => tasks,
        None => return Vec::new(),
    };
    raw_tasks.iter().filter_map(normalize_task).collect()
}

fn normalize_task(raw: &Value) -> Option<TaskRecord> {
    let fields = raw.as_object()?.clone();

    let stamp = if let (Some(due_date), Some(due_time)) = (
        fields.get("due_date").and_then(Value::as_str),
        fields.get("due_time").and_then(Value::as_str),
    ) {
        format!("{}T{}:00", due_date, due_time)
    } else if let Some(due) = fields.get("due").and_then(Value::as_str) {
        due.to_string()
    } else {
        return None;
    };

    let status = fields
        .get("status")
        .and_then(Value::as_str)
        .map(TaskStatus::parse)
        .unwrap_or(TaskStatus::Other);

    match parse_datetime_utc(&stamp) {
        Ok(due) => Some(TaskRecord {
            due,
            status,
            fields,
        }),
        Err(error) => {
            warn!(%error, stamp = %stamp, "skipping task with unparseable due time");
            None
        }
    }
}
