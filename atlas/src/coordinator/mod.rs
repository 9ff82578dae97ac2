//! Coordinator: decides which specialists a request needs.
//!
//! One oracle call with the ReACT deployment prompt, then a heuristic parse
//! of the free-text narrative. The parse is an ordered rule table applied
//! cumulatively over lowercase substring matches — intentionally approximate,
//! a tie-break policy rather than a structured-output contract. Any failure
//! along the way falls back to the planner-only default analysis; the
//! coordinator never fails a request.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::warn;

use crate::agents::AgentKind;
use crate::error::AgentError;
use crate::llm::LlmClient;
use crate::message::Message;
use crate::prompts;
use crate::state::{SharedState, StateUpdate};

/// Keywords that pull in the NoteWriter (content creation).
const NOTEWRITER_KEYWORDS: &[&str] = &[
    "create", "generate", "write", "notes", "study material", "content", "summary", "explain",
];

/// Keywords that pull in the Advisor (help / stress).
const ADVISOR_KEYWORDS: &[&str] = &[
    "help", "advice", "guidance", "overwhelmed", "stressed", "struggling", "recommend",
];

/// The coordinator's decision, stored under `results.coordinator_analysis`.
///
/// `required_agents` is never empty — an empty input is normalized back to
/// the planner default. `concurrent_groups` may name agents outside
/// `required_agents`; the executor runs only the intersection. `priority` is
/// advisory (lower means higher) and not enforced anywhere.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CoordinatorAnalysis {
    #[serde(default)]
    pub required_agents: Vec<AgentKind>,
    #[serde(default)]
    pub priority: BTreeMap<String, u32>,
    #[serde(default)]
    pub concurrent_groups: Vec<Vec<AgentKind>>,
    #[serde(default)]
    pub reasoning: String,
}

impl Default for CoordinatorAnalysis {
    fn default() -> Self {
        Self {
            required_agents: vec![AgentKind::Planner],
            priority: BTreeMap::from([(AgentKind::Planner.wire_name().to_string(), 1)]),
            concurrent_groups: vec![vec![AgentKind::Planner]],
            reasoning: "Default coordination".to_string(),
        }
    }
}

impl CoordinatorAnalysis {
    /// The default analysis with the degraded-oracle reasoning text.
    pub fn fallback() -> Self {
        Self {
            reasoning: "Error in coordination. Falling back to planner.".to_string(),
            ..Self::default()
        }
    }

    /// Reads the analysis out of `results.coordinator_analysis`, defaulting
    /// on absence or malformed payloads and restoring the non-empty
    /// `required_agents` invariant.
    pub fn from_state(state: &SharedState) -> Self {
        state
            .result("coordinator_analysis")
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
            .map(Self::normalized)
            .unwrap_or_default()
    }

    fn normalized(mut self) -> Self {
        if self.required_agents.is_empty() {
            self.required_agents.push(AgentKind::Planner);
        }
        if self.concurrent_groups.is_empty() {
            self.concurrent_groups.push(vec![AgentKind::Planner]);
        }
        self
    }

    fn require(&mut self, kind: AgentKind, priority: u32) {
        if !self.required_agents.contains(&kind) {
            self.required_agents.push(kind);
        }
        self.priority.insert(kind.wire_name().to_string(), priority);
    }

    /// Wraps the analysis as a `results` delta.
    pub fn into_update(self) -> StateUpdate {
        // Vectors, string maps and strings serialize infallibly.
        let value = serde_json::to_value(&self).unwrap_or_default();
        StateUpdate::results(json!({ "coordinator_analysis": value }))
    }
}

/// Context summary embedded in the coordinator prompt: who the student is and
/// how loaded their week looks. The current course is matched by lowercase
/// containment of a course name in the latest request.
pub fn analyze_context(state: &SharedState) -> Value {
    let profile = &state.profile;
    let request = state
        .latest_message()
        .map(|m| m.content().to_lowercase())
        .unwrap_or_default();

    let current_course = profile
        .pointer("/academic_info/current_courses")
        .and_then(Value::as_array)
        .and_then(|courses| {
            courses.iter().find(|course| {
                course
                    .get("name")
                    .and_then(Value::as_str)
                    .is_some_and(|name| request.contains(&name.to_lowercase()))
            })
        })
        .cloned()
        .unwrap_or(Value::Null);

    json!({
        "student": {
            "major": profile
                .pointer("/personal_info/major")
                .and_then(Value::as_str)
                .unwrap_or("Unknown"),
            "year": profile.pointer("/personal_info/academic_year").cloned().unwrap_or(Value::Null),
            "learning_style": profile
                .pointer("/learning_preferences/learning_style")
                .cloned()
                .unwrap_or_else(|| json!({})),
        },
        "course": current_course,
        "upcoming_events": state
            .calendar
            .get("events")
            .and_then(Value::as_array)
            .map_or(0, Vec::len),
        "active_tasks": state
            .tasks
            .get("tasks")
            .and_then(Value::as_array)
            .map_or(0, Vec::len),
        "study_patterns": profile
            .pointer("/learning_preferences/study_patterns")
            .cloned()
            .unwrap_or_else(|| json!({})),
    })
}

/// Heuristic parse of the coordinator narrative.
///
/// Rule table, applied in order, all matching rules cumulative:
/// 1. start from the planner-only default;
/// 2. when both `Thought:` and `Decision:` markers are present, literal
///    `NoteWriter` / lowercase `note` adds the NoteWriter (priority 2, joint
///    group with the Planner) and literal `Advisor` / lowercase `guidance`
///    adds the Advisor (priority 3, groups unchanged);
/// 3. independently of the markers, content-creation keywords add the
///    NoteWriter at priority 1 in an isolated group, and help/stress
///    keywords add the Advisor at priority 2;
/// 4. reasoning is the `Thought:`…`Action:` slice when both markers exist,
///    else the raw narrative.
pub fn parse_coordinator_response(response: &str) -> CoordinatorAnalysis {
    let mut analysis = CoordinatorAnalysis::default();
    let lower = response.to_lowercase();

    if response.contains("Thought:") && response.contains("Decision:") {
        if response.contains("NoteWriter") || lower.contains("note") {
            analysis.require(AgentKind::NoteWriter, 2);
            analysis.concurrent_groups = vec![vec![AgentKind::Planner, AgentKind::NoteWriter]];
        }
        if response.contains("Advisor") || lower.contains("guidance") {
            analysis.require(AgentKind::Advisor, 3);
        }
    }

    if NOTEWRITER_KEYWORDS.iter().any(|k| lower.contains(k))
        && !analysis.required_agents.contains(&AgentKind::NoteWriter)
    {
        analysis.require(AgentKind::NoteWriter, 1);
        analysis.concurrent_groups = vec![vec![AgentKind::NoteWriter]];
    }

    if ADVISOR_KEYWORDS.iter().any(|k| lower.contains(k))
        && !analysis.required_agents.contains(&AgentKind::Advisor)
    {
        analysis.require(AgentKind::Advisor, 2);
    }

    analysis.reasoning = match (response.split_once("Thought:"), response.contains("Action:")) {
        (Some((_, after_thought)), true) => after_thought
            .split("Action:")
            .next()
            .unwrap_or(after_thought)
            .trim()
            .to_string(),
        _ => response.to_string(),
    };

    analysis
}

/// The coordination step itself: context summary, one oracle call, parse.
pub struct Coordinator {
    llm: Arc<dyn LlmClient>,
}

impl Coordinator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Produces the `coordinator_analysis` delta. Never errors: any failure
    /// degrades to the fallback analysis.
    pub async fn coordinate(&self, state: &SharedState) -> StateUpdate {
        match self.try_coordinate(state).await {
            Ok(analysis) => analysis.into_update(),
            Err(error) => {
                warn!(%error, "coordination failed, falling back to planner");
                CoordinatorAnalysis::fallback().into_update()
            }
        }
    }

    async fn try_coordinate(&self, state: &SharedState) -> Result<CoordinatorAnalysis, AgentError> {
        let request = state
            .latest_message()
            .map(|m| m.content())
            .ok_or_else(|| AgentError::MissingField("messages".to_string()))?;
        let context = analyze_context(state);

        let prompt = prompts::coordinator_prompt(request, &context);
        let response = self
            .llm
            .generate(&[Message::system(prompt)], None)
            .await?;

        Ok(parse_coordinator_response(&response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlm;

    /// **Scenario**: no markers, no keywords — the documented default comes
    /// back untouched.
    #[test]
    fn parse_without_markers_or_keywords_returns_default() {
        let analysis = parse_coordinator_response("the student wants a schedule");
        assert_eq!(analysis.required_agents, vec![AgentKind::Planner]);
        assert_eq!(analysis.concurrent_groups, vec![vec![AgentKind::Planner]]);
        assert_eq!(analysis.priority.get("PLANNER"), Some(&1));
        // No Thought/Action markers: the raw narrative is the reasoning.
        assert_eq!(analysis.reasoning, "the student wants a schedule");
    }

    /// **Scenario**: "overwhelmed" pulls in the Advisor regardless of marker
    /// presence.
    #[test]
    fn parse_keyword_overwhelmed_adds_advisor() {
        let analysis = parse_coordinator_response("the student sounds overwhelmed by exams");
        assert_eq!(
            analysis.required_agents,
            vec![AgentKind::Planner, AgentKind::Advisor]
        );
        assert_eq!(analysis.priority.get("ADVISOR"), Some(&2));
        // Advisor keywords do not change the grouping.
        assert_eq!(analysis.concurrent_groups, vec![vec![AgentKind::Planner]]);
    }

    /// **Scenario**: markers plus "NoteWriter" mention put the NoteWriter in
    /// a joint group with the Planner; the later keyword rule does not demote
    /// it because it is already required.
    #[test]
    fn parse_marker_rule_groups_notewriter_with_planner() {
        let narrative = "Thought: content request\nAction: pick agents\nDecision: deploy NoteWriter";
        let analysis = parse_coordinator_response(narrative);
        assert!(analysis.required_agents.contains(&AgentKind::NoteWriter));
        assert_eq!(
            analysis.concurrent_groups,
            vec![vec![AgentKind::Planner, AgentKind::NoteWriter]]
        );
        assert_eq!(analysis.priority.get("NOTEWRITER"), Some(&2));
        assert_eq!(analysis.reasoning, "content request");
    }

    /// **Scenario**: a content keyword without markers isolates the
    /// NoteWriter in its own group at elevated priority.
    #[test]
    fn parse_content_keyword_isolates_notewriter_group() {
        let analysis = parse_coordinator_response("please summary the chapter");
        assert!(analysis.required_agents.contains(&AgentKind::NoteWriter));
        assert_eq!(analysis.priority.get("NOTEWRITER"), Some(&1));
        assert_eq!(analysis.concurrent_groups, vec![vec![AgentKind::NoteWriter]]);
    }

    /// **Scenario**: triggers are cumulative — one narrative can require all
    /// three agents.
    #[test]
    fn parse_triggers_are_cumulative() {
        let narrative = "Thought: x\nAction: y\nDecision: guidance and notes; student is stressed";
        let analysis = parse_coordinator_response(narrative);
        assert_eq!(
            analysis.required_agents,
            vec![AgentKind::Planner, AgentKind::NoteWriter, AgentKind::Advisor]
        );
    }

    /// **Scenario**: analyze_context summarizes the profile, matches the
    /// course named in the request, and counts events and tasks.
    #[test]
    fn analyze_context_matches_course_and_counts_load() {
        let mut state = SharedState::for_request("I need help with Calculus III today");
        state.profile = json!({
            "personal_info": { "major": "Computer Science", "academic_year": "junior" },
            "academic_info": { "current_courses": [
                { "name": "Calculus III", "grade": "C+" },
                { "name": "Operating Systems", "grade": "A-" }
            ]},
            "learning_preferences": {
                "learning_style": { "primary": "visual" },
                "study_patterns": { "peak": "morning" }
            }
        });
        state.calendar = json!({ "events": [{}, {}] });
        state.tasks = json!({ "tasks": [{}] });

        let context = analyze_context(&state);
        assert_eq!(context["student"]["major"], json!("Computer Science"));
        assert_eq!(context["course"]["name"], json!("Calculus III"));
        assert_eq!(context["upcoming_events"], json!(2));
        assert_eq!(context["active_tasks"], json!(1));
        assert_eq!(context["study_patterns"]["peak"], json!("morning"));
    }

    /// **Scenario**: an empty profile still produces a stable summary with
    /// "Unknown" major and zero counts.
    #[test]
    fn analyze_context_defaults_on_sparse_state() {
        let state = SharedState::for_request("anything");
        let context = analyze_context(&state);
        assert_eq!(context["student"]["major"], json!("Unknown"));
        assert_eq!(context["course"], Value::Null);
        assert_eq!(context["upcoming_events"], json!(0));
    }

    /// **Scenario**: coordinate() writes the parsed analysis under
    /// results.coordinator_analysis and from_state reads it back.
    #[tokio::test]
    async fn coordinate_roundtrips_through_state() {
        let llm = Arc::new(MockLlm::with_responses([
            "Thought: needs guidance\nAction: advisor\nObservation: ok\nDecision: Advisor",
        ]));
        let coordinator = Coordinator::new(llm as Arc<dyn LlmClient>);
        let mut state = SharedState::for_request("struggling with my workload");

        state.apply(coordinator.coordinate(&state).await);
        let analysis = CoordinatorAnalysis::from_state(&state);
        assert!(analysis.required_agents.contains(&AgentKind::Advisor));
        assert_eq!(analysis.reasoning, "needs guidance");
    }

    /// **Scenario**: an oracle failure degrades to the fallback analysis with
    /// the documented reasoning string.
    #[tokio::test]
    async fn coordinate_falls_back_on_oracle_failure() {
        let llm = Arc::new(MockLlm::failing("429 Too Many Requests"));
        let coordinator = Coordinator::new(llm as Arc<dyn LlmClient>);
        let mut state = SharedState::for_request("plan my week");

        state.apply(coordinator.coordinate(&state).await);
        let analysis = CoordinatorAnalysis::from_state(&state);
        assert_eq!(analysis.required_agents, vec![AgentKind::Planner]);
        assert_eq!(
            analysis.reasoning,
            "Error in coordination. Falling back to planner."
        );
    }

    /// **Scenario**: from_state restores the non-empty invariant when the
    /// stored payload carries an empty agent list, and defaults entirely on
    /// malformed payloads.
    #[test]
    fn from_state_normalizes_and_defaults() {
        let mut state = SharedState::for_request("req");
        state.apply(StateUpdate::results(json!({
            "coordinator_analysis": { "required_agents": [], "concurrent_groups": [] }
        })));
        let analysis = CoordinatorAnalysis::from_state(&state);
        assert_eq!(analysis.required_agents, vec![AgentKind::Planner]);
        assert_eq!(analysis.concurrent_groups, vec![vec![AgentKind::Planner]]);

        let mut state = SharedState::for_request("req");
        state.apply(StateUpdate::results(
            json!({ "coordinator_analysis": "not an object" }),
        ));
        assert_eq!(
            CoordinatorAnalysis::from_state(&state),
            CoordinatorAnalysis::default()
        );
    }
}
