//! Error types for agent pipelines.
//!
//! Used by pipeline stages and `Agent::run`. Failures are tagged rather than
//! stringly-typed so the call sites that degrade (executor, workflow driver,
//! coordinator) can log what actually went wrong, and tests can assert on it.

use thiserror::Error;

use crate::llm::LlmError;

/// Agent pipeline error.
///
/// Returned by pipeline stages and by `Agent::run` when a step fails. The
/// enclosing layer decides the fallback: the coordinator substitutes its
/// default analysis, specialists their placeholder payload, the executor its
/// emergency plan. The error itself never reaches the end of a request.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Oracle call failed (auth, transport, rate limit, empty completion).
    #[error("oracle call failed: {0}")]
    Llm(#[from] LlmError),

    /// A state field the stage depends on is missing or has the wrong shape.
    #[error("missing state field: {0}")]
    MissingField(String),

    /// Prompt or payload serialization failed.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Display format of MissingField names the field path.
    #[test]
    fn agent_error_display_missing_field() {
        let err = AgentError::MissingField("profile.learning_preferences".to_string());
        let s = err.to_string();
        assert!(
            s.contains("missing state field"),
            "Display should contain 'missing state field': {}",
            s
        );
        assert!(s.contains("profile.learning_preferences"));
    }

    /// **Scenario**: LlmError converts via From and keeps its message in Display.
    #[test]
    fn agent_error_from_llm_error() {
        let err: AgentError = LlmError::Api("403 Forbidden".to_string()).into();
        assert!(matches!(err, AgentError::Llm(_)));
        let s = err.to_string();
        assert!(s.contains("oracle call failed"), "got: {}", s);
        assert!(s.contains("403 Forbidden"), "got: {}", s);
    }
}
