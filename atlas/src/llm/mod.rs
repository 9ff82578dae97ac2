//! Oracle boundary: role-tagged messages in, one generated string out.
//!
//! [`LlmClient`] is the single point of contact with the hosted model. The
//! wrapper performs no retries — a transport/auth/rate-limit failure surfaces
//! as one [`LlmError`] and the caller decides the fallback. [`ChatNvidia`] is
//! the production client against NVIDIA's OpenAI-compatible endpoint;
//! [`MockLlm`] scripts responses for tests.

mod mock;
mod nvidia;

pub use mock::MockLlm;
pub use nvidia::ChatNvidia;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::message::Message;

/// Oracle call failure. One tag per failure site; no retry semantics attached.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The API rejected or failed the call (auth, transport, rate limit).
    #[error("api error: {0}")]
    Api(String),

    /// The request could not be assembled.
    #[error("request build failed: {0}")]
    RequestBuild(String),

    /// The API answered but returned no usable completion.
    #[error("empty completion")]
    EmptyCompletion,
}

/// Sampling and endpoint settings for the oracle.
///
/// Defaults mirror the deployed configuration: NVIDIA integrate endpoint,
/// Mixtral 8x7B instruct, 1024-token completions, temperature 0.5.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub default_temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://integrate.api.nvidia.com/v1".to_string(),
            model: "mistralai/mixtral-8x7b-instruct-v0.1".to_string(),
            max_tokens: 1024,
            default_temperature: 0.5,
        }
    }
}

impl LlmConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_default_temperature(mut self, temperature: f32) -> Self {
        self.default_temperature = temperature;
        self
    }

    /// Resolves an optional per-call temperature against the configured
    /// default. `Some(0.0)` stays 0.0 — only `None` falls back.
    pub fn effective_temperature(&self, temperature: Option<f32>) -> f32 {
        temperature.unwrap_or(self.default_temperature)
    }
}

/// Thin async oracle client: messages + optional temperature → one completion.
///
/// Implementors forward the configured max-output-length on every call and
/// never retry. `messages` must be non-empty.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(
        &self,
        messages: &[Message],
        temperature: Option<f32>,
    ) -> Result<String, LlmError>;

    /// One trivial generate call as an auth probe. Reports the outcome as a
    /// boolean and logs the failure; never returns an error.
    async fn check_auth(&self) -> bool {
        match self.generate(&[Message::user("test")], Some(0.1)).await {
            Ok(_) => true,
            Err(error) => {
                warn!(%error, "authentication probe failed");
                false
            }
        }
    }
}
