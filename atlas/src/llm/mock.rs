//! Mock oracle for tests.
//!
//! Scripts a queue of responses (or failures) and records every call's
//! messages and resolved temperature, so tests can assert both what the
//! pipeline asked and what it did with the answer.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{LlmClient, LlmConfig, LlmError};
use crate::message::Message;

/// One recorded `generate` call: the messages sent and the temperature the
/// mock resolved (per-call value or configured default).
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub temperature: f32,
}

enum Scripted {
    Text(String),
    Failure(String),
}

/// Scripted oracle: answers from a queue, then repeats the last entry.
///
/// An empty script answers a fixed placeholder. Calls are recorded behind a
/// mutex; `calls()` snapshots them.
pub struct MockLlm {
    script: Mutex<VecDeque<Scripted>>,
    config: LlmConfig,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockLlm {
    /// Mock that answers the given texts in order, repeating the last one.
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(
                responses
                    .into_iter()
                    .map(|r| Scripted::Text(r.into()))
                    .collect(),
            ),
            config: LlmConfig::default(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Mock that fails every call with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::from([Scripted::Failure(message.into())])),
            config: LlmConfig::default(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Mock that fails the first `failures` calls, then answers `text`.
    pub fn failing_then(failures: usize, text: impl Into<String>) -> Self {
        let mut script: VecDeque<Scripted> = (0..failures)
            .map(|_| Scripted::Failure("scripted failure".to_string()))
            .collect();
        script.push_back(Scripted::Text(text.into()));
        Self {
            script: Mutex::new(script),
            config: LlmConfig::default(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Replace the config used to resolve omitted temperatures.
    pub fn with_config(mut self, config: LlmConfig) -> Self {
        self.config = config;
        self
    }

    /// Snapshot of every call made so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("mock calls lock").clone()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn generate(
        &self,
        messages: &[Message],
        temperature: Option<f32>,
    ) -> Result<String, LlmError> {
        let temperature = self.config.effective_temperature(temperature);
        self.calls.lock().expect("mock calls lock").push(RecordedCall {
            messages: messages.to_vec(),
            temperature,
        });

        let mut script = self.script.lock().expect("mock script lock");
        let entry = if script.len() > 1 {
            script.pop_front()
        } else {
            None
        };
        match entry.as_ref().or_else(|| script.front()) {
            Some(Scripted::Text(text)) => Ok(text.clone()),
            Some(Scripted::Failure(message)) => Err(LlmError::Api(message.clone())),
            None => Ok("mock response".to_string()),
        }
    }
}
