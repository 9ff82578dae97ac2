//! Chat Completions client for NVIDIA's OpenAI-compatible endpoint.
//!
//! Forwards one non-streaming chat completion per [`LlmClient::generate`]
//! call: model, resolved temperature and the configured max token budget.
//! Requires an NVIDIA API key (`NEMOTRON_4_340B_INSTRUCT_KEY` in the deployed
//! setup); no retries, no tool calling.

use async_trait::async_trait;
use tracing::{debug, trace};

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestUserMessage, CreateChatCompletionRequestArgs,
    },
    Client,
};

use super::{LlmClient, LlmConfig, LlmError};
use crate::message::Message;

/// Production oracle client over `async-openai` with the API base overridden
/// to the NVIDIA integrate endpoint.
pub struct ChatNvidia {
    client: Client<OpenAIConfig>,
    config: LlmConfig,
}

impl ChatNvidia {
    /// Client with the default [`LlmConfig`] and the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(api_key, LlmConfig::default())
    }

    /// Client with an explicit config (custom base URL, model or sampling).
    pub fn with_config(api_key: impl Into<String>, config: LlmConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(config.base_url.clone());
        Self {
            client: Client::with_config(openai_config),
            config,
        }
    }

    /// Convert our `Message` list to request messages (text roles only).
    fn messages_to_request(messages: &[Message]) -> Vec<ChatCompletionRequestMessage> {
        messages
            .iter()
            .map(|m| match m {
                Message::System(s) => ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessage::from(s.as_str()),
                ),
                Message::User(s) => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessage::from(s.as_str()),
                ),
                Message::Assistant(s) => {
                    ChatCompletionRequestMessage::Assistant((s.as_str()).into())
                }
            })
            .collect()
    }
}

#[async_trait]
impl LlmClient for ChatNvidia {
    async fn generate(
        &self,
        messages: &[Message],
        temperature: Option<f32>,
    ) -> Result<String, LlmError> {
        let temperature = self.config.effective_temperature(temperature);
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.config.model.clone())
            .messages(Self::messages_to_request(messages))
            .temperature(temperature)
            .max_completion_tokens(self.config.max_tokens)
            .build()
            .map_err(|e| LlmError::RequestBuild(e.to_string()))?;

        debug!(
            model = %self.config.model,
            message_count = messages.len(),
            temperature = temperature,
            max_tokens = self.config.max_tokens,
            "chat completion create"
        );
        if let Ok(js) = serde_json::to_string_pretty(&request) {
            trace!(request = %js, "chat completion request body");
        }

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| LlmError::Api(e.to_string()))?;

        if let Ok(js) = serde_json::to_string_pretty(&response) {
            trace!(response = %js, "chat completion response body");
        }

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyCompletion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: generate() against an unreachable base surfaces a single
    /// Api error — no retries, no panic.
    #[tokio::test]
    async fn generate_with_unreachable_base_returns_api_error() {
        let config = LlmConfig::default().with_base_url("https://127.0.0.1:1");
        let client = ChatNvidia::with_config("test-key", config);
        let messages = [Message::user("Hello")];

        let result = client.generate(&messages, None).await;

        assert!(matches!(result, Err(LlmError::Api(_))), "got: {:?}", result);
    }

    /// **Scenario**: check_auth over an unreachable base reports false
    /// instead of propagating the transport error.
    #[tokio::test]
    async fn check_auth_with_unreachable_base_returns_false() {
        let config = LlmConfig::default().with_base_url("https://127.0.0.1:1");
        let client = ChatNvidia::with_config("test-key", config);

        assert!(!client.check_auth().await);
    }

    /// **Scenario**: generate() against the real endpoint returns a non-empty
    /// completion when a key is configured.
    #[tokio::test]
    #[ignore = "Requires NEMOTRON_4_340B_INSTRUCT_KEY; run with: cargo test -p atlas generate_with_real_api -- --ignored"]
    async fn generate_with_real_api_returns_text() {
        let api_key = std::env::var("NEMOTRON_4_340B_INSTRUCT_KEY")
            .expect("NEMOTRON_4_340B_INSTRUCT_KEY must be set for this test");
        let client = ChatNvidia::new(api_key);
        let messages = [Message::user("Say exactly: ok")];

        let response = client
            .generate(&messages, Some(0.1))
            .await
            .expect("generate with real API should succeed");
        assert!(!response.is_empty());
    }
}
