//! OpenAI-compatible implementation of [`LlmClient`].

use anyhow::Result;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use tracing::{debug, instrument};

use super::{render_prompt, LlmClient, DEFAULT_SYSTEM_PROMPT};

/// Chat-completion client for OpenAI or any compatible endpoint.
#[derive(Debug, Clone)]
pub struct OpenAILlmClient {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    system_prompt: String,
}

impl OpenAILlmClient {
    /// Creates a client for the given API key and model.
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_base_url(api_key, model, None)
    }

    /// Creates a client targeting an OpenAI-compatible endpoint when
    /// `base_url` is `Some`.
    pub fn with_base_url(api_key: String, model: String, base_url: Option<&str>) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(url) = base_url.filter(|s| !s.is_empty()) {
            config = config.with_api_base(url);
        }
        Self {
            client: Client::with_config(config),
            model,
            temperature: 0.7,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Sets the sampling temperature; higher means more creative.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Replaces the default system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Returns the model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self, history, input))]
    async fn generate(&self, history: &str, input: &str) -> Result<String> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.system_prompt.clone())
                .build()?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(render_prompt(history, input))
                .build()?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(self.temperature)
            .messages(messages)
            .build()?;

        let response = self.client.chat().create(request).await?;
        let output = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        debug!(model = %self.model, chars = output.len(), "chat completion finished");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let client = OpenAILlmClient::new("sk-test".to_string(), "gpt-4o-mini".to_string())
            .with_temperature(0.2)
            .with_system_prompt("Answer in haiku.");
        assert_eq!(client.model(), "gpt-4o-mini");
        assert_eq!(client.temperature, 0.2);
        assert_eq!(client.system_prompt, "Answer in haiku.");
    }

    /// Calls the real API; requires OPENAI_API_KEY.
    /// Run with: cargo test -p llm-client -- --ignored
    #[tokio::test]
    #[ignore]
    async fn generate_returns_a_reply() {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY not set");
        let client = OpenAILlmClient::new(api_key, "gpt-4o-mini".to_string());

        let reply = client.generate("", "Say the word pong.").await.unwrap();
        assert!(!reply.is_empty());
    }
}
