//! # LLM client abstraction
//!
//! Defines the [`LlmClient`] trait and an OpenAI-compatible implementation.
//! Transport-agnostic; the chat orchestration depends only on the trait, so
//! tests can substitute a canned client.

use anyhow::Result;
use async_trait::async_trait;

mod openai_llm;

pub use openai_llm::OpenAILlmClient;

/// Default system prompt for the chat assistant.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful AI Assistant. Be concise, friendly and helpful.";

/// LLM client interface: produce one assistant reply from the rendered
/// conversation history and the new user input.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the model reply text for the given history and user input.
    async fn generate(&self, history: &str, input: &str) -> Result<String>;
}

/// Renders the user-turn prompt from the conversation history and input.
pub(crate) fn render_prompt(history: &str, input: &str) -> String {
    format!("Chat History:\n{history}\n\nUser: {input}\nAI:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_interpolates_history_and_input() {
        let prompt = render_prompt("human: hi\nai: hello!", "how are you?");
        assert_eq!(
            prompt,
            "Chat History:\nhuman: hi\nai: hello!\n\nUser: how are you?\nAI:"
        );
    }

    #[test]
    fn prompt_with_empty_history_keeps_the_shape() {
        let prompt = render_prompt("", "hi");
        assert_eq!(prompt, "Chat History:\n\n\nUser: hi\nAI:");
    }
}
