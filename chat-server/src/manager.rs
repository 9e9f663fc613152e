//! Chat orchestration.
//!
//! One incoming request maps to exactly three sequential steps: load the
//! rendered history, generate a reply, append the new turn. Concurrent
//! requests on the same conversation are not serialized against each other;
//! the memory backends accept interleaved appends.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, instrument};

use llm_client::LlmClient;
use memory::{ConversationMemory, Message, MessageTurn};

/// Role recorded for user messages.
const HUMAN_ROLE: &str = "human";
/// Role recorded for model replies.
const AI_ROLE: &str = "ai";

/// Drives one chat exchange end to end.
#[derive(Clone)]
pub struct ChatManager {
    memory: ConversationMemory,
    llm: Arc<dyn LlmClient>,
}

impl ChatManager {
    /// Creates a manager over the given memory facade and LLM client.
    pub fn new(memory: ConversationMemory, llm: Arc<dyn LlmClient>) -> Self {
        Self { memory, llm }
    }

    /// Processes a user message and returns the AI response.
    ///
    /// The user input doubles as the similarity query for backends that
    /// support semantic retrieval. Storage failures degrade inside the
    /// memory subsystem and never fail the exchange; only generation errors
    /// propagate.
    #[instrument(skip(self, input), fields(conversation_id = %conversation_id))]
    pub async fn process_message(&self, input: &str, conversation_id: &str) -> Result<String> {
        let history = self
            .memory
            .load_history(conversation_id, Some(input))
            .await?;

        let output = self.llm.generate(&history, input).await?;

        let turn = MessageTurn::new(
            Message::new(input, HUMAN_ROLE),
            Message::new(output.as_str(), AI_ROLE),
            conversation_id,
        );
        self.memory.add_message(turn).await?;

        info!(chars = output.len(), "completed chat exchange");
        Ok(output)
    }

    /// Clears one conversation, or the whole session scope when `None`.
    pub async fn clear_history(&self, conversation_id: Option<&str>) -> Result<()> {
        self.memory.clear(conversation_id).await?;
        Ok(())
    }
}
