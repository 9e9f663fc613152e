//! # In-Memory Conversation Store
//!
//! The base backend: a per-session map of conversations held behind an
//! `RwLock`. Same window and clear semantics as the persistent backends, no
//! I/O, data lost on restart.
//!
//! **Advantages**:
//! - Fastest performance (no I/O)
//! - Nothing to set up
//! - Great for tests and development
//!
//! **Limitations**:
//! - Data is lost on restart
//! - Not suitable for production use
//!
//! ## Thread Safety
//!
//! The store uses `Arc<RwLock<>>` so that clones share state safely across
//! concurrent requests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use memory_core::{render_history, MemoryError, MemoryStore, MessageTurn, StoreMetrics};

/// In-memory conversation store; one instance scopes one session.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    session_id: String,
    window_size: usize,
    conversations: Arc<RwLock<HashMap<String, Vec<MessageTurn>>>>,
    metrics: Arc<StoreMetrics>,
}

impl InMemoryStore {
    /// Creates an empty store for the given session with the given history
    /// window size.
    pub fn new(session_id: impl Into<String>, window_size: usize) -> Self {
        Self {
            session_id: session_id.into(),
            window_size,
            conversations: Arc::new(RwLock::new(HashMap::new())),
            metrics: Arc::new(StoreMetrics::new()),
        }
    }

    /// Returns the number of conversations currently held.
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    /// Returns true if no conversation holds any turns.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    async fn add_message(&self, turn: MessageTurn) -> Result<(), MemoryError> {
        let mut conversations = self.conversations.write().await;
        debug!(
            session_id = %self.session_id,
            conversation_id = %turn.conversation_id,
            "storing turn in memory"
        );
        conversations
            .entry(turn.conversation_id.clone())
            .or_default()
            .push(turn);
        Ok(())
    }

    async fn load_history(
        &self,
        conversation_id: &str,
        _query: Option<&str>,
    ) -> Result<String, MemoryError> {
        let conversations = self.conversations.read().await;
        let turns = match conversations.get(conversation_id) {
            Some(turns) => turns,
            None => return Ok(String::new()),
        };
        let start = turns.len().saturating_sub(self.window_size);
        Ok(render_history(&turns[start..]))
    }

    async fn clear(&self, conversation_id: Option<&str>) -> Result<(), MemoryError> {
        let mut conversations = self.conversations.write().await;
        match conversation_id {
            Some(id) => {
                info!(session_id = %self.session_id, conversation_id = %id, "clearing conversation");
                conversations.remove(id);
            }
            None => {
                warn!(session_id = %self.session_id, "clearing all conversations for session");
                conversations.clear();
            }
        }
        Ok(())
    }

    fn metrics(&self) -> &StoreMetrics {
        &self.metrics
    }
}
