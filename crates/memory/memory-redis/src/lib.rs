//! # Redis Conversation Store
//!
//! Key-value backend: each conversation is one Redis list of JSON-encoded
//! turns, appended at the tail. The key carries a TTL that is refreshed on
//! every append, so idle conversations expire on the server side with no
//! application involvement; a vanished key reads as empty history, not an
//! error.
//!
//! ## Key layout
//!
//! Keys are written as `chat:{session_id}:{conversation_id}`, which is the
//! same convention the session-wide clear scans for (`chat:{session_id}:*`).
//! Session scoping therefore holds by construction even though Redis has no
//! secondary index.

use std::sync::Arc;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, error, info, warn};

use memory_core::{render_history, MemoryError, MemoryStore, MessageTurn, StoreMetrics};

/// Connection settings for [`RedisMemoryStore`].
#[derive(Debug, Clone)]
pub struct RedisStoreConfig {
    /// Redis connection string, e.g. `redis://localhost:6379/0`.
    pub connection_string: String,
    /// Session scope embedded in every key.
    pub session_id: String,
    /// Number of most recent turns returned by a history load.
    pub window_size: usize,
    /// Expiry applied to each conversation key, refreshed on every append.
    pub ttl_seconds: usize,
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self {
            connection_string: "redis://localhost:6379/0".to_string(),
            session_id: "default".to_string(),
            window_size: 5,
            ttl_seconds: 3600,
        }
    }
}

/// Builds the list key for one conversation within a session.
pub fn conversation_key(session_id: &str, conversation_id: &str) -> String {
    format!("chat:{session_id}:{conversation_id}")
}

/// Builds the scan pattern matching every conversation key of a session.
pub fn session_pattern(session_id: &str) -> String {
    format!("chat:{session_id}:*")
}

/// Redis-backed conversation store.
pub struct RedisMemoryStore {
    conn: ConnectionManager,
    session_id: String,
    window_size: usize,
    ttl_seconds: usize,
    metrics: Arc<StoreMetrics>,
}

impl RedisMemoryStore {
    /// Connects to Redis eagerly.
    ///
    /// Fails fast: an unreachable server or malformed connection string is a
    /// construction error, not a degraded call.
    pub async fn connect(config: RedisStoreConfig) -> Result<Self, MemoryError> {
        let client =
            redis::Client::open(config.connection_string.as_str()).map_err(MemoryError::backend)?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(MemoryError::backend)?;
        info!(session_id = %config.session_id, "Redis connection established");

        Ok(Self {
            conn,
            session_id: config.session_id,
            window_size: config.window_size,
            ttl_seconds: config.ttl_seconds,
            metrics: Arc::new(StoreMetrics::new()),
        })
    }

    async fn try_add(&self, turn: &MessageTurn) -> Result<(), MemoryError> {
        let key = conversation_key(&self.session_id, &turn.conversation_id);
        let payload = serde_json::to_string(turn).map_err(MemoryError::serialization)?;

        let mut conn = self.conn.clone();
        let _: () = conn.rpush(&key, payload).await.map_err(MemoryError::backend)?;
        // Refresh expiry on each insert so active conversations stay alive.
        let _: () = conn
            .expire(&key, self.ttl_seconds as i64)
            .await
            .map_err(MemoryError::backend)?;

        debug!(key = %key, ttl_seconds = self.ttl_seconds, "appended one turn");
        Ok(())
    }

    async fn try_load(&self, conversation_id: &str) -> Result<String, MemoryError> {
        let key = conversation_key(&self.session_id, conversation_id);
        let mut conn = self.conn.clone();
        // List order is insertion order; the last K entries are already the
        // most recent turns, oldest first.
        let items: Vec<String> = conn
            .lrange(&key, -(self.window_size as isize), -1)
            .await
            .map_err(MemoryError::backend)?;

        let (turns, skipped) = decode_entries(&items);
        if skipped > 0 {
            self.metrics.record_skipped_records(skipped as u64);
            warn!(skipped, total = items.len(), conversation_id, "skipped undecodable stored turns");
        }
        Ok(render_history(&turns))
    }

    async fn try_clear(&self, conversation_id: Option<&str>) -> Result<(), MemoryError> {
        let mut conn = self.conn.clone();
        match conversation_id {
            Some(id) => {
                let key = conversation_key(&self.session_id, id);
                info!(key = %key, "deleting conversation history");
                let _: () = conn.del(&key).await.map_err(MemoryError::backend)?;
            }
            None => {
                let pattern = session_pattern(&self.session_id);
                let keys: Vec<String> = {
                    let mut iter = conn
                        .scan_match::<_, String>(&pattern)
                        .await
                        .map_err(MemoryError::backend)?;
                    let mut keys = Vec::new();
                    while let Some(key) = iter.next_item().await {
                        keys.push(key);
                    }
                    keys
                };
                warn!(session_id = %self.session_id, count = keys.len(), "deleting ALL history for session");
                if !keys.is_empty() {
                    let _: () = conn.del(keys).await.map_err(MemoryError::backend)?;
                }
            }
        }
        Ok(())
    }
}

/// Decodes list entries, skipping any that fail to parse. Returns the decoded
/// turns and the skip count.
fn decode_entries(items: &[String]) -> (Vec<MessageTurn>, usize) {
    let mut turns = Vec::new();
    let mut skipped = 0;
    for item in items {
        match serde_json::from_str::<MessageTurn>(item) {
            Ok(turn) => turns.push(turn),
            Err(_) => skipped += 1,
        }
    }
    (turns, skipped)
}

#[async_trait]
impl MemoryStore for RedisMemoryStore {
    async fn add_message(&self, turn: MessageTurn) -> Result<(), MemoryError> {
        if let Err(e) = self.try_add(&turn).await {
            self.metrics.record_degraded_write();
            error!(error = %e, conversation_id = %turn.conversation_id, "Redis insert failed, dropping turn");
        }
        Ok(())
    }

    async fn load_history(
        &self,
        conversation_id: &str,
        _query: Option<&str>,
    ) -> Result<String, MemoryError> {
        match self.try_load(conversation_id).await {
            Ok(history) => Ok(history),
            Err(e) => {
                self.metrics.record_degraded_read();
                error!(error = %e, conversation_id, "Redis read failed, returning empty history");
                Ok(String::new())
            }
        }
    }

    async fn clear(&self, conversation_id: Option<&str>) -> Result<(), MemoryError> {
        if let Err(e) = self.try_clear(conversation_id).await {
            self.metrics.record_degraded_write();
            error!(error = %e, "Redis delete failed");
        }
        Ok(())
    }

    fn metrics(&self) -> &StoreMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memory_core::Message;

    #[test]
    fn written_keys_match_the_session_clear_pattern() {
        let key = conversation_key("s1", "c1");
        assert_eq!(key, "chat:s1:c1");

        let pattern = session_pattern("s1");
        assert_eq!(pattern, "chat:s1:*");
        let prefix = pattern.strip_suffix('*').unwrap();
        assert!(key.starts_with(prefix));
    }

    #[test]
    fn keys_of_other_sessions_do_not_match_the_pattern() {
        let prefix = session_pattern("s1").strip_suffix('*').unwrap().to_string();
        assert!(!conversation_key("s2", "c1").starts_with(&prefix));
    }

    #[test]
    fn decode_skips_malformed_entries_but_keeps_the_rest() {
        let good = serde_json::to_string(&MessageTurn::new(
            Message::new("hi", "human"),
            Message::new("hello!", "ai"),
            "c1",
        ))
        .unwrap();
        let items = vec![good, "not json".to_string(), "{}".to_string()];

        let (turns, skipped) = decode_entries(&items);
        assert_eq!(turns.len(), 1);
        assert_eq!(skipped, 2);
        assert_eq!(render_history(&turns), "human: hi\nai: hello!");
    }

    #[test]
    fn decode_of_empty_list_is_empty() {
        let (turns, skipped) = decode_entries(&[]);
        assert!(turns.is_empty());
        assert_eq!(skipped, 0);
    }
}
