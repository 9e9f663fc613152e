//! # MongoDB Conversation Store
//!
//! Document-store backend: one append-only document per turn, keyed by
//! `(session_id, conversation_id)`, retrieved by recency window.
//!
//! ## Document layout
//!
//! ```text
//! {
//!     conversation_id: "<chat thread>",
//!     session_id: "<deployment scope>",
//!     history: { human_message: {..}, ai_message: {..}, conversation_id: ".." },
//!     created_at: <BSON datetime>
//! }
//! ```
//!
//! Construction pings the deployment so a misconfigured connection fails at
//! startup rather than on the first chat turn. After construction, driver
//! failures degrade: reads return `""`, writes and clears become no-ops, and
//! the store's metrics record what happened.

use std::sync::Arc;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, from_bson, to_bson, DateTime, Document};
use mongodb::{Client, Collection};
use tracing::{debug, error, info, warn};

use memory_core::{render_history, MemoryError, MemoryStore, MessageTurn, StoreMetrics};

/// Connection settings for [`MongoMemoryStore`].
#[derive(Debug, Clone)]
pub struct MongoStoreConfig {
    /// MongoDB connection string, e.g. `mongodb://localhost:27017`.
    pub connection_string: String,
    /// Database holding the memory collection.
    pub database: String,
    /// Collection name.
    pub collection: String,
    /// Session scope written into every document.
    pub session_id: String,
    /// Number of most recent turns returned by a history load.
    pub window_size: usize,
}

impl Default for MongoStoreConfig {
    fn default() -> Self {
        Self {
            connection_string: "mongodb://localhost:27017".to_string(),
            database: "chatbot".to_string(),
            collection: "chat_memory".to_string(),
            session_id: "default".to_string(),
            window_size: 5,
        }
    }
}

/// MongoDB-backed conversation store.
pub struct MongoMemoryStore {
    collection: Collection<Document>,
    session_id: String,
    window_size: usize,
    metrics: Arc<StoreMetrics>,
}

impl MongoMemoryStore {
    /// Connects to MongoDB and verifies the deployment is reachable.
    ///
    /// Fails fast: an unreachable server or bad connection string is a
    /// construction error, not a degraded call.
    pub async fn connect(config: MongoStoreConfig) -> Result<Self, MemoryError> {
        let client = Client::with_uri_str(&config.connection_string)
            .await
            .map_err(MemoryError::backend)?;
        let database = client.database(&config.database);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(MemoryError::backend)?;
        info!(database = %config.database, collection = %config.collection, "MongoDB connection established");

        Ok(Self {
            collection: database.collection(&config.collection),
            session_id: config.session_id,
            window_size: config.window_size,
            metrics: Arc::new(StoreMetrics::new()),
        })
    }

    async fn try_add(&self, turn: &MessageTurn) -> Result<(), MemoryError> {
        let history = to_bson(turn).map_err(MemoryError::serialization)?;
        let document = doc! {
            "conversation_id": &turn.conversation_id,
            "session_id": &self.session_id,
            "history": history,
            "created_at": DateTime::now(),
        };
        self.collection
            .insert_one(document)
            .await
            .map_err(MemoryError::backend)?;
        debug!(conversation_id = %turn.conversation_id, "saved one turn");
        Ok(())
    }

    async fn try_load(&self, conversation_id: &str) -> Result<String, MemoryError> {
        let filter = doc! {
            "session_id": &self.session_id,
            "conversation_id": conversation_id,
        };
        let mut cursor = self
            .collection
            .find(filter)
            // _id breaks creation-time ties so rapid inserts stay ordered.
            .sort(doc! { "created_at": -1, "_id": -1 })
            .limit(self.window_size as i64)
            .await
            .map_err(MemoryError::backend)?;

        let mut documents = Vec::new();
        while let Some(document) = cursor.try_next().await.map_err(MemoryError::backend)? {
            documents.push(document);
        }
        documents.reverse();

        let (turns, skipped) = decode_documents(&documents);
        if skipped > 0 {
            self.metrics.record_skipped_records(skipped as u64);
            warn!(
                skipped,
                total = documents.len(),
                conversation_id,
                "skipped undecodable stored turns"
            );
        }
        Ok(render_history(&turns))
    }

    async fn try_clear(&self, conversation_id: Option<&str>) -> Result<(), MemoryError> {
        let filter = match conversation_id {
            Some(id) => {
                info!(session_id = %self.session_id, conversation_id = %id, "deleting conversation history");
                doc! { "session_id": &self.session_id, "conversation_id": id }
            }
            None => {
                warn!(session_id = %self.session_id, "deleting ALL history for session");
                doc! { "session_id": &self.session_id }
            }
        };
        self.collection
            .delete_many(filter)
            .await
            .map_err(MemoryError::backend)?;
        Ok(())
    }
}

/// Extracts the turn payload from each document, skipping any that fail to
/// decode. Returns the decoded turns and the skip count.
fn decode_documents(documents: &[Document]) -> (Vec<MessageTurn>, usize) {
    let mut turns = Vec::new();
    let mut skipped = 0;
    for document in documents {
        match document.get("history") {
            Some(history) => match from_bson::<MessageTurn>(history.clone()) {
                Ok(turn) => turns.push(turn),
                Err(_) => skipped += 1,
            },
            None => skipped += 1,
        }
    }
    (turns, skipped)
}

#[async_trait]
impl MemoryStore for MongoMemoryStore {
    async fn add_message(&self, turn: MessageTurn) -> Result<(), MemoryError> {
        if let Err(e) = self.try_add(&turn).await {
            self.metrics.record_degraded_write();
            error!(error = %e, conversation_id = %turn.conversation_id, "Mongo insert failed, dropping turn");
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
                error!(error = %e, conversation_id, "Mongo read failed, returning empty history");
                Ok(String::new())
            }
        }
    }

    async fn clear(&self, conversation_id: Option<&str>) -> Result<(), MemoryError> {
        if let Err(e) = self.try_clear(conversation_id).await {
            self.metrics.record_degraded_write();
            error!(error = %e, "Mongo delete failed");
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

    fn turn_document(human: &str, ai: &str) -> Document {
        let turn = MessageTurn::new(
            Message::new(human, "human"),
            Message::new(ai, "ai"),
            "c1",
        );
        doc! { "history": to_bson(&turn).unwrap() }
    }

    #[test]
    fn decode_keeps_well_formed_turns_in_order() {
        let documents = vec![turn_document("hi", "hello!"), turn_document("bye", "goodbye!")];
        let (turns, skipped) = decode_documents(&documents);
        assert_eq!(skipped, 0);
        assert_eq!(
            render_history(&turns),
            "human: hi\nai: hello!\nhuman: bye\nai: goodbye!"
        );
    }

    #[test]
    fn decode_skips_malformed_documents_but_renders_the_rest() {
        let documents = vec![
            turn_document("hi", "hello!"),
            doc! { "history": { "unexpected": true } },
            doc! { "created_at": DateTime::now() },
            turn_document("bye", "goodbye!"),
        ];
        let (turns, skipped) = decode_documents(&documents);
        assert_eq!(skipped, 2);
        assert_eq!(turns.len(), 2);
    }

    #[test]
    fn decode_of_all_malformed_documents_yields_empty_window() {
        let documents = vec![doc! { "history": 7 }, doc! {}];
        let (turns, skipped) = decode_documents(&documents);
        assert!(turns.is_empty());
        assert_eq!(skipped, 2);
    }
}
