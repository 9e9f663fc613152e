//! The conversation memory facade.
//!
//! [`ConversationMemory`] wraps the one backend selected by configuration
//! and is the only type the orchestration layer touches. Construction is
//! eager and fatal on failure; after that the facade holds no state of its
//! own, and every call round-trips to the backend.

use std::sync::Arc;

use tracing::info;

use embedding::EmbeddingService;
use memory_core::{
    MemoryError, MemoryStore, MessageTurn, SimilaritySearch, StoreMetrics,
};
use memory_inmemory::InMemoryStore;
use memory_mongo::{MongoMemoryStore, MongoStoreConfig};
use memory_mysql::{MySqlMemoryStore, MySqlStoreConfig};
use memory_pgvector::{PgVectorMemoryStore, PgVectorStoreConfig};
use memory_redis::{RedisMemoryStore, RedisStoreConfig};
use openai_embedding::OpenAIEmbedding;

use crate::backend::BackendKind;
use crate::config::MemoryConfig;

/// Facade over the configured conversation memory backend.
#[derive(Clone)]
pub struct ConversationMemory {
    store: Arc<dyn MemoryStore>,
}

impl ConversationMemory {
    /// Constructs the configured backend and wraps it.
    ///
    /// This is the registry's single dispatch site. Construction is eager: a
    /// backend whose connection cannot be established fails the whole setup,
    /// unlike per-call I/O failures which degrade later.
    pub async fn connect(config: &MemoryConfig) -> Result<Self, MemoryError> {
        config.validate()?;
        info!(backend = %config.backend, session_id = %config.session_id, "setting up conversation memory");

        let store: Arc<dyn MemoryStore> = match config.backend {
            BackendKind::Base => Arc::new(InMemoryStore::new(
                config.session_id.clone(),
                config.window_size,
            )),
            BackendKind::Document => Arc::new(
                MongoMemoryStore::connect(MongoStoreConfig {
                    connection_string: config.mongo_connection_string.clone(),
                    database: config.mongo_database.clone(),
                    collection: config.mongo_collection.clone(),
                    session_id: config.session_id.clone(),
                    window_size: config.window_size,
                })
                .await?,
            ),
            BackendKind::Relational => Arc::new(
                MySqlMemoryStore::connect(MySqlStoreConfig {
                    connection_string: config.mysql_connection_string.clone(),
                    table: config.mysql_table.clone(),
                    session_id: config.session_id.clone(),
                    window_size: config.window_size,
                })
                .await?,
            ),
            BackendKind::KeyValue => Arc::new(
                RedisMemoryStore::connect(RedisStoreConfig {
                    connection_string: config.redis_connection_string.clone(),
                    session_id: config.session_id.clone(),
                    window_size: config.window_size,
                    ttl_seconds: config.redis_ttl_seconds,
                })
                .await?,
            ),
            BackendKind::VectorRelational => {
                let embedder: Arc<dyn EmbeddingService> = Arc::new(
                    OpenAIEmbedding::with_base_url(
                        config.openai_api_key.clone(),
                        config.embedding_model.clone(),
                        config.openai_base_url.as_deref(),
                    )
                    .with_dimensions(config.embedding_dim),
                );
                Arc::new(
                    PgVectorMemoryStore::connect(
                        PgVectorStoreConfig {
                            connection_string: config.postgres_connection_string.clone(),
                            table: config.postgres_table.clone(),
                            session_id: config.session_id.clone(),
                            window_size: config.window_size,
                            similarity_top_n: config.similarity_top_n,
                            similarity_scope: config.similarity_scope,
                            embedding_dim: config.embedding_dim,
                        },
                        embedder,
                    )
                    .await?,
                )
            }
        };

        Ok(Self { store })
    }

    /// Wraps an already-constructed store. Useful in tests and for custom
    /// backends.
    pub fn with_store(store: Arc<dyn MemoryStore>) -> Self {
        Self { store }
    }

    /// Persists one turn. See [`MemoryStore::add_message`].
    pub async fn add_message(&self, turn: MessageTurn) -> Result<(), MemoryError> {
        self.store.add_message(turn).await
    }

    /// Loads the rendered history window. See [`MemoryStore::load_history`].
    pub async fn load_history(
        &self,
        conversation_id: &str,
        query: Option<&str>,
    ) -> Result<String, MemoryError> {
        self.store.load_history(conversation_id, query).await
    }

    /// Deletes one conversation, or the whole session scope when `None`.
    /// See [`MemoryStore::clear`].
    pub async fn clear(&self, conversation_id: Option<&str>) -> Result<(), MemoryError> {
        self.store.clear(conversation_id).await
    }

    /// Similarity capability of the selected backend, if it has one.
    pub fn similarity(&self) -> Option<&dyn SimilaritySearch> {
        self.store.similarity()
    }

    /// Degrade-policy counters of the selected backend.
    pub fn metrics(&self) -> &StoreMetrics {
        self.store.metrics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memory_core::Message;

    #[tokio::test]
    async fn base_backend_connects_and_round_trips() {
        let config = MemoryConfig::default();
        let memory = ConversationMemory::connect(&config).await.unwrap();

        memory
            .add_message(MessageTurn::new(
                Message::new("hi", "human"),
                Message::new("hello!", "ai"),
                "c1",
            ))
            .await
            .unwrap();

        assert_eq!(
            memory.load_history("c1", None).await.unwrap(),
            "human: hi\nai: hello!"
        );
        assert!(memory.similarity().is_none());
        assert!(memory.metrics().snapshot().is_clean());
    }

    #[tokio::test]
    async fn invalid_config_fails_setup() {
        let config = MemoryConfig {
            window_size: 0,
            ..Default::default()
        };
        assert!(ConversationMemory::connect(&config).await.is_err());
    }

    #[tokio::test]
    async fn wrong_relational_dialect_fails_setup() {
        let config = MemoryConfig {
            backend: BackendKind::Relational,
            mysql_connection_string: "sqlite://chat.db".to_string(),
            ..Default::default()
        };
        let err = ConversationMemory::connect(&config).await.err().unwrap();
        assert!(matches!(err, MemoryError::Configuration(_)));
    }
}
