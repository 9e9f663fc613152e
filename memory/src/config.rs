//! Memory subsystem configuration. Loaded from env once at process start.

use anyhow::Result;
use std::env;

use memory_core::MemoryError;
use memory_pgvector::SimilarityScope;

use crate::backend::BackendKind;

/// Every knob of the memory subsystem in one struct.
///
/// Built once (usually via [`MemoryConfig::from_env`]) and passed by
/// reference into [`crate::ConversationMemory::connect`]; components never
/// read the environment themselves.
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// MEMORY_BACKEND: which store to construct.
    pub backend: BackendKind,
    /// SESSION_ID: deployment/tenant scope grouping conversations.
    pub session_id: String,
    /// HISTORY_WINDOW_SIZE: turns returned by a recency history load.
    pub window_size: usize,

    /// MONGO_URI
    pub mongo_connection_string: String,
    /// MONGO_DATABASE
    pub mongo_database: String,
    /// MONGO_COLLECTION
    pub mongo_collection: String,

    /// MYSQL_URL: must carry the mysql:// dialect.
    pub mysql_connection_string: String,
    /// MYSQL_TABLE
    pub mysql_table: String,

    /// REDIS_URL
    pub redis_connection_string: String,
    /// REDIS_TTL_SECS: conversation expiry, refreshed on every append.
    pub redis_ttl_seconds: usize,

    /// POSTGRES_URL: must carry the postgres:// dialect.
    pub postgres_connection_string: String,
    /// POSTGRES_TABLE
    pub postgres_table: String,

    /// SIMILARITY_TOP_N: turns returned by the similarity window.
    pub similarity_top_n: usize,
    /// SIMILARITY_SCOPE: `session` or `conversation`.
    pub similarity_scope: SimilarityScope,
    /// EMBEDDING_MODEL
    pub embedding_model: String,
    /// EMBEDDING_DIM: dimension of the stored vector column.
    pub embedding_dim: usize,
    /// OPENAI_API_KEY: used by the vector backend's embedding client.
    pub openai_api_key: String,
    /// OPENAI_BASE_URL: optional OpenAI-compatible endpoint override.
    pub openai_base_url: Option<String>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Base,
            session_id: "default".to_string(),
            window_size: 5,
            mongo_connection_string: "mongodb://localhost:27017".to_string(),
            mongo_database: "chatbot".to_string(),
            mongo_collection: "chat_memory".to_string(),
            mysql_connection_string: "mysql://root@localhost:3306/chatdb".to_string(),
            mysql_table: "chat_memory".to_string(),
            redis_connection_string: "redis://localhost:6379/0".to_string(),
            redis_ttl_seconds: 3600,
            postgres_connection_string: "postgres://postgres@localhost:5432/chatdb".to_string(),
            postgres_table: "chat_memory".to_string(),
            similarity_top_n: 3,
            similarity_scope: SimilarityScope::Session,
            embedding_model: "text-embedding-3-small".to_string(),
            embedding_dim: 1536,
            openai_api_key: String::new(),
            openai_base_url: None,
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl MemoryConfig {
    /// Loads the configuration from environment variables, falling back to
    /// the defaults above. Call `dotenvy::dotenv()` first if a `.env` file
    /// should apply.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let backend = env_or("MEMORY_BACKEND", defaults.backend.as_str())
            .parse::<BackendKind>()?;
        let similarity_scope = match env::var("SIMILARITY_SCOPE") {
            Ok(value) => value.parse::<SimilarityScope>()?,
            Err(_) => defaults.similarity_scope,
        };

        let config = Self {
            backend,
            session_id: env_or("SESSION_ID", &defaults.session_id),
            window_size: env_parse("HISTORY_WINDOW_SIZE", defaults.window_size),
            mongo_connection_string: env_or("MONGO_URI", &defaults.mongo_connection_string),
            mongo_database: env_or("MONGO_DATABASE", &defaults.mongo_database),
            mongo_collection: env_or("MONGO_COLLECTION", &defaults.mongo_collection),
            mysql_connection_string: env_or("MYSQL_URL", &defaults.mysql_connection_string),
            mysql_table: env_or("MYSQL_TABLE", &defaults.mysql_table),
            redis_connection_string: env_or("REDIS_URL", &defaults.redis_connection_string),
            redis_ttl_seconds: env_parse("REDIS_TTL_SECS", defaults.redis_ttl_seconds),
            postgres_connection_string: env_or("POSTGRES_URL", &defaults.postgres_connection_string),
            postgres_table: env_or("POSTGRES_TABLE", &defaults.postgres_table),
            similarity_top_n: env_parse("SIMILARITY_TOP_N", defaults.similarity_top_n),
            similarity_scope,
            embedding_model: env_or("EMBEDDING_MODEL", &defaults.embedding_model),
            embedding_dim: env_parse("EMBEDDING_DIM", defaults.embedding_dim),
            openai_api_key: env_or("OPENAI_API_KEY", ""),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants that would otherwise surface as confusing runtime
    /// behavior.
    pub fn validate(&self) -> Result<(), MemoryError> {
        if self.session_id.is_empty() {
            return Err(MemoryError::Configuration(
                "session_id must not be empty".to_string(),
            ));
        }
        if self.window_size == 0 {
            return Err(MemoryError::Configuration(
                "history window size must be at least 1".to_string(),
            ));
        }
        if self.backend == BackendKind::VectorRelational {
            if self.similarity_top_n == 0 {
                return Err(MemoryError::Configuration(
                    "similarity top-N must be at least 1".to_string(),
                ));
            }
            if self.embedding_dim == 0 {
                return Err(MemoryError::Configuration(
                    "embedding dimension must be at least 1".to_string(),
                ));
            }
            if self.openai_api_key.is_empty() {
                return Err(MemoryError::Configuration(
                    "vector-relational backend requires OPENAI_API_KEY for embeddings".to_string(),
                ));
            }
        }
        Ok(())
    }
}
