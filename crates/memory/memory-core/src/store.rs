//! # Memory Storage Contract
//!
//! The [`MemoryStore`] trait is the single interface the orchestration layer
//! depends on. Every backend (in-memory, document, relational, key-value,
//! vector-relational) implements it; nothing below this trait is visible to
//! callers outside the memory subsystem.
//!
//! ## Failure semantics
//!
//! Per-call backend I/O errors must not abort a chat turn. Implementations
//! catch driver errors at the method boundary, log them, bump their
//! [`StoreMetrics`](crate::StoreMetrics), and return a degraded result: the
//! empty string for reads, a silent no-op for writes and clears. The
//! `Result` in each signature exists for the contract; construction-time
//! failures are the fatal ones.
//!
//! ## Similarity capability
//!
//! Only the vector-augmented backend can rank turns by semantic distance.
//! Rather than forcing a superset method onto every backend, stores declare
//! the capability through [`MemoryStore::similarity`]; callers branch on the
//! returned option, not on the concrete type.

use async_trait::async_trait;

use crate::error::MemoryError;
use crate::metrics::StoreMetrics;
use crate::types::MessageTurn;

/// Capability contract for conversation memory backends.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Persists one turn under the store's configured session scope.
    ///
    /// For TTL-backed stores this also resets the conversation's expiry.
    async fn add_message(&self, turn: MessageTurn) -> Result<(), MemoryError>;

    /// Returns a flattened text rendering of up to K most recent (or most
    /// relevant, for similarity-capable backends) turns for the conversation,
    /// oldest-to-newest, joined by newlines.
    ///
    /// `query` is consulted only by similarity-capable backends and ignored
    /// elsewhere. No history renders as `""`, never as an error.
    async fn load_history(
        &self,
        conversation_id: &str,
        query: Option<&str>,
    ) -> Result<String, MemoryError>;

    /// Deletes one conversation's turns, or every turn in the store's session
    /// scope when `conversation_id` is `None`.
    ///
    /// Destructive and non-recoverable. Clearing an already-empty scope is a
    /// no-op, not an error.
    async fn clear(&self, conversation_id: Option<&str>) -> Result<(), MemoryError>;

    /// Declares the similarity-search capability.
    ///
    /// Returns `Some` only for backends that can rank turns by vector
    /// distance; absence (not a no-op) is the contract.
    fn similarity(&self) -> Option<&dyn SimilaritySearch> {
        None
    }

    /// Degrade-policy counters for this store instance.
    fn metrics(&self) -> &StoreMetrics;
}

/// Semantic retrieval over stored turns, exposed only by vector-capable
/// backends via [`MemoryStore::similarity`].
#[async_trait]
pub trait SimilaritySearch: Send + Sync {
    /// Returns the rendered text of the `top_k` turns closest to `query` by
    /// vector distance, best match first.
    async fn search_similar(
        &self,
        conversation_id: &str,
        query: &str,
        top_k: usize,
    ) -> Result<String, MemoryError>;
}
