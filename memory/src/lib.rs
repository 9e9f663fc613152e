//! # Memory Crate
//!
//! The single entry point the orchestration layer depends on for
//! conversation memory. It ties together:
//!
//! - [`MemoryConfig`]: every knob of the subsystem, built once at process
//!   start (typically via [`MemoryConfig::from_env`]) and passed by
//!   reference; no component reads the environment on its own.
//! - [`BackendKind`]: the enumerated registry of storage backends.
//! - [`ConversationMemory`]: the facade wrapping the selected backend.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use memory::{ConversationMemory, Message, MessageTurn, MemoryConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = MemoryConfig::from_env()?;
//! let memory = ConversationMemory::connect(&config).await?;
//!
//! let history = memory.load_history("c1", Some("what did we discuss?")).await?;
//! memory
//!     .add_message(MessageTurn::new(
//!         Message::new("hi", "human"),
//!         Message::new("hello!", "ai"),
//!         "c1",
//!     ))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! Backend construction is eager: a backend that cannot be reached fails
//! [`ConversationMemory::connect`]. Per-call storage failures after that
//! never fail a chat turn; they degrade to empty results and are visible in
//! [`StoreMetrics`].

pub mod backend;
pub mod config;
pub mod facade;

pub use backend::BackendKind;
pub use config::MemoryConfig;
pub use facade::ConversationMemory;

pub use memory_core::{
    render_history, MemoryError, MemoryStore, Message, MessageTurn, MetricsSnapshot,
    SimilaritySearch, StoreMetrics,
};
pub use memory_inmemory::InMemoryStore;
pub use memory_pgvector::SimilarityScope;
