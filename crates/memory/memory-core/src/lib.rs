//! # Core Types and Traits
//!
//! This crate defines the shared surface of the conversation memory subsystem:
//!
//! - [`Message`] and [`MessageTurn`]: the unit of persisted conversation
//!   state (one human/AI exchange tied to a conversation).
//! - [`MemoryStore`]: the capability contract every backend implements.
//! - [`SimilaritySearch`]: the optional capability exposed only by backends
//!   that can rank turns by vector distance.
//! - [`MemoryError`]: the error taxonomy shared by all backends.
//! - [`StoreMetrics`]: counters that make the degrade-on-error policy
//!   observable.
//!
//! Backends are independent crates; this contract is the only code they
//! share.
//!
//! ## Example
//!
//! ```rust
//! use memory_core::{Message, MessageTurn};
//!
//! let turn = MessageTurn::new(
//!     Message::new("hi", "human"),
//!     Message::new("hello!", "ai"),
//!     "c1",
//! );
//! assert_eq!(turn.render(), "human: hi\nai: hello!");
//! ```

pub mod error;
pub mod metrics;
pub mod store;
pub mod types;

pub use error::MemoryError;
pub use metrics::{MetricsSnapshot, StoreMetrics};
pub use store::{MemoryStore, SimilaritySearch};
pub use types::{render_history, Message, MessageTurn};
