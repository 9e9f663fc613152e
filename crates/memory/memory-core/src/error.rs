//! Memory subsystem error types.
//!
//! Construction-time failures (bad connection string, unreachable backend)
//! are surfaced to the caller and abort facade setup. Per-call failures are
//! caught inside each backend, logged, and degraded to an empty result; see
//! the store implementations.

use thiserror::Error;

/// Errors produced by the conversation memory subsystem.
#[derive(Error, Debug)]
pub enum MemoryError {
    /// Invalid configuration (e.g. wrong connection-string dialect). Fatal at
    /// construction time.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Backend driver or network failure.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Malformed caller input (e.g. empty similarity query).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A stored turn could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl MemoryError {
    /// Wraps a backend driver error.
    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }

    /// Wraps an encode/decode error.
    pub fn serialization(err: impl std::fmt::Display) -> Self {
        Self::Serialization(err.to_string())
    }
}
