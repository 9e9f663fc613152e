//! Backend registry identifiers.
//!
//! The configuration selects a backend by one of these enumerated
//! identifiers; parsing happens once at config load, and the single dispatch
//! site lives in [`crate::facade`]. No call site matches on strings.

use std::fmt;
use std::str::FromStr;

use memory_core::MemoryError;

/// Storage backend selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// In-memory store; nothing persisted across restarts.
    Base,
    /// Document store (MongoDB).
    Document,
    /// Relational store (MySQL).
    Relational,
    /// Key-value store with TTL expiry (Redis).
    KeyValue,
    /// Relational store with vector similarity search (PostgreSQL + pgvector).
    VectorRelational,
}

impl BackendKind {
    /// Identifier as written in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Document => "document",
            Self::Relational => "relational",
            Self::KeyValue => "key-value",
            Self::VectorRelational => "vector-relational",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(Self::Base),
            "document" => Ok(Self::Document),
            "relational" => Ok(Self::Relational),
            "key-value" => Ok(Self::KeyValue),
            "vector-relational" => Ok(Self::VectorRelational),
            other => Err(MemoryError::Configuration(format!(
                "unknown memory backend '{other}' (expected one of: base, document, relational, key-value, vector-relational)"
            ))),
        }
    }
}
