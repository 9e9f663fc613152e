//! # Chat Server
//!
//! HTTP surface for the chat service. Thin by design: routing, request and
//! response shapes, and CORS live here; everything stateful sits behind the
//! [`ChatManager`], which drives the conversation memory facade and the LLM
//! client.

pub mod config;
pub mod logger;
pub mod manager;
pub mod routes;

pub use config::ServerConfig;
pub use manager::ChatManager;
pub use routes::{create_router, AppState};
