//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::manager::ChatManager;

/// Conversation used when the request names none.
const DEFAULT_CONVERSATION_ID: &str = "default";

/// Shared application state.
pub struct AppState {
    pub chat_manager: ChatManager,
}

/// Chat request body.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub input: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// Chat response body.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub output: String,
    pub conversation_id: String,
}

/// Clear response body.
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub status: &'static str,
    pub message: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

/// Builds the application router with permissive CORS.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/clear", post(clear_session))
        .route("/clear/:conversation_id", post(clear_conversation))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Process a chat message.
async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ErrorResponse> {
    let conversation_id = request
        .conversation_id
        .unwrap_or_else(|| DEFAULT_CONVERSATION_ID.to_string());

    match state
        .chat_manager
        .process_message(&request.input, &conversation_id)
        .await
    {
        Ok(output) => Ok(Json(ChatResponse {
            output,
            conversation_id,
        })),
        Err(e) => {
            error!(error = %e, conversation_id, "chat exchange failed");
            Err(ErrorResponse {
                error: e.to_string(),
                code: "generation_failed",
            })
        }
    }
}

/// Clear one conversation's history.
async fn clear_conversation(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<String>,
) -> Result<Json<ClearResponse>, ErrorResponse> {
    info!(conversation_id, "clear requested");
    state
        .chat_manager
        .clear_history(Some(&conversation_id))
        .await
        .map_err(|e| ErrorResponse {
            error: e.to_string(),
            code: "clear_failed",
        })?;

    Ok(Json(ClearResponse {
        status: "success",
        message: format!("History for conversation {conversation_id} cleared"),
    }))
}

/// Clear every conversation in the configured session scope.
async fn clear_session(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClearResponse>, ErrorResponse> {
    info!("session-wide clear requested");
    state
        .chat_manager
        .clear_history(None)
        .await
        .map_err(|e| ErrorResponse {
            error: e.to_string(),
            code: "clear_failed",
        })?;

    Ok(Json(ClearResponse {
        status: "success",
        message: "History for all conversations in this session cleared".to_string(),
    }))
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}
