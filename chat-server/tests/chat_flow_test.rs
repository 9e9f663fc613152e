//! End-to-end chat flow over the axum router.
//!
//! Uses the in-memory backend and a canned LLM client, so the full
//! load-history → generate → append loop runs without any external service.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use chat_server::{create_router, AppState, ChatManager};
use llm_client::LlmClient;
use memory::{ConversationMemory, InMemoryStore};

/// Echoes the input and the history it was shown, so tests can observe what
/// the manager loaded.
struct CannedLlm;

#[async_trait]
impl LlmClient for CannedLlm {
    async fn generate(&self, history: &str, input: &str) -> anyhow::Result<String> {
        Ok(format!("reply to '{input}' given [{history}]"))
    }
}

fn test_app() -> Router {
    let memory = ConversationMemory::with_store(Arc::new(InMemoryStore::new("test-session", 5)));
    let state = Arc::new(AppState {
        chat_manager: ChatManager::new(memory, Arc::new(CannedLlm)),
    });
    create_router(state)
}

async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_reports_healthy() {
    let app = test_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["status"], "healthy");
}

#[tokio::test]
async fn chat_defaults_the_conversation_id() {
    let app = test_app();
    let (status, body) = post_json(&app, "/chat", serde_json::json!({ "input": "hi" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["conversation_id"], "default");
}

#[tokio::test]
async fn history_accumulates_across_requests_and_clear_empties_it() {
    let app = test_app();

    let (status, first) = post_json(
        &app,
        "/chat",
        serde_json::json!({ "input": "hi", "conversation_id": "c1" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // First exchange sees empty history.
    assert_eq!(first["output"], "reply to 'hi' given []");

    let (_, second) = post_json(
        &app,
        "/chat",
        serde_json::json!({ "input": "bye", "conversation_id": "c1" }),
    )
    .await;
    // Second exchange sees the first turn, oldest first.
    let output = second["output"].as_str().unwrap();
    assert!(output.contains("human: hi"), "unexpected output: {output}");
    assert!(output.contains("ai: reply to 'hi'"), "unexpected output: {output}");

    let (status, cleared) = post_json(&app, "/clear/c1", serde_json::json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["status"], "success");

    let (_, third) = post_json(
        &app,
        "/chat",
        serde_json::json!({ "input": "hello again", "conversation_id": "c1" }),
    )
    .await;
    assert_eq!(third["output"], "reply to 'hello again' given []");
}

#[tokio::test]
async fn conversations_are_isolated() {
    let app = test_app();

    post_json(
        &app,
        "/chat",
        serde_json::json!({ "input": "secret", "conversation_id": "c1" }),
    )
    .await;

    let (_, other) = post_json(
        &app,
        "/chat",
        serde_json::json!({ "input": "hi", "conversation_id": "c2" }),
    )
    .await;
    assert_eq!(other["output"], "reply to 'hi' given []");
}

#[tokio::test]
async fn session_wide_clear_removes_every_conversation() {
    let app = test_app();

    for conversation in ["c1", "c2"] {
        post_json(
            &app,
            "/chat",
            serde_json::json!({ "input": "hi", "conversation_id": conversation }),
        )
        .await;
    }

    let (status, body) = post_json(&app, "/clear", serde_json::json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    for conversation in ["c1", "c2"] {
        let (_, reply) = post_json(
            &app,
            "/chat",
            serde_json::json!({ "input": "again", "conversation_id": conversation }),
        )
        .await;
        assert_eq!(reply["output"], "reply to 'again' given []");
    }
}
