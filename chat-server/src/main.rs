//! chat-server entry point: config, logging, memory facade, HTTP serve.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use chat_server::{create_router, AppState, ChatManager, ServerConfig};
use llm_client::{LlmClient, OpenAILlmClient};
use memory::{ConversationMemory, MemoryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env()?;
    config.validate()?;
    let memory_config = MemoryConfig::from_env()?;

    chat_server::logger::init_tracing(&config.log_file)?;

    let memory = ConversationMemory::connect(&memory_config)
        .await
        .context("failed to set up conversation memory")?;

    let llm: Arc<dyn LlmClient> = Arc::new(
        OpenAILlmClient::with_base_url(
            config.openai_api_key.clone(),
            config.model_name.clone(),
            config.openai_base_url.as_deref(),
        )
        .with_temperature(config.temperature),
    );

    let state = Arc::new(AppState {
        chat_manager: ChatManager::new(memory, llm),
    });
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, backend = %memory_config.backend, "chat server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
