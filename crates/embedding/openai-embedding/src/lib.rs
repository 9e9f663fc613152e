//! # OpenAI Embedding Service
//!
//! Implementation of the [`EmbeddingService`] trait over OpenAI's embeddings
//! API (or any OpenAI-compatible endpoint via a custom base URL).
//!
//! **Considerations**:
//! - Requires an API key
//! - Subject to provider rate limits and per-token cost
//!
//! ## Example
//!
//! ```rust,no_run
//! use openai_embedding::OpenAIEmbedding;
//!
//! let service = OpenAIEmbedding::new("sk-...".to_string(), "text-embedding-3-small".to_string())
//!     .with_dimensions(1536);
//! ```
//!
//! When a vector column in storage has a fixed dimension, request the same
//! dimension here so stored vectors always match the column.

use async_openai::{config::OpenAIConfig, types::CreateEmbeddingRequestArgs, Client};
use async_trait::async_trait;
use tracing::{debug, instrument};

use embedding::EmbeddingService;

/// OpenAI embedding service. Holds the API client, model name, and an
/// optional requested output dimension.
#[derive(Debug, Clone)]
pub struct OpenAIEmbedding {
    client: Client<OpenAIConfig>,
    model: String,
    dimensions: Option<u32>,
}

impl OpenAIEmbedding {
    /// Creates a new embedding service for the given API key and model.
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_base_url(api_key, model, None)
    }

    /// Creates a new embedding service targeting an OpenAI-compatible
    /// endpoint when `base_url` is `Some`.
    pub fn with_base_url(api_key: String, model: String, base_url: Option<&str>) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(url) = base_url.filter(|s| !s.is_empty()) {
            config = config.with_api_base(url);
        }
        Self {
            client: Client::with_config(config),
            model,
            dimensions: None,
        }
    }

    /// Requests a specific output dimension from the API. Only supported by
    /// models that accept the `dimensions` parameter (the v3 families).
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions as u32);
        self
    }

    /// Returns the embedding model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl EmbeddingService for OpenAIEmbedding {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        let mut request = CreateEmbeddingRequestArgs::default();
        request.model(&self.model).input(text);
        if let Some(dimensions) = self.dimensions {
            request.dimensions(dimensions);
        }

        let response = self.client.embeddings().create(request.build()?).await?;
        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| anyhow::anyhow!("embeddings API returned no data"))?;

        debug!(model = %self.model, dimension = embedding.len(), "embedded one text");
        Ok(embedding)
    }

    #[instrument(skip(self, texts))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut request = CreateEmbeddingRequestArgs::default();
        request.model(&self.model).input(texts.to_vec());
        if let Some(dimensions) = self.dimensions {
            request.dimensions(dimensions);
        }

        let response = self.client.embeddings().create(request.build()?).await?;
        let mut embeddings: Vec<(u32, Vec<f32>)> = response
            .data
            .into_iter()
            .map(|d| (d.index, d.embedding))
            .collect();
        embeddings.sort_by_key(|(index, _)| *index);

        debug!(model = %self.model, count = embeddings.len(), "embedded batch");
        Ok(embeddings.into_iter().map(|(_, e)| e).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_model_and_dimensions() {
        let service = OpenAIEmbedding::new("sk-test".to_string(), "text-embedding-3-small".to_string())
            .with_dimensions(256);
        assert_eq!(service.model(), "text-embedding-3-small");
        assert_eq!(service.dimensions, Some(256));
    }

    /// Calls the real API; requires OPENAI_API_KEY.
    /// Run with: cargo test -p openai-embedding -- --ignored
    #[tokio::test]
    #[ignore]
    async fn embed_returns_requested_dimension() {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY not set");
        let service = OpenAIEmbedding::new(api_key, "text-embedding-3-small".to_string())
            .with_dimensions(256);

        let embedding = service.embed("hello world").await.unwrap();
        assert_eq!(embedding.len(), 256);
    }
}
