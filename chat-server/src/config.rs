//! Server config: bind address, logging, and LLM settings. Loaded from env.

use anyhow::Result;
use std::env;

/// Server-side configuration; memory settings live in
/// [`memory::MemoryConfig`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HOST
    pub host: String,
    /// PORT
    pub port: u16,
    /// Log file path (LOG_FILE)
    pub log_file: String,
    /// MODEL_NAME: chat completion model.
    pub model_name: String,
    /// TEMPERATURE: sampling temperature, higher means more creative.
    pub temperature: f32,
    /// OPENAI_API_KEY
    pub openai_api_key: String,
    /// OPENAI_BASE_URL: optional OpenAI-compatible endpoint override.
    pub openai_base_url: Option<String>,
}

impl ServerConfig {
    /// Load from environment variables.
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8000);
        let log_file =
            env::var("LOG_FILE").unwrap_or_else(|_| "logs/chat-server.log".to_string());
        let model_name =
            env::var("MODEL_NAME").unwrap_or_else(|_| "gpt-3.5-turbo".to_string());
        let temperature = env::var("TEMPERATURE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.7);
        let openai_api_key = env::var("OPENAI_API_KEY").unwrap_or_default();
        let openai_base_url = env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        Ok(Self {
            host,
            port,
            log_file,
            model_name,
            temperature,
            openai_api_key,
            openai_base_url,
        })
    }

    /// Validate config; generation cannot work without an API key.
    pub fn validate(&self) -> Result<()> {
        if self.openai_api_key.is_empty() {
            anyhow::bail!("OPENAI_API_KEY is not set");
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            anyhow::bail!(
                "TEMPERATURE must be between 0.0 and 2.0, got {}",
                self.temperature
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_fails_validation() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
            log_file: "logs/test.log".to_string(),
            model_name: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            openai_api_key: String::new(),
            openai_base_url: None,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_temperature_fails_validation() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
            log_file: "logs/test.log".to_string(),
            model_name: "gpt-3.5-turbo".to_string(),
            temperature: 3.5,
            openai_api_key: "sk-test".to_string(),
            openai_base_url: None,
        };
        assert!(config.validate().is_err());
    }
}
