//! Pluggable text generation backend abstraction
//!
//! Backend-agnostic interface for the one generative operation Tally needs:
//! turning a spending prompt into advisor text.
//!
//! # Architecture
//!
//! - `TextGenBackend` trait: defines the interface for all backends
//! - `TextGenClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAiBackend`, `MockBackend`
//!
//! The client is built from the resolved [`crate::config::AiConfig`]; when
//! that section is absent there is no client and callers stay on the
//! deterministic path.

mod mock;
mod openai;

pub use mock::{MockBackend, MOCK_COMPLETION};
pub use openai::OpenAiBackend;

use async_trait::async_trait;

use crate::config::AiConfig;
use crate::error::Result;

/// Sampling parameters for a completion request
#[derive(Debug, Clone, Copy)]
pub struct GenerationOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_tokens: 300,
            temperature: 0.7,
        }
    }
}

/// Trait defining the interface for all text generation backends
///
/// Backends must be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait TextGenBackend: Send + Sync {
    /// Generate a completion for a prompt
    async fn complete(&self, prompt: &str, options: &GenerationOptions) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging and insight attribution)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete text generation client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum TextGenClient {
    /// Any server implementing the OpenAI chat completions API
    OpenAi(OpenAiBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl TextGenClient {
    /// Create a client from resolved configuration
    ///
    /// Returns None when the AI section is absent, which the insight
    /// formatter treats as "deterministic only".
    pub fn from_config(config: Option<&AiConfig>) -> Option<Self> {
        config.map(|c| TextGenClient::OpenAi(OpenAiBackend::from_config(c)))
    }

    /// Create a mock client for testing
    pub fn mock() -> Self {
        TextGenClient::Mock(MockBackend::new())
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        match self {
            TextGenClient::OpenAi(b) => TextGenClient::OpenAi(b.with_model(model)),
            TextGenClient::Mock(b) => TextGenClient::Mock(b.with_model(model)),
        }
    }
}

// Implement TextGenBackend for TextGenClient by delegating to the inner backend
#[async_trait]
impl TextGenBackend for TextGenClient {
    async fn complete(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        match self {
            TextGenClient::OpenAi(b) => b.complete(prompt, options).await,
            TextGenClient::Mock(b) => b.complete(prompt, options).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            TextGenClient::OpenAi(b) => b.health_check().await,
            TextGenClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            TextGenClient::OpenAi(b) => b.model(),
            TextGenClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            TextGenClient::OpenAi(b) => b.host(),
            TextGenClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_mock() {
        let client = TextGenClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = TextGenClient::mock();
        assert!(client.health_check().await);
    }

    #[test]
    fn test_from_config_absent() {
        assert!(TextGenClient::from_config(None).is_none());
    }

    #[test]
    fn test_from_config_present() {
        let config = AiConfig {
            base_url: "https://api.openai.com".to_string(),
            api_key: "sk-test".to_string(),
            model: "gpt-4o-mini".to_string(),
        };

        let client = TextGenClient::from_config(Some(&config)).unwrap();
        assert_eq!(client.model(), "gpt-4o-mini");
        assert_eq!(client.host(), "https://api.openai.com");
    }

    #[test]
    fn test_generation_options_defaults() {
        let options = GenerationOptions::default();
        assert_eq!(options.max_tokens, 300);
        assert_eq!(options.temperature, 0.7);
    }
}
