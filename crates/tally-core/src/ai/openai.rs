//! OpenAI-compatible backend implementation
//!
//! Works with any server that implements the OpenAI chat completions API,
//! hosted or local (vLLM, LocalAI, llama-server, etc.).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AiConfig;
use crate::error::{Error, Result};

use super::{GenerationOptions, TextGenBackend};

/// OpenAI-compatible text generation backend
#[derive(Clone)]
pub struct OpenAiBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiBackend {
    /// Create a backend without an API key (local servers)
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
        }
    }

    /// Create with an API key
    pub fn with_api_key(base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            api_key: Some(api_key.to_string()),
            ..Self::new(base_url, model)
        }
    }

    /// Create from resolved configuration
    pub fn from_config(config: &AiConfig) -> Self {
        Self::with_api_key(&config.base_url, &config.model, &config.api_key)
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            model: model.to_string(),
            api_key: self.api_key.clone(),
        }
    }
}

#[async_trait]
impl TextGenBackend for OpenAiBackend {
    async fn complete(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: Some(options.temperature),
            max_tokens: Some(options.max_tokens),
            stream: false,
        };

        debug!(model = %self.model, host = %self.base_url, "Requesting completion");

        let mut req_builder = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&request);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Completion(format!(
                "chat completions error {}: {}",
                status, body
            )));
        }

        let chat_response: ChatCompletionResponse = response.json().await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Completion("no choices in response".into()))
    }

    async fn health_check(&self) -> bool {
        // /v1/models is the standard OpenAI endpoint; some local servers
        // only answer /health
        if let Ok(resp) = self
            .http_client
            .get(format!("{}/v1/models", self.base_url))
            .send()
            .await
        {
            if resp.status().is_success() {
                return true;
            }
        }

        if let Ok(resp) = self
            .http_client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
        {
            return resp.status().is_success();
        }

        false
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

/// Chat message
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

/// Chat completion choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

/// Chat response message
#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_model_and_host() {
        let backend = OpenAiBackend::new("http://localhost:8000/", "gpt-4o-mini");
        assert_eq!(backend.model(), "gpt-4o-mini");
        assert_eq!(backend.host(), "http://localhost:8000");
    }

    #[test]
    fn test_with_model_keeps_credentials() {
        let backend = OpenAiBackend::with_api_key("https://api.openai.com", "gpt-4o-mini", "sk-1");
        let other = backend.with_model("gpt-4o");
        assert_eq!(other.model(), "gpt-4o");
        assert_eq!(other.host(), "https://api.openai.com");
        assert_eq!(other.api_key.as_deref(), Some("sk-1"));
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatCompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "Hello".to_string(),
            }],
            temperature: Some(0.7),
            max_tokens: Some(300),
            stream: false,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""model":"gpt-4o-mini""#));
        assert!(json.contains(r#""role":"user""#));
        assert!(json.contains(r#""max_tokens":300"#));
        assert!(json.contains(r#""stream":false"#));
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"Spend less."}}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices[0].message.content, "Spend less.");
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let backend = OpenAiBackend::new("http://127.0.0.1:1", "gpt-4o-mini");
        assert!(!backend.health_check().await);
    }
}
