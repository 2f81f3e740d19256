//! Mock backend for testing
//!
//! Returns a canned completion without a running server. The failing
//! variant exercises the insight formatter's fallback path.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::{GenerationOptions, TextGenBackend};

/// Canned text returned by a healthy mock
pub const MOCK_COMPLETION: &str =
    "Your spending looks steady this period. Most of it went to your top \
     category; consider a budget there. Nice work keeping transactions small.";

/// Mock text generation backend
///
/// Healthy by default; `failing()` makes every completion error so fallback
/// behavior can be tested deterministically.
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Whether complete should fail
    pub fail_completions: bool,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            fail_completions: false,
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            fail_completions: false,
        }
    }

    /// Create a mock backend whose completions always fail
    pub fn failing() -> Self {
        Self {
            healthy: true,
            fail_completions: true,
        }
    }

    /// Create a new instance with a different model (no-op for mock)
    pub fn with_model(&self, _model: &str) -> Self {
        self.clone()
    }
}

#[async_trait]
impl TextGenBackend for MockBackend {
    async fn complete(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String> {
        if self.fail_completions {
            return Err(Error::Completion("mock backend configured to fail".into()));
        }
        Ok(MOCK_COMPLETION.to_string())
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_completes() {
        let backend = MockBackend::new();
        let text = backend
            .complete("anything", &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(text, MOCK_COMPLETION);
    }

    #[tokio::test]
    async fn test_failing_mock_errors() {
        let backend = MockBackend::failing();
        let err = backend
            .complete("anything", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Completion(_)));
    }

    #[tokio::test]
    async fn test_unhealthy_mock() {
        assert!(!MockBackend::unhealthy().health_check().await);
        assert!(MockBackend::new().health_check().await);
    }
}
