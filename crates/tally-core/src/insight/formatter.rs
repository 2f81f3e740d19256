//! Insight formatter with collaborator fallback

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::SpendingSummary;
use crate::ai::{GenerationOptions, TextGenBackend, TextGenClient};

use super::template::{build_prompt, render_template};

/// Where an insight's text came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum InsightSource {
    /// AI-generated by the named model
    Generated { model: String },
    /// Deterministic template (no collaborator, or it failed)
    Template,
}

/// A formatted insight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub text: String,
    pub source: InsightSource,
    pub generated_at: DateTime<Utc>,
}

/// Formats spending summaries into insight text
///
/// Construction takes the optional text generation client once; there is no
/// ambient lookup later. `generate` never returns an error: any collaborator
/// failure is logged and the deterministic template is returned instead, so
/// the caller always has text to show.
pub struct InsightFormatter {
    client: Option<TextGenClient>,
    options: GenerationOptions,
}

impl InsightFormatter {
    pub fn new(client: Option<TextGenClient>) -> Self {
        Self {
            client,
            options: GenerationOptions::default(),
        }
    }

    /// Override sampling parameters
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Whether a collaborator is configured
    pub fn has_collaborator(&self) -> bool {
        self.client.is_some()
    }

    /// Render the deterministic template for a summary
    pub fn deterministic(&self, summary: &SpendingSummary) -> Insight {
        Insight {
            text: render_template(summary),
            source: InsightSource::Template,
            generated_at: Utc::now(),
        }
    }

    /// Generate insight text, falling back to the template on any failure
    pub async fn generate(&self, summary: &SpendingSummary) -> Insight {
        let client = match self.client {
            Some(ref client) => client,
            None => return self.deterministic(summary),
        };

        let prompt = build_prompt(summary);
        match client.complete(&prompt, &self.options).await {
            Ok(text) => Insight {
                text,
                source: InsightSource::Generated {
                    model: client.model().to_string(),
                },
                generated_at: Utc::now(),
            },
            Err(e) => {
                tracing::warn!(
                    model = client.model(),
                    host = client.host(),
                    error = %e,
                    "Text generation failed, using deterministic summary"
                );
                self.deterministic(summary)
            }
        }
    }
}
