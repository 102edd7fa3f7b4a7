//! Embedding results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One embedding call's output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Embedding {
    /// Model that produced the vector
    pub model: String,
    /// The embedding vector
    pub vector: Vec<f32>,
    /// Prompt tokens consumed, if reported
    #[serde(default)]
    pub prompt_tokens: Option<u32>,
    /// Completion tokens consumed, if reported
    #[serde(default)]
    pub completion_tokens: Option<u32>,
    /// Provider name (e.g. "ollama")
    #[serde(default)]
    pub provider: Option<String>,
    /// Generation timestamp (UTC)
    pub generated_at: DateTime<Utc>,
    /// Wall-clock time of the call
    #[serde(default)]
    pub processing_time_ms: Option<u64>,
}

impl Embedding {
    /// Create an embedding stamped with the current time
    pub fn new(model: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            model: model.into(),
            vector,
            prompt_tokens: None,
            completion_tokens: None,
            provider: None,
            generated_at: Utc::now(),
            processing_time_ms: None,
        }
    }

    /// Set token usage
    pub fn with_usage(mut self, prompt_tokens: Option<u32>, completion_tokens: Option<u32>) -> Self {
        self.prompt_tokens = prompt_tokens;
        self.completion_tokens = completion_tokens;
        self
    }

    /// Set the provider name
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Set the measured processing time
    pub fn with_processing_time(mut self, ms: u64) -> Self {
        self.processing_time_ms = Some(ms);
        self
    }

    /// Vector dimensionality
    pub fn dimensions(&self) -> usize {
        self.vector.len()
    }
}
