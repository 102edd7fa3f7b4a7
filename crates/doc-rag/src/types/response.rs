//! LLM responses and RAG answers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::retrieval::DocumentRetrieval;

/// Output of one LLM generation call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Response {
    /// Generated text
    pub content: String,
    /// Generation timestamp (UTC)
    pub generated_at: DateTime<Utc>,
    /// Model that produced the answer
    pub model_used: String,
    /// Wall-clock time of the generation call
    #[serde(default)]
    pub processing_time_ms: Option<u64>,
    /// Prompt tokens
    #[serde(default)]
    pub input_tokens: Option<u32>,
    /// Completion tokens
    #[serde(default)]
    pub output_tokens: Option<u32>,
    /// Provider name
    #[serde(default)]
    pub provider: Option<String>,
}

impl Response {
    /// Create a response stamped with the current time
    pub fn new(content: impl Into<String>, model_used: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            generated_at: Utc::now(),
            model_used: model_used.into(),
            processing_time_ms: None,
            input_tokens: None,
            output_tokens: None,
            provider: None,
        }
    }

    /// Set token counts
    pub fn with_tokens(mut self, input_tokens: Option<u32>, output_tokens: Option<u32>) -> Self {
        self.input_tokens = input_tokens;
        self.output_tokens = output_tokens;
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
}

/// An LLM response together with the passages it was grounded on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagResponse {
    /// The LLM output, fields copied verbatim
    #[serde(flatten)]
    pub response: Response,
    /// Retrieved passages, in retriever order
    pub sources: Vec<DocumentRetrieval>,
}

impl RagResponse {
    /// Attach sources to an LLM response
    pub fn new(response: Response, sources: Vec<DocumentRetrieval>) -> Self {
        Self { response, sources }
    }

    /// Generated answer text
    pub fn content(&self) -> &str {
        &self.response.content
    }

    /// IDs of the source passages, in order
    pub fn document_ids(&self) -> Vec<Uuid> {
        self.sources.iter().map(|s| s.id).collect()
    }
}
