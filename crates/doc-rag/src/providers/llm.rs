//! LLM provider trait for chat completion

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Message, Response};

/// Trait for LLM-based answer generation
///
/// Implementations:
/// - `OllamaLlm`: Local Ollama server (llama3, phi3, etc.)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete an ordered, role-tagged conversation
    async fn generate(&self, messages: &[Message]) -> Result<Response>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
