//! Ollama HTTP client for embeddings and chat completion with retry logic

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::sleep;

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::types::{Embedding, Message, Response};

/// Provider name reported on embeddings and responses
pub const PROVIDER_NAME: &str = "ollama";

/// Ollama API client with automatic retry
pub struct OllamaClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: LlmConfig,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    message: ChatMessage,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

impl OllamaClient {
    /// Create a new Ollama client with retry support
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Model used for embeddings
    pub fn embed_model(&self) -> &str {
        &self.config.embed_model
    }

    /// Model used for chat completion
    pub fn generate_model(&self) -> &str {
        &self.config.generate_model
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Retry a request with exponential backoff
    async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_retries = self.config.max_retries;
        let mut last_error = None;

        for attempt in 0..=max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < max_retries {
                        let delay = Duration::from_secs(2u64.pow(attempt));
                        tracing::warn!(
                            "Ollama request failed (attempt {}/{}), retrying in {:?}",
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::llm("Unknown error")))
    }

    /// Check if Ollama is available
    pub async fn health_check(&self) -> Result<bool> {
        match self.client.get(self.url("/api/tags")).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Generate an embedding with retry
    pub async fn embed(&self, text: &str) -> Result<Embedding> {
        let url = self.url("/api/embeddings");
        let url = url.as_str();
        let model = self.config.embed_model.as_str();
        let start = Instant::now();

        let vector = self
            .retry_request(|| async move {
                let response = self
                    .client
                    .post(url)
                    .json(&EmbedRequest { model, prompt: text })
                    .send()
                    .await
                    .map_err(|e| Error::embedding(format!("Embedding request failed: {}", e)))?;

                if !response.status().is_success() {
                    return Err(Error::embedding(format!(
                        "Embedding failed: HTTP {}",
                        response.status()
                    )));
                }

                let body: EmbedResponse = response
                    .json()
                    .await
                    .map_err(|e| Error::embedding(format!("Failed to parse embedding response: {}", e)))?;

                if body.embedding.is_empty() {
                    return Err(Error::embedding("Ollama returned an empty embedding"));
                }
                Ok(body.embedding)
            })
            .await?;

        tracing::debug!("Embedded {} chars into {} dimensions", text.len(), vector.len());

        Ok(Embedding::new(model, vector)
            .with_provider(PROVIDER_NAME)
            .with_processing_time(start.elapsed().as_millis() as u64))
    }

    /// Complete a chat conversation with retry
    pub async fn chat(&self, messages: &[Message]) -> Result<Response> {
        let url = self.url("/api/chat");
        let url = url.as_str();
        let model = self.config.generate_model.as_str();
        let temperature = self.config.temperature;
        let start = Instant::now();

        tracing::info!("Generating answer with model: {}", model);

        let body = self
            .retry_request(|| async move {
                let request = ChatRequest {
                    model,
                    messages,
                    stream: false,
                    options: ChatOptions { temperature },
                };

                let response = self
                    .client
                    .post(url)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| Error::llm(format!("Chat request failed: {}", e)))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::llm(format!("Chat failed: HTTP {} - {}", status, body)));
                }

                response
                    .json::<ChatResponse>()
                    .await
                    .map_err(|e| Error::llm(format!("Failed to parse chat response: {}", e)))
            })
            .await?;

        Ok(chat_into_response(body, model, start.elapsed().as_millis() as u64))
    }
}

fn chat_into_response(body: ChatResponse, requested_model: &str, elapsed_ms: u64) -> Response {
    let model = body.model.unwrap_or_else(|| requested_model.to_string());
    Response::new(body.message.content, model)
        .with_tokens(body.prompt_eval_count, body.eval_count)
        .with_provider(PROVIDER_NAME)
        .with_processing_time(elapsed_ms)
}
