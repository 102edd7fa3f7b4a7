//! Configuration for the RAG pipelines

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Environment variable pointing at a TOML configuration file
pub const CONFIG_PATH_ENV: &str = "RAG_CONFIG";

/// Main RAG configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RagConfig {
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Ollama/LLM configuration
    pub llm: LlmConfig,
    /// Query pipeline configuration
    pub query: QueryConfig,
    /// Ingestion pipeline configuration
    pub ingestion: IngestionConfig,
}

impl RagConfig {
    /// Parse configuration from a TOML string; missing sections take defaults
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    /// Load from `RAG_CONFIG` (or defaults), then apply `RAG_*` overrides
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => {
                tracing::info!("Loading configuration from {}", path);
                Self::from_file(path)?
            }
            Err(_) => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `RAG_SYSTEM_PROMPT`, `RAG_LLM_BASE_URL` and `RAG_TOP_K` from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(prompt) = lookup("RAG_SYSTEM_PROMPT") {
            self.query.system_prompt = prompt;
        }
        if let Some(url) = lookup("RAG_LLM_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Some(top_k) = lookup("RAG_TOP_K") {
            self.query.top_k = top_k
                .trim()
                .parse()
                .map_err(|_| Error::config(format!("RAG_TOP_K must be a positive integer, got '{}'", top_k)))?;
        }
        Ok(())
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.embeddings.dimensions == 0 {
            return Err(Error::config("embeddings.dimensions must be greater than 0"));
        }
        if self.chunking.chunk_size == 0 {
            return Err(Error::config("chunking.chunk_size must be greater than 0"));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::config(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunking.chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.chunking.min_chunk_size > self.chunking.chunk_size {
            return Err(Error::config(format!(
                "chunking.min_chunk_size ({}) must not exceed chunking.chunk_size ({})",
                self.chunking.min_chunk_size, self.chunking.chunk_size
            )));
        }
        if self.query.top_k == 0 {
            return Err(Error::config("query.top_k must be greater than 0"));
        }
        if self.ingestion.parallel_embeddings == Some(0) {
            return Err(Error::config("ingestion.parallel_embeddings must be greater than 0"));
        }
        Ok(())
    }
}

/// Embedding configuration
///
/// The embedding model is chosen by the provider (`llm.embed_model` for
/// Ollama); unknown keys here are rejected so a stray `model` is not ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EmbeddingConfig {
    /// Embedding dimensions; the vector store rejects any other length
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimensions: 768,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between chunks in characters
    pub chunk_overlap: usize,
    /// Minimum chunk size (sentence chunker only)
    pub min_chunk_size: usize,
    /// Respect sentence boundaries
    pub respect_sentences: bool,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            min_chunk_size: 50,
            respect_sentences: true,
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            generate_model: "llama3.2:3b".to_string(),
            temperature: 0.3,
            timeout_secs: 120,
            max_retries: 2,
        }
    }
}

/// Query pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QueryConfig {
    /// System prompt sent ahead of the retrieved context
    pub system_prompt: String,
    /// Number of passages to retrieve
    pub top_k: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            system_prompt: "You are a helpful assistant. Answer the user's question using only \
                the documents provided as context. If the context does not contain the answer, \
                say that you don't know."
                .to_string(),
            top_k: 5,
        }
    }
}

/// What the ingestion pipeline does when embedding one chunk fails
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingFailurePolicy {
    /// Propagate the first failure and abort the run
    #[default]
    Abort,
    /// Log the failure and count the chunk as failed
    Record,
}

/// Ingestion pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IngestionConfig {
    /// Chunks embedded concurrently (default: CPU count, max 4)
    pub parallel_embeddings: Option<usize>,
    /// Per-chunk embedding failure handling
    pub embedding_failure: EmbeddingFailurePolicy,
}

impl IngestionConfig {
    /// Effective embedding concurrency
    pub fn parallel_embeddings(&self) -> usize {
        self.parallel_embeddings
            .unwrap_or_else(|| num_cpus::get().min(4))
            .max(1)
    }
}
