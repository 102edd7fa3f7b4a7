//! Error types for the RAG pipelines

use thiserror::Error;

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// RAG pipeline errors
///
/// Partial storage is deliberately absent: a run where only some chunks were
/// stored is reported through [`crate::types::StoreDocumentResult`], not here.
#[derive(Debug, Error)]
pub enum Error {
    /// Query rejected before any collaborator was called
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Text extraction failed
    #[error("Failed to extract '{filename}': {message}")]
    Extraction { filename: String, message: String },

    /// Unsupported document type
    #[error("Unsupported document type: {0}")]
    UnsupportedDocumentType(String),

    /// Chunking error
    #[error("Chunking failed: {0}")]
    Chunking(String),

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Vector store error
    #[error("Vector store error: {0}")]
    VectorStore(String),

    /// Vector length does not match the configured dimensionality
    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Vector search error
    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    /// LLM error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Event publication error
    #[error("Event bus error: {0}")]
    EventBus(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// TOML configuration parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid query error
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery(message.into())
    }

    /// Create an extraction error
    pub fn extraction(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create a chunking error
    pub fn chunking(message: impl Into<String>) -> Self {
        Self::Chunking(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a vector store error
    pub fn vector_store(message: impl Into<String>) -> Self {
        Self::VectorStore(message.into())
    }

    /// Create a retrieval error
    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::Retrieval(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an event bus error
    pub fn event_bus(message: impl Into<String>) -> Self {
        Self::EventBus(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// True for errors caused by the caller's input rather than a collaborator
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidQuery(_))
    }

    /// True for transport-level collaborator failures a caller may choose to retry
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Embedding(_)
            | Self::VectorStore(_)
            | Self::Retrieval(_)
            | Self::Llm(_)
            | Self::Io(_) => true,
            Self::Http(err) => err.is_timeout() || err.is_connect(),
            _ => false,
        }
    }
}
