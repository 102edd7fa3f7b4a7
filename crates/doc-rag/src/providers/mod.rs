//! Collaborator abstractions for extraction, chunking, embeddings, vector
//! storage, LLM completion and event publication
//!
//! Pipelines hold these as `Arc<dyn Trait>` so adapters can be swapped
//! without touching pipeline code.

pub mod chunking;
pub mod embedding;
pub mod events;
pub mod extraction;
pub mod llm;
pub mod local;
pub mod ollama;
pub mod vector_store;

pub use chunking::TextChunker;
pub use embedding::EmbeddingProvider;
pub use events::{publish_best_effort, BroadcastEventBus, EventPublisher, PipelineEvent};
pub use extraction::TextExtractor;
pub use llm::LlmProvider;
pub use local::LocalExtractor;
pub use ollama::{ollama_providers, OllamaEmbedder, OllamaLlm};
pub use vector_store::{VectorRetriever, VectorStoreProvider};
