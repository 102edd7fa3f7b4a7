//! Query pipeline: validate, embed, retrieve, assemble context, generate

use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::config::QueryConfig;
use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::providers::{
    publish_best_effort, EmbeddingProvider, EventPublisher, LlmProvider, PipelineEvent,
    VectorRetriever,
};
use crate::types::{Query, RagResponse};

/// Answers queries from retrieved passages
pub struct QueryPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    retriever: Arc<dyn VectorRetriever>,
    llm: Arc<dyn LlmProvider>,
    events: Option<Arc<dyn EventPublisher>>,
    config: QueryConfig,
}

impl QueryPipeline {
    /// Create a pipeline over the given collaborators
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        retriever: Arc<dyn VectorRetriever>,
        llm: Arc<dyn LlmProvider>,
        config: QueryConfig,
    ) -> Self {
        Self {
            embedder,
            retriever,
            llm,
            events: None,
            config,
        }
    }

    /// Publish milestone events through `events`
    pub fn with_events(mut self, events: Arc<dyn EventPublisher>) -> Self {
        self.events = Some(events);
        self
    }

    /// Answer a query
    ///
    /// A blank query fails with [`Error::InvalidQuery`] before any
    /// collaborator is called. An empty retrieval still reaches the LLM.
    /// `sources` is exactly the retriever's output, in its order.
    pub async fn process(&self, query: &Query) -> Result<RagResponse> {
        if query.is_blank() {
            return Err(Error::invalid_query("Query content cannot be empty"));
        }

        let correlation_id = Uuid::new_v4();
        let start = Instant::now();

        tracing::info!("[{}] Processing query ({} chars)", correlation_id, query.content().len());

        publish_best_effort(
            self.events.as_ref(),
            PipelineEvent::QueryRequested {
                correlation_id,
                query: query.content().to_string(),
                occurred_at: Utc::now(),
            },
        )
        .await;

        let embedding = self.embedder.embed(query.content()).await?;

        let sources = self
            .retriever
            .search(&embedding.vector, self.config.top_k)
            .await?;

        if sources.is_empty() {
            tracing::warn!("[{}] No documents retrieved, answering without context", correlation_id);
        } else {
            tracing::debug!(
                "[{}] Retrieved {} documents via {}",
                correlation_id,
                sources.len(),
                self.retriever.name()
            );
        }

        let messages = PromptBuilder::build_messages(&self.config.system_prompt, query.content(), &sources);

        let response = self.llm.generate(&messages).await?;

        let rag_response = RagResponse::new(response, sources);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            "[{}] Answered with {} sources in {}ms (model: {})",
            correlation_id,
            rag_response.sources.len(),
            elapsed_ms,
            rag_response.response.model_used
        );

        publish_best_effort(
            self.events.as_ref(),
            PipelineEvent::QueryCompleted {
                correlation_id,
                document_ids: rag_response.document_ids(),
                elapsed_ms,
                occurred_at: Utc::now(),
            },
        )
        .await;

        Ok(rag_response)
    }
}
