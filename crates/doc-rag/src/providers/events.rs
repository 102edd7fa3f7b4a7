//! Pipeline milestone events
//!
//! Both pipelines publish these best-effort: a failed publish is logged and
//! never fails the run.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::Result;
use crate::types::{DocumentType, StoreDocumentStatus};

/// Milestones emitted by the ingestion and query pipelines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// A query passed validation
    QueryRequested {
        correlation_id: Uuid,
        query: String,
        occurred_at: DateTime<Utc>,
    },
    /// A query was answered
    QueryCompleted {
        correlation_id: Uuid,
        document_ids: Vec<Uuid>,
        elapsed_ms: u64,
        occurred_at: DateTime<Utc>,
    },
    /// Ingestion of a document began
    DocumentIngestionStarted {
        correlation_id: Uuid,
        filename: String,
        document_type: DocumentType,
        occurred_at: DateTime<Utc>,
    },
    /// Ingestion of a document finished
    DocumentIngested {
        correlation_id: Uuid,
        filename: String,
        total_chunks: usize,
        ingested_chunks: usize,
        failed_chunks: usize,
        status: StoreDocumentStatus,
        elapsed_ms: u64,
        occurred_at: DateTime<Utc>,
    },
}

impl PipelineEvent {
    /// Correlation ID shared by the events of one pipeline run
    pub fn correlation_id(&self) -> Uuid {
        match self {
            Self::QueryRequested { correlation_id, .. }
            | Self::QueryCompleted { correlation_id, .. }
            | Self::DocumentIngestionStarted { correlation_id, .. }
            | Self::DocumentIngested { correlation_id, .. } => *correlation_id,
        }
    }

    /// Event name as serialized in `event_type`
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::QueryRequested { .. } => "query_requested",
            Self::QueryCompleted { .. } => "query_completed",
            Self::DocumentIngestionStarted { .. } => "document_ingestion_started",
            Self::DocumentIngested { .. } => "document_ingested",
        }
    }
}

/// Fire-and-forget event sink
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish one event
    async fn publish(&self, event: PipelineEvent) -> Result<()>;

    /// Get publisher name for logging
    fn name(&self) -> &str;
}

/// Publish through an optional publisher, logging instead of failing
pub async fn publish_best_effort(publisher: Option<&Arc<dyn EventPublisher>>, event: PipelineEvent) {
    let Some(publisher) = publisher else {
        return;
    };

    let event_type = event.event_type();
    if let Err(e) = publisher.publish(event).await {
        tracing::warn!(
            "Failed to publish {} via {}: {}",
            event_type,
            publisher.name(),
            e
        );
    }
}

/// In-process event bus backed by a tokio broadcast channel
pub struct BroadcastEventBus {
    sender: broadcast::Sender<PipelineEvent>,
}

impl BroadcastEventBus {
    /// Create a bus buffering up to `capacity` events per slow subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastEventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl EventPublisher for BroadcastEventBus {
    async fn publish(&self, event: PipelineEvent) -> Result<()> {
        // No receivers is fine: nobody is listening yet
        if self.sender.send(event).is_err() {
            tracing::trace!("Event dropped, no subscribers");
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "broadcast"
    }
}
