//! In-process provider implementations

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::ingestion::FileParser;
use crate::types::{ExtractedContent, InputDocument};

use super::extraction::TextExtractor;

/// Text extractor running [`FileParser`] on the blocking thread pool
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalExtractor;

impl LocalExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for LocalExtractor {
    async fn extract(&self, document: &InputDocument) -> Result<ExtractedContent> {
        // Parsing is CPU-bound, wrap in blocking task
        let document = document.clone();
        tokio::task::spawn_blocking(move || FileParser::extract(&document))
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))?
    }

    fn name(&self) -> &str {
        "local"
    }
}
