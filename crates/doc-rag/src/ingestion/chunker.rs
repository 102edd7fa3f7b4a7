//! Text chunking with position tracking
//!
//! Positions and lengths are counted in characters, not bytes.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::providers::TextChunker;
use crate::types::{DocumentRetrieval, ExtractedContent, Metadata};

/// A chunk before it becomes a passage
#[derive(Debug, Clone, PartialEq)]
struct Span {
    content: String,
    start: usize,
    end: usize,
}

/// Turn spans into passages carrying the parent metadata plus chunk position
fn into_passages(spans: Vec<Span>, parent: &Metadata) -> Vec<DocumentRetrieval> {
    spans
        .into_iter()
        .enumerate()
        .map(|(index, span)| {
            let mut metadata = parent.clone();
            metadata.insert("chunk_index".to_string(), json!(index));
            metadata.insert("start_position".to_string(), json!(span.start));
            metadata.insert("end_position".to_string(), json!(span.end));
            metadata.insert("chunk_length".to_string(), json!(span.content.chars().count()));

            DocumentRetrieval::new(span.content).with_metadata(metadata)
        })
        .collect()
}

/// Byte offset of the `n`th character (or the end of the string)
fn byte_offset(text: &str, n: usize) -> usize {
    text.char_indices().nth(n).map(|(i, _)| i).unwrap_or(text.len())
}

/// Fixed-size character windows with overlap
///
/// Windows start every `chunk_size - overlap` characters; whitespace-only
/// windows are skipped.
pub struct FixedSizeChunker {
    chunk_size: usize,
    overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new chunker; `overlap` is clamped below `chunk_size`
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size - 1),
        }
    }

    fn split(&self, text: &str) -> Vec<Span> {
        let chars: Vec<char> = text.chars().collect();
        let step = self.chunk_size - self.overlap;

        (0..chars.len())
            .step_by(step)
            .filter_map(|start| {
                let end = (start + self.chunk_size).min(chars.len());
                let content: String = chars[start..end].iter().collect();
                (!content.trim().is_empty()).then_some(Span { content, start, end })
            })
            .collect()
    }
}

#[async_trait]
impl TextChunker for FixedSizeChunker {
    async fn chunk(&self, content: &ExtractedContent) -> Result<Vec<DocumentRetrieval>> {
        Ok(into_passages(self.split(&content.text), &content.metadata))
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Sentence-aware chunker with configurable size and overlap
pub struct SentenceChunker {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Overlap between chunks
    overlap: usize,
    /// Minimum chunk size before a chunk may be closed
    min_size: usize,
}

impl SentenceChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            overlap,
            min_size: 50,
        }
    }

    /// Set the minimum chunk size
    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.min_size = min_size;
        self
    }

    fn split(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();

        let mut current = String::new();
        let mut current_len = 0usize;
        let mut current_start = 0usize;
        let mut char_pos = 0usize;
        // Text added since the last flush, beyond the carried overlap
        let mut has_new_text = false;

        for sentence in text.split_sentence_bounds() {
            let sentence_len = sentence.chars().count();

            if has_new_text
                && current_len + sentence_len > self.chunk_size
                && current.trim().chars().count() >= self.min_size
            {
                spans.push(Span {
                    content: current.trim().to_string(),
                    start: current_start,
                    end: char_pos,
                });

                current = self.overlap_tail(&current);
                current_len = current.chars().count();
                current_start = char_pos - current_len;
                has_new_text = false;
            }

            current.push_str(sentence);
            current_len += sentence_len;
            char_pos += sentence_len;
            has_new_text |= !sentence.trim().is_empty();
        }

        if has_new_text {
            spans.push(Span {
                content: current.trim().to_string(),
                start: current_start,
                end: char_pos,
            });
        }

        spans
    }

    /// Tail of a closed chunk carried into the next one, snapped to a boundary
    fn overlap_tail(&self, text: &str) -> String {
        if self.overlap == 0 {
            return String::new();
        }

        let total = text.chars().count();
        if total <= self.overlap {
            return text.to_string();
        }

        let start = byte_offset(text, total - self.overlap);
        let tail = &text[start..];

        if text[..start].ends_with(char::is_whitespace) {
            return tail.to_string();
        }

        // Try to start at a sentence boundary
        if let Some(pos) = tail.find(". ").filter(|&p| !tail[p + 2..].trim().is_empty()) {
            return tail[pos + 2..].to_string();
        }

        // Fall back to word boundary
        if let Some(pos) = tail.find(' ') {
            return tail[pos + 1..].to_string();
        }

        tail.to_string()
    }
}

#[async_trait]
impl TextChunker for SentenceChunker {
    async fn chunk(&self, content: &ExtractedContent) -> Result<Vec<DocumentRetrieval>> {
        Ok(into_passages(self.split(&content.text), &content.metadata))
    }

    fn name(&self) -> &str {
        "sentence"
    }
}

/// Pick the chunker described by the configuration
pub fn chunker_from_config(config: &ChunkingConfig) -> Arc<dyn TextChunker> {
    if config.respect_sentences {
        Arc::new(
            SentenceChunker::new(config.chunk_size, config.chunk_overlap)
                .with_min_size(config.min_chunk_size),
        )
    } else {
        Arc::new(FixedSizeChunker::new(config.chunk_size, config.chunk_overlap))
    }
}
