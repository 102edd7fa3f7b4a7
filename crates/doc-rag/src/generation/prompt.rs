//! Prompt assembly for RAG generation

use crate::types::{DocumentRetrieval, Message};

/// Leading line of the context message, present even with no passages
pub const CONTEXT_HEADER: &str = "Here is the context\n\n";

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the context block from retrieved passages, in retrieval order
    pub fn build_context(documents: &[DocumentRetrieval]) -> String {
        let passages = documents
            .iter()
            .enumerate()
            .map(|(i, doc)| format!("Document {}:\n{}", i + 1, doc.content))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!("{}{}", CONTEXT_HEADER, passages)
    }

    /// Build the message sequence: system prompt, context, then the question
    pub fn build_messages(
        system_prompt: &str,
        question: &str,
        documents: &[DocumentRetrieval],
    ) -> Vec<Message> {
        let context = Self::build_context(documents);

        tracing::debug!(
            "Built context with {} documents ({} chars)",
            documents.len(),
            context.len()
        );

        vec![
            Message::system(system_prompt),
            Message::system(context),
            Message::user(question),
        ]
    }
}
