//! User queries

use serde::{Deserialize, Serialize};

/// A user's natural-language question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Query {
    content: String,
}

impl Query {
    /// Create a query
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// The question text, exactly as given
    pub fn content(&self) -> &str {
        &self.content
    }

    /// True when the query has no content after trimming whitespace
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

impl From<&str> for Query {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}

impl From<String> for Query {
    fn from(content: String) -> Self {
        Self::new(content)
    }
}
