//! Ingestion outcome accounting

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::Error;

/// Overall outcome of one ingestion run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreDocumentStatus {
    /// Every chunk was stored
    Success,
    /// Some chunks were stored, not all
    Partial,
    /// No chunk was stored
    Error,
}

impl StoreDocumentStatus {
    /// Derive the status from stored/failed counts
    pub fn from_counts(ingested_chunks: usize, failed_chunks: usize) -> Self {
        if failed_chunks == 0 {
            Self::Success
        } else if ingested_chunks > 0 {
            Self::Partial
        } else {
            Self::Error
        }
    }
}

impl fmt::Display for StoreDocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// Summary of one ingestion run
///
/// `ingested_chunks + failed_chunks == total_chunks` always holds, and
/// `status` is derived from the two counts. Fields are private so the
/// invariant cannot be broken after construction; deserialization goes
/// through the same check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawStoreDocumentResult")]
pub struct StoreDocumentResult {
    total_chunks: usize,
    ingested_chunks: usize,
    failed_chunks: usize,
    status: StoreDocumentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metrics: Option<HashMap<String, serde_json::Value>>,
}

/// Wire form of [`StoreDocumentResult`] before the counts are checked
#[derive(Deserialize)]
struct RawStoreDocumentResult {
    total_chunks: usize,
    ingested_chunks: usize,
    failed_chunks: usize,
    status: StoreDocumentStatus,
    #[serde(default)]
    metrics: Option<HashMap<String, serde_json::Value>>,
}

impl TryFrom<RawStoreDocumentResult> for StoreDocumentResult {
    type Error = Error;

    fn try_from(raw: RawStoreDocumentResult) -> Result<Self, Self::Error> {
        if raw.ingested_chunks + raw.failed_chunks != raw.total_chunks {
            return Err(Error::internal(format!(
                "ingested ({}) + failed ({}) chunks must equal total ({})",
                raw.ingested_chunks, raw.failed_chunks, raw.total_chunks
            )));
        }

        let result = Self::from_counts(raw.total_chunks, raw.ingested_chunks);
        if result.status != raw.status {
            return Err(Error::internal(format!(
                "status '{}' does not match counts, expected '{}'",
                raw.status, result.status
            )));
        }

        Ok(match raw.metrics {
            Some(metrics) => result.with_metrics(metrics),
            None => result,
        })
    }
}

impl StoreDocumentResult {
    /// Build a result from the total and the number of confirmed-stored chunks
    ///
    /// `ingested_chunks` is capped at `total_chunks`.
    pub fn from_counts(total_chunks: usize, ingested_chunks: usize) -> Self {
        let ingested_chunks = ingested_chunks.min(total_chunks);
        let failed_chunks = total_chunks - ingested_chunks;

        Self {
            total_chunks,
            ingested_chunks,
            failed_chunks,
            status: StoreDocumentStatus::from_counts(ingested_chunks, failed_chunks),
            metrics: None,
        }
    }

    /// Attach metrics
    pub fn with_metrics(mut self, metrics: HashMap<String, serde_json::Value>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn total_chunks(&self) -> usize {
        self.total_chunks
    }

    pub fn ingested_chunks(&self) -> usize {
        self.ingested_chunks
    }

    pub fn failed_chunks(&self) -> usize {
        self.failed_chunks
    }

    pub fn status(&self) -> StoreDocumentStatus {
        self.status
    }

    pub fn metrics(&self) -> Option<&HashMap<String, serde_json::Value>> {
        self.metrics.as_ref()
    }

    /// Fraction of chunks stored; 1.0 for an empty document
    pub fn success_rate(&self) -> f64 {
        if self.total_chunks == 0 {
            1.0
        } else {
            self.ingested_chunks as f64 / self.total_chunks as f64
        }
    }
}
