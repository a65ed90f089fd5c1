//! Knowledge system type definitions.

use crate::extract::DocumentFormat;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// One indexed file: identity, extracted text and embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// File path as produced by the directory walk
    pub identity: String,

    /// Full extracted text (never empty)
    pub text: String,

    /// Embedding vector of the index dimensionality
    pub embedding: Vec<f32>,

    /// Detected document format
    pub format: DocumentFormat,

    /// File size on disk in bytes
    pub size_bytes: u64,

    /// When this record was built
    pub indexed_at: DateTime<Utc>,
}

/// A retrieval result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    /// Document identity
    pub identity: String,

    /// Document text
    pub text: String,

    /// Cosine similarity to the query, in (0, 1]
    pub score: f32,
}

/// Why a file under the data directory was not indexed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// Path matched an exclude pattern
    Excluded,

    /// File exceeds the configured maximum size
    TooLarge { size: u64, limit: u64 },

    /// Size or walk metadata could not be read
    Metadata(String),

    /// Extraction produced no text
    EmptyText,

    /// The embedding provider failed
    Embedding(String),

    /// The embedding had an unexpected length
    DimensionMismatch { expected: usize, actual: usize },
}

impl SkipReason {
    /// Short reason label used for grouping.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Excluded => "excluded",
            Self::TooLarge { .. } => "too_large",
            Self::Metadata(_) => "metadata",
            Self::EmptyText => "empty_text",
            Self::Embedding(_) => "embedding",
            Self::DimensionMismatch { .. } => "dimension_mismatch",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excluded => write!(f, "excluded by pattern"),
            Self::TooLarge { size, limit } => {
                write!(f, "file too large ({} bytes, limit {})", size, limit)
            }
            Self::Metadata(msg) => write!(f, "metadata unavailable: {}", msg),
            Self::EmptyText => write!(f, "no extractable text"),
            Self::Embedding(msg) => write!(f, "embedding failed: {}", msg),
            Self::DimensionMismatch { expected, actual } => write!(
                f,
                "embedding has {} dimensions, expected {}",
                actual, expected
            ),
        }
    }
}

/// A supported file that was not indexed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Outcome of one index rebuild.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RebuildReport {
    /// Number of records in the new index
    pub indexed: usize,

    /// Supported files that were left out, with the reason
    pub skipped: Vec<SkippedFile>,

    /// Files ignored because their extension is not supported
    pub ignored_extensions: usize,

    /// Wall-clock duration of the rebuild
    #[serde(with = "duration_secs")]
    pub duration: Duration,
}

impl RebuildReport {
    /// Skipped files grouped by reason kind.
    pub fn skip_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for skipped in &self.skipped {
            *counts.entry(skipped.reason.kind()).or_insert(0) += 1;
        }
        counts
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(secs.max(0.0)))
    }
}
