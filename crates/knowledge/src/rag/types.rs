//! Assistant response types.

use crate::types::{RebuildReport, SearchHit};
use serde::{Deserialize, Serialize};

/// A generated answer with the documents it was grounded on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// Generated text, or the generation error sentinel
    pub text: String,

    /// Retrieved documents in rank order
    pub sources: Vec<SearchHit>,

    /// The exact prompt sent to the generator
    #[serde(skip_serializing)]
    pub prompt: String,
}

/// Result of appending a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionOutcome {
    /// Whether the text reached the completions file
    pub persisted: bool,

    /// Rebuild that followed the write, if it could run
    pub rebuild: Option<RebuildReport>,
}
