//! Local document knowledge base.
//!
//! Extracts text from the files of a data directory, embeds each file as a
//! whole into an in-memory vector index and answers questions through a
//! generation provider with the best matching files as context.

pub mod config;
pub mod embeddings;
pub mod extract;
pub mod index;
pub mod rag;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use config::AssistantOptions;
pub use embeddings::{create_provider, EmbeddingProvider};
pub use extract::{DocumentFormat, FormatReader, ReaderRegistry, TextExtractor};
pub use index::{cosine_similarity, MemoryIndex};
pub use rag::{Answer, Assistant, CompletionOutcome};
pub use types::{DocumentRecord, RebuildReport, SearchHit, SkipReason, SkippedFile};
