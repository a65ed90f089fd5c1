//! Embedding providers.
//!
//! A provider is constructed once by the caller and injected into the index
//! as `Arc<dyn EmbeddingProvider>`.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
pub use providers::{MockProvider, OllamaProvider, TrigramProvider};
