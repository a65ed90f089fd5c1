//! Mock embedding provider for tests.

use crate::embeddings::provider::EmbeddingProvider;
use crate::embeddings::providers::trigram::trigram_embedding;
use localrag_core::{AppError, AppResult};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock provider for testing and development.
///
/// Embeds with the trigram algorithm unless a text contains a scripted
/// marker, in which case the scripted vector (or failure) is returned. Every
/// embedded text is counted.
#[derive(Debug)]
pub struct MockProvider {
    dimensions: usize,
    fixed: Vec<(String, Vec<f32>)>,
    failing: Vec<String>,
    calls: AtomicUsize,
}

impl MockProvider {
    /// Create a new mock provider with specified dimensions.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            fixed: Vec::new(),
            failing: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Return `vector` for any text containing `marker`.
    ///
    /// The vector is returned as given, so it may deliberately have the
    /// wrong length.
    pub fn with_vector(mut self, marker: &str, vector: Vec<f32>) -> Self {
        self.fixed.push((marker.to_string(), vector));
        self
    }

    /// Fail for any text containing `marker`.
    pub fn failing_on(mut self, marker: &str) -> Self {
        self.failing.push(marker.to_string());
        self
    }

    /// Number of texts embedded so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn embed_one(&self, text: &str) -> AppResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(marker) = self.failing.iter().find(|m| text.contains(m.as_str())) {
            return Err(AppError::Embedding(format!(
                "mock failure for text containing '{}'",
                marker
            )));
        }

        if let Some((_, vector)) = self.fixed.iter().find(|(m, _)| text.contains(m.as_str())) {
            return Ok(vector.clone());
        }

        Ok(trigram_embedding(text, self.dimensions))
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "trigram-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        texts.iter().map(|text| self.embed_one(text)).collect()
    }
}
