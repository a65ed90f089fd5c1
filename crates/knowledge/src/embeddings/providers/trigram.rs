//! Trigram embedding provider using hashed character trigrams.

use crate::embeddings::provider::EmbeddingProvider;
use localrag_core::AppResult;
use std::collections::BTreeMap;

/// Words too common to carry meaning.
const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "as", "are", "was", "were", "for", "to", "of",
    "in", "and", "or", "but", "with", "by", "from", "this", "that", "be", "have", "has", "had",
    "it", "its", "their", "they", "them",
];

/// Deterministic content-aware embedding of `text`.
///
/// Each word contributes its character trigrams and its whole-word hash to
/// the buckets of a `dimensions`-long vector, which is then normalised to
/// unit length. Text without indexable words maps to the zero vector.
pub fn trigram_embedding(text: &str, dimensions: usize) -> Vec<f32> {
    let mut embedding = vec![0.0f32; dimensions];
    if dimensions == 0 {
        return embedding;
    }

    let lower = text.to_lowercase();
    // Ordered so bucket sums are reproducible bit for bit
    let mut word_freq: BTreeMap<&str, u32> = BTreeMap::new();
    for word in lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 2 && !STOP_WORDS.contains(w))
    {
        *word_freq.entry(word).or_insert(0) += 1;
    }

    for (word, freq) in &word_freq {
        let chars: Vec<char> = word.chars().collect();
        for window in chars.windows(3) {
            let hash = window
                .iter()
                .fold(0u64, |acc, &c| acc.wrapping_mul(37).wrapping_add(c as u64));
            embedding[(hash % dimensions as u64) as usize] += (*freq as f32).sqrt();
        }

        let word_hash = word
            .bytes()
            .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        embedding[(word_hash % dimensions as u64) as usize] += *freq as f32;
    }

    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in &mut embedding {
            *v /= norm;
        }
    }

    embedding
}

/// Trigram-based embedding provider for local, offline operation.
///
/// Not semantically accurate like neural embedding models, but lexically
/// similar texts land close together, which is enough for small personal
/// corpora and needs no model server.
#[derive(Debug)]
pub struct TrigramProvider {
    dimensions: usize,
}

impl TrigramProvider {
    /// Create a new trigram provider with specified dimensions.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for TrigramProvider {
    fn provider_name(&self) -> &str {
        "trigram"
    }

    fn model_name(&self) -> &str {
        "trigram-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| trigram_embedding(text, self.dimensions))
            .collect())
    }
}
