//! In-memory vector index over the files of a data directory.

use crate::embeddings::EmbeddingProvider;
use crate::extract::{DocumentFormat, TextExtractor};
use crate::types::{DocumentRecord, RebuildReport, SearchHit, SkipReason, SkippedFile};
use chrono::{DateTime, Utc};
use localrag_core::config::IndexSettings;
use localrag_core::AppResult;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use walkdir::WalkDir;

/// Calculate cosine similarity between two vectors.
///
/// Zero-norm or differently sized vectors score 0.0; the result is clamped to
/// [-1, 1] to absorb rounding.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    // f64 accumulation keeps large components from overflowing
    let dot_product: f64 = a.iter().zip(b).map(|(&x, &y)| x as f64 * y as f64).sum();
    let norm_a: f64 = a.iter().map(|&x| x as f64 * x as f64).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|&x| x as f64 * x as f64).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let score = dot_product / (norm_a * norm_b);
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(-1.0, 1.0) as f32
}

/// Whether a path relative to the walk root matches an exclude pattern.
///
/// A pattern matches a run of whole path components, so `.localrag` excludes
/// `.localrag/config.yaml` and `docs/.localrag` but not `notes.localrag-backup`.
pub fn is_excluded(relative: &Path, patterns: &[String]) -> bool {
    let components: Vec<&OsStr> = relative.components().map(|c| c.as_os_str()).collect();

    patterns.iter().any(|pattern| {
        let pattern: Vec<&OsStr> = Path::new(pattern)
            .components()
            .map(|c| c.as_os_str())
            .collect();
        !pattern.is_empty()
            && components
                .windows(pattern.len())
                .any(|window| window == pattern.as_slice())
    })
}

/// Flat mapping from document identity to text and embedding.
///
/// Rebuilt wholesale; searched by full linear scan.
#[derive(Debug)]
pub struct MemoryIndex {
    records: BTreeMap<String, DocumentRecord>,
    embedder: Arc<dyn EmbeddingProvider>,
    extractor: TextExtractor,
    settings: IndexSettings,
    last_rebuild: Option<DateTime<Utc>>,
}

impl MemoryIndex {
    /// Create an empty index.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, settings: IndexSettings) -> Self {
        let extractor = TextExtractor::new(settings.max_file_size);
        Self::with_extractor(embedder, extractor, settings)
    }

    /// Create an empty index with a custom extractor.
    ///
    /// The extractor's size limit applies to extraction; `settings.max_file_size`
    /// decides which files are reported as too large.
    pub fn with_extractor(
        embedder: Arc<dyn EmbeddingProvider>,
        extractor: TextExtractor,
        settings: IndexSettings,
    ) -> Self {
        Self {
            records: BTreeMap::new(),
            embedder,
            extractor,
            settings,
            last_rebuild: None,
        }
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record for an identity.
    pub fn get(&self, identity: &str) -> Option<&DocumentRecord> {
        self.records.get(identity)
    }

    /// All identities in ascending order.
    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Embedding dimensionality of every record.
    pub fn dimensions(&self) -> usize {
        self.embedder.dimensions()
    }

    /// When the last successful rebuild finished.
    pub fn last_rebuild(&self) -> Option<DateTime<Utc>> {
        self.last_rebuild
    }

    pub fn extractor(&self) -> &TextExtractor {
        &self.extractor
    }

    /// Replace the index with the files currently under `root`.
    ///
    /// Per-file failures are reported in the returned [`RebuildReport`] and
    /// never abort the rebuild. The previous contents stay in place until the
    /// walk has finished.
    pub async fn rebuild(&mut self, root: &Path) -> AppResult<RebuildReport> {
        let span = tracing::info_span!("rebuild", root = %root.display());
        self.rebuild_inner(root).instrument(span).await
    }

    async fn rebuild_inner(&mut self, root: &Path) -> AppResult<RebuildReport> {
        let start = Instant::now();
        let mut records = BTreeMap::new();
        let mut report = RebuildReport::default();

        if !root.is_dir() {
            // A vanished data directory holds no documents.
            tracing::warn!("Data directory {:?} is missing, index is now empty", root);
            self.records = records;
            self.last_rebuild = Some(Utc::now());
            report.duration = start.elapsed();
            return Ok(report);
        }

        let exclude = self.settings.exclude.clone();
        let mut pruned = Vec::new();
        let walker = WalkDir::new(root)
            .follow_links(self.settings.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
                if is_excluded(relative, &exclude) {
                    pruned.push(entry.path().to_path_buf());
                    false
                } else {
                    true
                }
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Walk error under {:?}: {}", root, e);
                    report.skipped.push(SkippedFile {
                        path: e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf()),
                        reason: SkipReason::Metadata(e.to_string()),
                    });
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Some(format) = DocumentFormat::from_path(path) else {
                report.ignored_extensions += 1;
                continue;
            };

            match self.index_file(path, format).await {
                Ok(record) => {
                    records.insert(record.identity.clone(), record);
                }
                Err(reason) => {
                    tracing::debug!("Skipped {:?}: {}", path, reason);
                    report.skipped.push(SkippedFile {
                        path: path.to_path_buf(),
                        reason,
                    });
                }
            }
        }

        report
            .skipped
            .extend(pruned.into_iter().map(|path| SkippedFile {
                path,
                reason: SkipReason::Excluded,
            }));

        self.records = records;
        self.last_rebuild = Some(Utc::now());

        report.indexed = self.records.len();
        report.duration = start.elapsed();

        tracing::info!(
            "Indexed {} files ({} skipped) in {:.2}s",
            report.indexed,
            report.skipped.len(),
            report.duration.as_secs_f64()
        );

        Ok(report)
    }

    /// Build the record for one file, or the reason it is left out.
    async fn index_file(
        &self,
        path: &Path,
        format: DocumentFormat,
    ) -> Result<DocumentRecord, SkipReason> {
        let path_str = path.to_string_lossy();
        let size = std::fs::metadata(path)
            .map_err(|e| SkipReason::Metadata(e.to_string()))?
            .len();
        if size > self.settings.max_file_size {
            return Err(SkipReason::TooLarge {
                size,
                limit: self.settings.max_file_size,
            });
        }

        let text = self.extractor.extract(path);
        if text.trim().is_empty() {
            return Err(SkipReason::EmptyText);
        }

        let embedding = self
            .embedder
            .embed(&text)
            .await
            .map_err(|e| SkipReason::Embedding(e.to_string()))?;

        let expected = self.embedder.dimensions();
        if embedding.len() != expected {
            return Err(SkipReason::DimensionMismatch {
                expected,
                actual: embedding.len(),
            });
        }

        Ok(DocumentRecord {
            identity: path_str.into_owned(),
            text,
            embedding,
            format,
            size_bytes: size,
            indexed_at: Utc::now(),
        })
    }

    /// The `top_n` documents most similar to `query`.
    ///
    /// Only positive scores are returned, sorted by score descending and then
    /// by identity ascending. Fails only if the query cannot be embedded.
    pub async fn search(&self, query: &str, top_n: usize) -> AppResult<Vec<SearchHit>> {
        if self.records.is_empty() || top_n == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await?;
        Ok(self.search_embedding(&query_embedding, top_n))
    }

    /// Full scan against a precomputed query embedding.
    pub fn search_embedding(&self, query_embedding: &[f32], top_n: usize) -> Vec<SearchHit> {
        let mut hits: Vec<SearchHit> = self
            .records
            .values()
            .filter_map(|record| {
                let score = cosine_similarity(query_embedding, &record.embedding);
                (score > 0.0).then(|| SearchHit {
                    identity: record.identity.clone(),
                    text: record.text.clone(),
                    score,
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.identity.cmp(&b.identity))
        });
        hits.truncate(top_n);

        tracing::debug!(
            "Retrieved {} documents (requested top-{})",
            hits.len(),
            top_n
        );

        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::MockProvider;
    use std::fs;
    use tempfile::TempDir;

    fn index_with(provider: MockProvider) -> MemoryIndex {
        MemoryIndex::new(Arc::new(provider), IndexSettings::default())
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0, 0.0]) - 1.0).abs() < 0.001);
        assert!(cosine_similarity(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]).abs() < 0.001);
        assert!((cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_zero_and_mismatch() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 1.0], &[0.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_cosine_bounds() {
        let vectors: [&[f32]; 5] = [
            &[1e-20, 3.0, -7.5],
            &[3.4e38, 1.0, 0.0],
            &[0.1, 0.1, 0.1],
            &[-2.0, 5.0, 9.0],
            &[1.0, 1.0, 1.0],
        ];
        for a in &vectors {
            for b in &vectors {
                let score = cosine_similarity(a, b);
                assert!((-1.0..=1.0).contains(&score), "{} out of range", score);
            }
        }
    }

    #[tokio::test]
    async fn test_rebuild_and_search() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("rust.md"), "rust ownership borrowing lifetimes").unwrap();
        fs::write(temp.path().join("pasta.txt"), "cooking pasta recipes tomato").unwrap();
        fs::write(temp.path().join("binary.exe"), "MZ").unwrap();

        let mut index = index_with(MockProvider::new(384));
        let report = index.rebuild(temp.path()).await.unwrap();

        assert_eq!(report.indexed, 2);
        assert_eq!(report.ignored_extensions, 1);
        assert!(report.skipped.is_empty());
        assert!(index.last_rebuild().is_some());

        let hits = index.search("rust borrowing", 1).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].identity.ends_with("rust.md"));
        assert!(hits[0].score > 0.0);
    }

    #[tokio::test]
    async fn test_rebuild_missing_root_empties_index() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("docs");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("a.txt"), "soon to vanish").unwrap();

        let mut index = index_with(MockProvider::new(8));
        index.rebuild(&root).await.unwrap();
        assert_eq!(index.len(), 1);

        fs::remove_dir_all(&root).unwrap();
        let report = index.rebuild(&root).await.unwrap();

        assert_eq!(report.indexed, 0);
        assert!(report.skipped.is_empty());
        assert!(index.is_empty());
        assert!(index.search("vanish", 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_on_empty_index_skips_provider() {
        let provider = Arc::new(MockProvider::new(8));
        let index = MemoryIndex::new(provider.clone(), IndexSettings::default());

        assert!(index.search("anything", 3).await.unwrap().is_empty());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_exclude_patterns() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".localrag")).unwrap();
        fs::write(temp.path().join(".localrag/config.yaml"), "retrieval: {}").unwrap();
        fs::write(temp.path().join("kept.txt"), "kept words here").unwrap();

        let mut index = index_with(MockProvider::new(16));
        let report = index.rebuild(temp.path()).await.unwrap();

        assert_eq!(report.indexed, 1);
        assert_eq!(report.skip_counts().get("excluded"), Some(&1));
        assert!(report.skipped[0].path.ends_with(".localrag"));
    }

    #[tokio::test]
    async fn test_exclude_matches_components_below_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("notes.localrag-backup");
        fs::create_dir_all(root.join("sub/.localrag")).unwrap();
        fs::write(root.join("a.txt"), "alpha words here").unwrap();
        fs::write(root.join("my.localrag.txt"), "beta words here").unwrap();
        fs::write(root.join("sub/.localrag/state.txt"), "hidden state").unwrap();

        let mut index = index_with(MockProvider::new(16));
        let report = index.rebuild(&root).await.unwrap();

        assert_eq!(report.indexed, 2);
        assert_eq!(report.skip_counts().get("excluded"), Some(&1));
        assert!(index.identities().all(|id| !id.contains("state.txt")));
    }

    #[test]
    fn test_is_excluded() {
        let patterns = vec![".localrag".to_string(), "build/cache".to_string(), String::new()];

        assert!(is_excluded(Path::new(".localrag/config.yaml"), &patterns));
        assert!(is_excluded(Path::new("docs/.localrag"), &patterns));
        assert!(is_excluded(Path::new("app/build/cache/x.txt"), &patterns));
        assert!(!is_excluded(Path::new("build/x.txt"), &patterns));
        assert!(!is_excluded(Path::new("notes.localrag-backup/a.txt"), &patterns));
        assert!(!is_excluded(Path::new(""), &patterns));
    }

    #[tokio::test]
    async fn test_identities_are_sorted() {
        let temp = TempDir::new().unwrap();
        for name in ["c.txt", "a.txt", "b.txt"] {
            fs::write(temp.path().join(name), format!("document named {}", name)).unwrap();
        }

        let mut index = index_with(MockProvider::new(32));
        index.rebuild(temp.path()).await.unwrap();

        let names: Vec<_> = index
            .identities()
            .filter_map(|id| Path::new(id).file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
        assert_eq!(index.len(), 3);
        assert_eq!(index.dimensions(), 32);
    }
}
