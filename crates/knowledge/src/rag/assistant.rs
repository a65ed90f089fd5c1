//! The assistant: index, instructions, prompt and generator behind one API.

use crate::config::AssistantOptions;
use crate::embeddings::EmbeddingProvider;
use crate::index::MemoryIndex;
use crate::rag::types::{Answer, CompletionOutcome};
use crate::types::{RebuildReport, SearchHit};
use chrono::Utc;
use localrag_core::config::RefreshPolicy;
use localrag_core::{AppError, AppResult};
use localrag_llm::Generator;
use localrag_prompt::{build_prompt, ContextDocument, Instructions, PromptTemplate};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

/// Local document assistant.
///
/// Operations that touch the index take `&mut self`, so a rebuild and a
/// search can never overlap on one instance.
#[derive(Debug)]
pub struct Assistant {
    data_dir: PathBuf,
    index: MemoryIndex,
    generator: Generator,
    instructions: Instructions,
    template: PromptTemplate,
    completions_file: String,
    top_n: usize,
    refresh: RefreshPolicy,
    refresh_interval: Duration,
}

impl Assistant {
    /// Load instructions and build the initial index over `options.data_dir`.
    pub async fn initialize(
        options: AssistantOptions,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Generator,
    ) -> AppResult<Self> {
        let data_dir = options.data_dir.canonicalize().map_err(|e| {
            AppError::Config(format!(
                "Data directory {:?} is not accessible: {}",
                options.data_dir, e
            ))
        })?;

        let instructions_path = options
            .instructions_path
            .unwrap_or_else(|| data_dir.join("instructions.txt"));
        let instructions = Instructions::load(instructions_path);

        tracing::info!(
            "Initializing assistant over {:?} (embedding: {}/{}, generation: {}/{})",
            data_dir,
            embedder.provider_name(),
            embedder.model_name(),
            generator.provider_name(),
            generator.model()
        );

        let mut assistant = Self {
            index: MemoryIndex::new(embedder, options.index),
            data_dir,
            generator,
            instructions,
            template: options.template,
            completions_file: options.completions_file,
            top_n: options.top_n,
            refresh: options.refresh,
            refresh_interval: options.refresh_interval,
        };

        assistant.update_index().await?;

        Ok(assistant)
    }

    /// Canonical data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn index(&self) -> &MemoryIndex {
        &self.index
    }

    /// Current instruction text.
    pub fn instructions(&self) -> &str {
        self.instructions.text()
    }

    /// Configured number of documents per query.
    pub fn default_top_n(&self) -> usize {
        self.top_n
    }

    /// Rebuild the index now, regardless of the refresh policy.
    pub async fn update_index(&mut self) -> AppResult<RebuildReport> {
        let root = self.data_dir.clone();
        self.index.rebuild(&root).await
    }

    /// Whether the refresh policy asks for a rebuild before answering.
    fn index_is_stale(&self) -> bool {
        match self.refresh {
            RefreshPolicy::Always => true,
            RefreshPolicy::Manual => false,
            RefreshPolicy::Interval => match self.index.last_rebuild() {
                None => true,
                Some(at) => Utc::now()
                    .signed_duration_since(at)
                    .to_std()
                    .map(|age| age >= self.refresh_interval)
                    .unwrap_or(false),
            },
        }
    }

    async fn refresh_if_stale(&mut self) -> AppResult<()> {
        if self.index_is_stale() {
            self.update_index().await?;
        }
        Ok(())
    }

    /// Retrieve the `top_n` documents most similar to `query`.
    pub async fn search(&mut self, query: &str, top_n: usize) -> AppResult<Vec<SearchHit>> {
        self.refresh_if_stale().await?;
        self.index.search(query, top_n).await
    }

    /// Answer `question` from the `top_n` most relevant documents.
    ///
    /// Generation failures come back as the generation error sentinel; only
    /// rebuild and query embedding failures are errors.
    pub async fn query(&mut self, question: &str, top_n: usize) -> AppResult<String> {
        Ok(self.query_detailed(question, top_n).await?.text)
    }

    /// Like [`Assistant::query`], also returning sources and the prompt.
    pub async fn query_detailed(&mut self, question: &str, top_n: usize) -> AppResult<Answer> {
        let span = tracing::info_span!("query", top_n);
        async {
            self.refresh_if_stale().await?;

            let sources = self.index.search(question, top_n).await?;
            let documents: Vec<ContextDocument<'_>> = sources
                .iter()
                .map(|hit| ContextDocument {
                    identity: &hit.identity,
                    content: &hit.text,
                })
                .collect();

            let prompt = build_prompt(
                &self.template,
                self.instructions.text(),
                &documents,
                question,
            )?;

            tracing::info!("Answering with {} context documents", prompt.document_count);

            let text = self.generator.generate(&prompt.text).await;

            Ok::<_, AppError>(Answer {
                text,
                sources,
                prompt: prompt.text,
            })
        }
        .instrument(span)
        .await
    }

    /// Append `text` and a newline to a file in the data directory, then
    /// rebuild so it becomes retrievable.
    ///
    /// `filename` defaults to the configured completions file. A failed write
    /// is logged and the rebuild still runs.
    pub async fn add_completion(&mut self, text: &str, filename: Option<&str>) -> CompletionOutcome {
        let filename = filename.unwrap_or(&self.completions_file);
        let path = self.data_dir.join(filename);

        let persisted = match append_line(&path, text) {
            Ok(()) => {
                tracing::info!("Appended completion to {:?}", path);
                true
            }
            Err(e) => {
                tracing::error!("Could not append completion to {:?}: {}", path, e);
                false
            }
        };

        let rebuild = match self.update_index().await {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::error!("Rebuild after completion failed: {}", e);
                None
            }
        };

        CompletionOutcome { persisted, rebuild }
    }

    /// Replace the instructions and persist them.
    ///
    /// The new text is used from now on even if it could not be saved.
    /// Returns whether it was saved.
    pub fn set_instructions(&mut self, text: &str) -> bool {
        self.instructions.set(text)
    }
}

fn append_line(path: &Path, text: &str) -> AppResult<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", text)?;
    Ok(())
}
