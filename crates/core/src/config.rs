//! Configuration management for localrag.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Built-in defaults
//! - Config files (`<data_dir>/.localrag/config.yaml` or an explicit path)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources override earlier ones.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Name of the state directory kept inside the data directory.
pub const STATE_DIR: &str = ".localrag";

/// Default maximum size of a file considered for indexing (5 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Known embedding providers.
pub const EMBEDDING_PROVIDERS: [&str; 3] = ["trigram", "mock", "ollama"];

/// Known generation providers.
pub const GENERATION_PROVIDERS: [&str; 1] = ["ollama"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory of user documents that is indexed
    pub data_dir: PathBuf,

    /// Optional config file path
    #[serde(skip)]
    pub config_file: Option<PathBuf>,

    /// Instructions sidecar file (default: `<data_dir>/instructions.txt`)
    pub instructions_file: Option<PathBuf>,

    /// Completions file name, relative to the data directory
    pub completions_file: String,

    /// Directory walking and extraction settings
    pub index: IndexSettings,

    /// Query-time settings
    pub retrieval: RetrievalSettings,

    /// Embedding provider settings
    pub embedding: EmbeddingSettings,

    /// Generation provider settings
    pub generation: GenerationSettings,

    /// Logging settings
    pub logging: LoggingSettings,
}

/// Settings for the directory walk that feeds the vector index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndexSettings {
    /// Files larger than this many bytes are never extracted
    pub max_file_size: u64,

    /// Path substrings that are never indexed
    pub exclude: Vec<String>,

    /// Follow symbolic links while walking
    pub follow_links: bool,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            exclude: vec![STATE_DIR.to_string()],
            follow_links: false,
        }
    }
}

/// When the index is rebuilt implicitly before answering a query.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RefreshPolicy {
    /// Rebuild before every query
    #[default]
    Always,

    /// Rebuild when the last rebuild is older than `refresh_interval_secs`
    Interval,

    /// Only rebuild on explicit request
    Manual,
}

/// Query-time settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Number of documents placed in the prompt context
    pub top_n: usize,

    /// Index freshness policy
    pub refresh: RefreshPolicy,

    /// Staleness bound used by [`RefreshPolicy::Interval`]
    pub refresh_interval_secs: u64,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_n: 3,
            refresh: RefreshPolicy::Always,
            refresh_interval_secs: 300,
        }
    }
}

/// Embedding provider settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Provider name: "trigram", "mock", "ollama"
    pub provider: String,

    /// Model identifier (provider-specific)
    pub model: String,

    /// Embedding vector dimensions
    pub dimensions: usize,

    /// Provider endpoint (Ollama base URL)
    pub endpoint: Option<String>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "trigram".to_string(),
            model: "trigram-v1".to_string(),
            dimensions: 384,
            endpoint: None,
        }
    }
}

/// Generation provider settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationSettings {
    /// Provider name (currently "ollama")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Provider endpoint
    pub endpoint: Option<String>,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: Option<f32>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "mistral".to_string(),
            endpoint: None,
            max_tokens: 200,
            temperature: None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level or filter directive
    pub level: Option<String>,

    /// Colored console output
    pub color: Option<bool>,

    /// Optional log file
    pub file: Option<PathBuf>,

    /// Verbose mode (enables debug logging)
    #[serde(skip)]
    pub verbose: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    instructions_file: Option<PathBuf>,
    completions_file: Option<String>,
    index: Option<IndexSettings>,
    retrieval: Option<RetrievalSettings>,
    embedding: Option<EmbeddingSettings>,
    generation: Option<GenerationSettings>,
    logging: Option<LoggingSettings>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            instructions_file: None,
            completions_file: "completions.txt".to_string(),
            index: IndexSettings::default(),
            retrieval: RetrievalSettings::default(),
            embedding: EmbeddingSettings::default(),
            generation: GenerationSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML config file and environment variables.
    ///
    /// Environment variables:
    /// - `LOCALRAG_DATA_DIR`: Override data directory
    /// - `LOCALRAG_CONFIG`: Path to config file
    /// - `LOCALRAG_PROVIDER`: Generation provider
    /// - `LOCALRAG_MODEL`: Generation model identifier
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use localrag_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Data directory: {:?}", config.data_dir);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_from(None, None)
    }

    /// Like [`AppConfig::load`], with an explicit data directory and config
    /// file taking precedence over `LOCALRAG_DATA_DIR` and `LOCALRAG_CONFIG`.
    ///
    /// The data directory must be known first because the default config
    /// file lives inside it.
    pub fn load_from(data_dir: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(data_dir) = data_dir.or_else(|| std::env::var_os("LOCALRAG_DATA_DIR").map(PathBuf::from)) {
            config.data_dir = data_dir;
        }

        config.config_file =
            config_file.or_else(|| std::env::var_os("LOCALRAG_CONFIG").map(PathBuf::from));

        config = config.apply_config_file()?;
        config.apply_env();

        Ok(config)
    }

    /// Merge the config file (explicit or `<data_dir>/.localrag/config.yaml`) if it exists.
    ///
    /// An explicitly requested file that does not exist is an error.
    pub fn apply_config_file(self) -> AppResult<Self> {
        match self.config_file.clone() {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        path
                    )));
                }
                self.merge_yaml(&path)
            }
            None => {
                let path = self.state_dir().join("config.yaml");
                if path.exists() {
                    self.merge_yaml(&path)
                } else {
                    Ok(self)
                }
            }
        }
    }

    /// Environment variables override YAML config.
    fn apply_env(&mut self) {
        if let Ok(provider) = std::env::var("LOCALRAG_PROVIDER") {
            self.generation.provider = provider;
        }

        if let Ok(model) = std::env::var("LOCALRAG_MODEL") {
            self.generation.model = model;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            self.logging.color = Some(false);
        }
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        tracing::debug!("Merging config file {:?}", path);

        Ok(self.merged_with(config_file))
    }

    fn merged_with(&self, file: ConfigFile) -> Self {
        let mut result = self.clone();

        if let Some(data_dir) = file.data_dir {
            result.data_dir = data_dir;
        }
        if let Some(instructions_file) = file.instructions_file {
            result.instructions_file = Some(instructions_file);
        }
        if let Some(completions_file) = file.completions_file {
            result.completions_file = completions_file;
        }
        if let Some(index) = file.index {
            result.index = index;
        }
        if let Some(retrieval) = file.retrieval {
            result.retrieval = retrieval;
        }
        if let Some(embedding) = file.embedding {
            result.embedding = embedding;
        }
        if let Some(generation) = file.generation {
            result.generation = generation;
        }
        if let Some(logging) = file.logging {
            result.logging = logging;
        }

        result
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables and files.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        data_dir: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        log_file: Option<PathBuf>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(data_dir) = data_dir {
            self.data_dir = data_dir;
        }

        if let Some(provider) = provider {
            self.generation.provider = provider;
        }

        if let Some(model) = model {
            self.generation.model = model;
        }

        if let Some(log_level) = log_level {
            self.logging.level = Some(log_level);
        }

        if let Some(log_file) = log_file {
            self.logging.file = Some(log_file);
        }

        if verbose {
            self.logging.verbose = true;
            if self.logging.level.is_none() {
                self.logging.level = Some("debug".to_string());
            }
        }

        if no_color {
            self.logging.color = Some(false);
        }

        self
    }

    /// Get the path to the `.localrag` state directory.
    pub fn state_dir(&self) -> PathBuf {
        self.data_dir.join(STATE_DIR)
    }

    /// Resolved instructions file path.
    pub fn instructions_path(&self) -> PathBuf {
        self.instructions_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("instructions.txt"))
    }

    /// Optional prompt template override (`<data_dir>/.localrag/prompt.yaml`).
    pub fn prompt_template_path(&self) -> PathBuf {
        self.state_dir().join("prompt.yaml")
    }

    /// Whether console logging should be colored.
    pub fn no_color(&self) -> bool {
        matches!(self.logging.color, Some(false))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> AppResult<()> {
        if !self.data_dir.is_dir() {
            return Err(AppError::Config(format!(
                "Data directory does not exist: {:?}",
                self.data_dir
            )));
        }

        if !EMBEDDING_PROVIDERS.contains(&self.embedding.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding.provider,
                EMBEDDING_PROVIDERS.join(", ")
            )));
        }

        if !GENERATION_PROVIDERS.contains(&self.generation.provider.to_lowercase().as_str()) {
            return Err(AppError::Config(format!(
                "Unknown generation provider: {}. Supported: {}",
                self.generation.provider,
                GENERATION_PROVIDERS.join(", ")
            )));
        }

        if self.index.max_file_size == 0 {
            return Err(AppError::Config(
                "index.max_file_size must be greater than zero".to_string(),
            ));
        }

        if self.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "embedding.dimensions must be greater than zero".to_string(),
            ));
        }

        if self.retrieval.top_n == 0 {
            return Err(AppError::Config(
                "retrieval.top_n must be greater than zero".to_string(),
            ));
        }

        if self.completions_file.trim().is_empty() {
            return Err(AppError::Config(
                "completions_file cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &Path) -> AppConfig {
        AppConfig {
            data_dir: dir.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.embedding.provider, "trigram");
        assert_eq!(config.generation.provider, "ollama");
        assert_eq!(config.index.max_file_size, 5 * 1024 * 1024);
        assert_eq!(config.retrieval.top_n, 3);
        assert_eq!(config.retrieval.refresh, RefreshPolicy::Always);
        assert_eq!(config.completions_file, "completions.txt");
        assert!(!config.logging.verbose);
    }

    #[test]
    fn test_instructions_path_defaults_into_data_dir() {
        let temp = TempDir::new().unwrap();
        let config = config_in(temp.path());
        assert_eq!(
            config.instructions_path(),
            temp.path().join("instructions.txt")
        );
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            Some(PathBuf::from("/tmp/docs")),
            Some("ollama".to_string()),
            Some("llama3.2".to_string()),
            None,
            None,
            true,
            true,
        );

        assert_eq!(overridden.data_dir, PathBuf::from("/tmp/docs"));
        assert_eq!(overridden.generation.model, "llama3.2");
        assert!(overridden.logging.verbose);
        assert_eq!(overridden.logging.level, Some("debug".to_string()));
        assert!(overridden.no_color());
    }

    #[test]
    fn test_partial_yaml_merges_sections() {
        let temp = TempDir::new().unwrap();
        let state = temp.path().join(STATE_DIR);
        std::fs::create_dir_all(&state).unwrap();
        std::fs::write(
            state.join("config.yaml"),
            "index:\n  max_file_size: 1024\nretrieval:\n  refresh: manual\n",
        )
        .unwrap();

        let config = config_in(temp.path()).apply_config_file().unwrap();
        assert_eq!(config.index.max_file_size, 1024);
        assert_eq!(config.index.exclude, vec![STATE_DIR.to_string()]);
        assert_eq!(config.retrieval.refresh, RefreshPolicy::Manual);
        assert_eq!(config.retrieval.top_n, 3);
        assert_eq!(config.embedding, EmbeddingSettings::default());
    }

    #[test]
    fn test_missing_explicit_config_file_is_error() {
        let temp = TempDir::new().unwrap();
        let mut config = config_in(temp.path());
        config.config_file = Some(temp.path().join("nope.yaml"));
        assert!(config.apply_config_file().is_err());
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "index: [unclosed").unwrap();
        let mut config = config_in(temp.path());
        config.config_file = Some(path);
        assert!(config.apply_config_file().is_err());
    }

    #[test]
    fn test_validate_ok() {
        let temp = TempDir::new().unwrap();
        assert!(config_in(temp.path()).validate().is_ok());
    }

    #[test]
    fn test_validate_unknown_embedding_provider() {
        let temp = TempDir::new().unwrap();
        let mut config = config_in(temp.path());
        config.embedding.provider = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_limits() {
        let temp = TempDir::new().unwrap();
        let mut config = config_in(temp.path());
        config.index.max_file_size = 0;
        assert!(config.validate().is_err());

        let mut config = config_in(temp.path());
        config.retrieval.top_n = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_missing_data_dir() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp.path().join("missing"));
        assert!(config.validate().is_err());
    }
}
