//! Assistant options derived from the application configuration.

use localrag_core::config::{IndexSettings, RefreshPolicy};
use localrag_core::{AppConfig, AppResult};
use localrag_prompt::{load_template, PromptTemplate};
use std::path::PathBuf;
use std::time::Duration;

/// Default completions file name, relative to the data directory.
pub const DEFAULT_COMPLETIONS_FILE: &str = "completions.txt";

/// Everything the assistant needs besides its providers.
#[derive(Debug, Clone)]
pub struct AssistantOptions {
    /// Directory of documents to index
    pub data_dir: PathBuf,

    /// Instructions file (default: `<data_dir>/instructions.txt`)
    pub instructions_path: Option<PathBuf>,

    /// Default completions file name for `add_completion`
    pub completions_file: String,

    /// Walk and extraction settings
    pub index: IndexSettings,

    /// Default number of documents per query
    pub top_n: usize,

    /// When queries rebuild the index implicitly
    pub refresh: RefreshPolicy,

    /// Staleness bound for [`RefreshPolicy::Interval`]
    pub refresh_interval: Duration,

    /// Prompt layout
    pub template: PromptTemplate,
}

impl AssistantOptions {
    /// Options with defaults for `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            instructions_path: None,
            completions_file: DEFAULT_COMPLETIONS_FILE.to_string(),
            index: IndexSettings::default(),
            top_n: 3,
            refresh: RefreshPolicy::Always,
            refresh_interval: Duration::from_secs(300),
            template: PromptTemplate::default(),
        }
    }

    /// Options from a loaded configuration.
    ///
    /// Reads the prompt template override if `<data_dir>/.localrag/prompt.yaml`
    /// exists.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let template = load_template(&config.prompt_template_path())?;

        Ok(Self {
            data_dir: config.data_dir.clone(),
            instructions_path: config.instructions_file.clone(),
            completions_file: config.completions_file.clone(),
            index: config.index.clone(),
            top_n: config.retrieval.top_n,
            refresh: config.retrieval.refresh,
            refresh_interval: Duration::from_secs(config.retrieval.refresh_interval_secs),
            template,
        })
    }

    pub fn with_refresh(mut self, refresh: RefreshPolicy) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn with_index_settings(mut self, index: IndexSettings) -> Self {
        self.index = index;
        self
    }

    pub fn with_instructions_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.instructions_path = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_config() {
        let temp = TempDir::new().unwrap();
        let mut config = AppConfig {
            data_dir: temp.path().to_path_buf(),
            ..Default::default()
        };
        config.retrieval.top_n = 5;
        config.retrieval.refresh = RefreshPolicy::Manual;

        let options = AssistantOptions::from_config(&config).unwrap();
        assert_eq!(options.top_n, 5);
        assert_eq!(options.refresh, RefreshPolicy::Manual);
        assert_eq!(options.template, PromptTemplate::default());
        assert_eq!(options.completions_file, DEFAULT_COMPLETIONS_FILE);
    }

    #[test]
    fn test_template_override() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(".localrag")).unwrap();
        std::fs::write(
            temp.path().join(".localrag/prompt.yaml"),
            "id: short\ntemplate: \"Q: {{question}}\"\n",
        )
        .unwrap();

        let config = AppConfig {
            data_dir: temp.path().to_path_buf(),
            ..Default::default()
        };

        let options = AssistantOptions::from_config(&config).unwrap();
        assert_eq!(options.template.id, "short");
    }
}
