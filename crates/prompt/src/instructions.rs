//! Persistence of the user-editable instruction text.

use localrag_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Instruction text used when no instructions file can be read.
pub const DEFAULT_INSTRUCTIONS: &str = "Provide a helpful answer.";

/// Read the instructions file, falling back to [`DEFAULT_INSTRUCTIONS`].
pub fn load_instructions(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) => {
            tracing::debug!("Loaded instructions from {:?}", path);
            text
        }
        Err(e) => {
            if path.exists() {
                tracing::warn!("Failed to read instructions file {:?}: {}", path, e);
            }
            DEFAULT_INSTRUCTIONS.to_string()
        }
    }
}

/// Overwrite the instructions file with `text`.
pub fn save_instructions(path: &Path, text: &str) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(path, text).map_err(|e| {
        AppError::Other(format!("Failed to write instructions file {:?}: {}", path, e))
    })
}

/// Instruction text together with the file it is persisted to.
#[derive(Debug, Clone)]
pub struct Instructions {
    path: PathBuf,
    text: String,
}

impl Instructions {
    /// Load instructions from `path` (default text when unreadable).
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let text = load_instructions(&path);
        Self { path, text }
    }

    /// Current instruction text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the instruction text and persist it.
    ///
    /// The in-memory text is updated even when the write fails. Returns
    /// whether the text was persisted.
    pub fn set(&mut self, text: &str) -> bool {
        self.text = text.to_string();

        match save_instructions(&self.path, text) {
            Ok(()) => {
                tracing::info!("Saved instructions to {:?}", self.path);
                true
            }
            Err(e) => {
                tracing::error!("Could not persist instructions: {}", e);
                false
            }
        }
    }
}
