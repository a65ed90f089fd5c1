//! Jupyter notebooks.

use super::{DocumentFormat, FormatReader};
use localrag_core::{AppError, AppResult};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct Notebook {
    #[serde(default)]
    cells: Vec<Cell>,
}

#[derive(Debug, Deserialize)]
struct Cell {
    #[serde(default)]
    source: CellSource,
}

/// Cell source is either a list of lines or a single string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CellSource {
    Lines(Vec<String>),
    Text(String),
}

impl Default for CellSource {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl CellSource {
    fn into_text(self) -> String {
        match self {
            Self::Lines(lines) => lines.concat(),
            Self::Text(text) => text,
        }
    }
}

/// Concatenates cell sources, one cell per line group.
#[derive(Debug, Default)]
pub struct NotebookReader;

impl FormatReader for NotebookReader {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Notebook
    }

    fn name(&self) -> &'static str {
        "notebook"
    }

    fn read(&self, path: &Path) -> AppResult<String> {
        let contents = std::fs::read_to_string(path)?;
        let notebook: Notebook = serde_json::from_str(&contents)
            .map_err(|e| AppError::Extraction(format!("Invalid notebook {:?}: {}", path, e)))?;

        Ok(notebook
            .cells
            .into_iter()
            .map(|cell| cell.source.into_text())
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
