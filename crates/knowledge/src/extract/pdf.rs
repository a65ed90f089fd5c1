//! PDF text extraction.
//!
//! `pdf-extract` gives the better text layout but is strict about font
//! encodings and may panic on unusual files; `lopdf` page extraction is the
//! fallback.

use super::{DocumentFormat, FormatReader};
use localrag_core::{AppError, AppResult};
use lopdf::Document;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

/// Reads `.pdf` documents.
#[derive(Debug, Default)]
pub struct PdfReader;

impl PdfReader {
    fn extract_primary(path: &Path) -> Option<String> {
        match panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text(path))) {
            Ok(Ok(text)) if !text.trim().is_empty() => Some(text),
            Ok(Ok(_)) => {
                tracing::debug!("pdf-extract found no text in {:?}", path);
                None
            }
            Ok(Err(e)) => {
                tracing::debug!("pdf-extract failed on {:?}: {}", path, e);
                None
            }
            Err(_) => {
                tracing::warn!("pdf-extract panicked on {:?}", path);
                None
            }
        }
    }

    fn extract_fallback(path: &Path) -> AppResult<String> {
        let document = Document::load(path)
            .map_err(|e| AppError::Extraction(format!("Failed to load PDF {:?}: {}", path, e)))?;

        let pages: Vec<String> = document
            .get_pages()
            .keys()
            .map(|&page_number| match document.extract_text(&[page_number]) {
                Ok(text) => text,
                Err(e) => {
                    tracing::debug!("No text on page {} of {:?}: {}", page_number, path, e);
                    String::new()
                }
            })
            .collect();

        Ok(pages.join("\n"))
    }
}

impl FormatReader for PdfReader {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pdf
    }

    fn name(&self) -> &'static str {
        "pdf"
    }

    fn read(&self, path: &Path) -> AppResult<String> {
        if let Some(text) = Self::extract_primary(path) {
            return Ok(text);
        }

        tracing::debug!("Falling back to lopdf for {:?}", path);
        Self::extract_fallback(path)
    }
}
