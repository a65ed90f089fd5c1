//! Text extraction from the supported document formats.
//!
//! Each format is a variant of [`DocumentFormat`]. Readers register in a
//! [`ReaderRegistry`] only when their backing library is compiled in, so the
//! dispatch table reflects exactly what this build can read.

mod notebook;
#[cfg(feature = "office")]
mod office;
#[cfg(feature = "pdf")]
mod pdf;
mod plain;
#[cfg(feature = "spreadsheet")]
mod spreadsheet;

pub use notebook::NotebookReader;
#[cfg(feature = "office")]
pub use office::{OpenDocumentReader, WordProcessorReader};
#[cfg(feature = "pdf")]
pub use pdf::PdfReader;
pub use plain::PlainTextReader;
#[cfg(feature = "spreadsheet")]
pub use spreadsheet::SpreadsheetReader;

use localrag_core::config::DEFAULT_MAX_FILE_SIZE;
use localrag_core::AppResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

/// Extensions read as UTF-8 text.
pub const PLAIN_TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "py", "json", "log", "csv", "tsv", "xml", "yaml", "yml", "html", "htm", "css",
    "js", "jsx", "ts", "tsx", "sh", "cmd", "ps1", "swift", "kt", "go", "rs", "lua", "pl", "r",
    "m", "vb", "cs", "asm", "dart", "php", "rb", "sql",
];

/// Recognised formats that have no reader.
pub const UNSUPPORTED_EXTENSIONS: &[&str] = &["doc", "rtf", "ppt", "pptx", "odp"];

/// Document format, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    PlainText,
    WordProcessor,
    Pdf,
    Spreadsheet,
    OpenDocumentText,
    Notebook,
    Unsupported,
}

impl DocumentFormat {
    /// Map an extension (without the dot, any case) to its format.
    ///
    /// Returns `None` for extensions outside the allow-list.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        let format = match ext.as_str() {
            "docx" => Self::WordProcessor,
            "pdf" => Self::Pdf,
            "xlsx" | "xlsm" | "xls" | "ods" => Self::Spreadsheet,
            "odt" => Self::OpenDocumentText,
            "ipynb" => Self::Notebook,
            e if UNSUPPORTED_EXTENSIONS.contains(&e) => Self::Unsupported,
            e if PLAIN_TEXT_EXTENSIONS.contains(&e) => Self::PlainText,
            _ => return None,
        };
        Some(format)
    }

    /// Format of a path, by its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Extensions belonging to this format.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::PlainText => PLAIN_TEXT_EXTENSIONS,
            Self::WordProcessor => &["docx"],
            Self::Pdf => &["pdf"],
            Self::Spreadsheet => &["xlsx", "xlsm", "xls", "ods"],
            Self::OpenDocumentText => &["odt"],
            Self::Notebook => &["ipynb"],
            Self::Unsupported => UNSUPPORTED_EXTENSIONS,
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlainText => "text",
            Self::WordProcessor => "docx",
            Self::Pdf => "pdf",
            Self::Spreadsheet => "spreadsheet",
            Self::OpenDocumentText => "odt",
            Self::Notebook => "notebook",
            Self::Unsupported => "unsupported",
        }
    }
}

/// A reader turning one document format into plain text.
pub trait FormatReader: Send + Sync {
    /// Format handled by this reader.
    fn format(&self) -> DocumentFormat;

    /// Reader name for logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Read the whole document as text.
    fn read(&self, path: &Path) -> AppResult<String>;
}

/// Format readers available in this build.
pub struct ReaderRegistry {
    readers: BTreeMap<DocumentFormat, Box<dyn FormatReader>>,
}

impl ReaderRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            readers: BTreeMap::new(),
        }
    }

    /// Registry with every reader compiled into this build.
    pub fn with_available_readers() -> Self {
        let mut registry = Self::empty();

        registry.register(Box::new(PlainTextReader));
        registry.register(Box::new(NotebookReader));

        #[cfg(feature = "office")]
        {
            registry.register(Box::new(WordProcessorReader));
            registry.register(Box::new(OpenDocumentReader));
        }

        #[cfg(feature = "pdf")]
        registry.register(Box::new(PdfReader));

        #[cfg(feature = "spreadsheet")]
        registry.register(Box::new(SpreadsheetReader));

        registry
    }

    /// Register a reader, replacing any reader for the same format.
    ///
    /// Readers claiming [`DocumentFormat::Unsupported`] are ignored.
    pub fn register(&mut self, reader: Box<dyn FormatReader>) {
        let format = reader.format();
        if format == DocumentFormat::Unsupported {
            tracing::warn!("Ignoring reader '{}' for unsupported formats", reader.name());
            return;
        }
        tracing::debug!("Registered reader '{}' for {}", reader.name(), format.as_str());
        self.readers.insert(format, reader);
    }

    /// Reader for a format, if one is registered.
    pub fn get(&self, format: DocumentFormat) -> Option<&dyn FormatReader> {
        self.readers.get(&format).map(|r| r.as_ref())
    }

    /// Formats that have a registered reader.
    pub fn supported_formats(&self) -> Vec<DocumentFormat> {
        self.readers.keys().copied().collect()
    }

    /// Extensions that have a registered reader, sorted.
    pub fn supported_extensions(&self) -> Vec<&'static str> {
        let mut extensions: Vec<&'static str> = self
            .readers
            .keys()
            .flat_map(|f| f.extensions().iter().copied())
            .collect();
        extensions.sort_unstable();
        extensions
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::with_available_readers()
    }
}

impl std::fmt::Debug for ReaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderRegistry")
            .field("formats", &self.supported_formats())
            .finish()
    }
}

/// Total text extraction: every failure becomes empty text.
#[derive(Debug)]
pub struct TextExtractor {
    registry: ReaderRegistry,
    max_file_size: u64,
}

impl TextExtractor {
    /// Extractor using every available reader.
    pub fn new(max_file_size: u64) -> Self {
        Self::with_registry(ReaderRegistry::with_available_readers(), max_file_size)
    }

    /// Extractor over a custom registry.
    pub fn with_registry(registry: ReaderRegistry, max_file_size: u64) -> Self {
        Self {
            registry,
            max_file_size,
        }
    }

    pub fn registry(&self) -> &ReaderRegistry {
        &self.registry
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Extract the text of `path`.
    ///
    /// Never fails: files over the size limit, unknown or unsupported
    /// formats, reader errors and reader panics all yield an empty string.
    pub fn extract(&self, path: &Path) -> String {
        match std::fs::metadata(path) {
            Ok(metadata) if metadata.len() > self.max_file_size => {
                tracing::debug!(
                    "Skipping {:?}: {} bytes exceeds limit of {}",
                    path,
                    metadata.len(),
                    self.max_file_size
                );
                return String::new();
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!("Cannot stat {:?}: {}", path, e);
                return String::new();
            }
        }

        let Some(format) = DocumentFormat::from_path(path) else {
            tracing::debug!("No format for {:?}", path);
            return String::new();
        };

        let Some(reader) = self.registry.get(format) else {
            tracing::warn!(
                "No reader available for {} files, skipping {:?}",
                format.as_str(),
                path
            );
            return String::new();
        };

        match panic::catch_unwind(AssertUnwindSafe(|| reader.read(path))) {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                tracing::error!("Error reading {:?} with {}: {}", path, reader.name(), e);
                String::new()
            }
            Err(_) => {
                tracing::error!("Reader {} panicked on {:?}", reader.name(), path);
                String::new()
            }
        }
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE)
    }
}
