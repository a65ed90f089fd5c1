//! Plain and source text files.

use super::{DocumentFormat, FormatReader};
use localrag_core::{AppError, AppResult};
use std::path::Path;

/// Reads text files as strict UTF-8.
#[derive(Debug, Default)]
pub struct PlainTextReader;

impl FormatReader for PlainTextReader {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::PlainText
    }

    fn name(&self) -> &'static str {
        "plain-text"
    }

    fn read(&self, path: &Path) -> AppResult<String> {
        let bytes = std::fs::read(path)?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Extraction(format!("{:?} is not valid UTF-8: {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reads_utf8_verbatim() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.py");
        std::fs::write(&path, "print('olá')\n").unwrap();

        assert_eq!(PlainTextReader.read(&path).unwrap(), "print('olá')\n");
    }

    #[test]
    fn test_invalid_utf8_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        assert!(PlainTextReader.read(&path).is_err());
    }

    #[test]
    fn test_empty_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.txt");
        std::fs::write(&path, "").unwrap();

        assert_eq!(PlainTextReader.read(&path).unwrap(), "");
    }
}
