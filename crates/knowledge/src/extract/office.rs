//! Word-processor (docx) and OpenDocument text (odt) readers.
//!
//! Both formats are zip archives holding an XML body; paragraphs are joined
//! with newlines.

use super::{DocumentFormat, FormatReader};
use localrag_core::{AppError, AppResult};
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read one entry of a zip archive as UTF-8.
fn read_archive_entry(path: &Path, entry_name: &str) -> AppResult<String> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| AppError::Extraction(format!("Not a zip archive {:?}: {}", path, e)))?;

    let mut entry = archive.by_name(entry_name).map_err(|e| {
        AppError::Extraction(format!("Missing {} in {:?}: {}", entry_name, path, e))
    })?;

    let mut xml = String::new();
    entry.read_to_string(&mut xml)?;
    Ok(xml)
}

fn malformed(e: quick_xml::Error) -> AppError {
    AppError::Extraction(format!("Malformed document XML: {}", e))
}

/// Character data with entities resolved; undecodable entities are kept raw.
fn decode_text(text: &BytesText<'_>) -> String {
    match text.unescape() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => String::from_utf8_lossy(text).into_owned(),
    }
}

#[derive(Default)]
struct Paragraph {
    text: String,
    pending_space: bool,
}

/// Paragraph collector shared by both readers.
///
/// Paragraphs may nest (text boxes, notes); inner paragraphs are emitted
/// before the one containing them.
#[derive(Default)]
struct Paragraphs {
    open: Vec<Paragraph>,
    done: Vec<String>,
}

impl Paragraphs {
    fn open(&mut self) {
        self.open.push(Paragraph::default());
    }

    fn close(&mut self) {
        if let Some(paragraph) = self.open.pop() {
            self.done.push(paragraph.text);
        }
    }

    fn empty(&mut self) {
        self.done.push(String::new());
    }

    fn current(&mut self) -> Option<&mut Paragraph> {
        let current = self.open.last_mut()?;
        if std::mem::take(&mut current.pending_space) {
            current.text.push(' ');
        }
        Some(current)
    }

    fn push_str(&mut self, text: &str) {
        if let Some(current) = self.current() {
            current.text.push_str(text);
        }
    }

    fn push(&mut self, c: char) {
        if let Some(current) = self.current() {
            current.text.push(c);
        }
    }

    /// Append character data under the ODF whitespace rule: any whitespace
    /// run becomes one space, dropped at the start of a paragraph, after
    /// other whitespace and at the end of a paragraph.
    fn push_collapsed(&mut self, text: &str) {
        let Some(current) = self.open.last_mut() else {
            return;
        };

        for c in text.chars() {
            if c.is_whitespace() {
                if !current.text.is_empty() && !current.text.ends_with(char::is_whitespace) {
                    current.pending_space = true;
                }
            } else {
                if std::mem::take(&mut current.pending_space) {
                    current.text.push(' ');
                }
                current.text.push(c);
            }
        }
    }

    fn finish(mut self) -> String {
        while !self.open.is_empty() {
            self.close();
        }
        self.done.join("\n")
    }
}

#[derive(Default)]
struct DocxState {
    paragraphs: Paragraphs,
    in_text: bool,
    in_tab_stops: bool,
}

impl DocxState {
    fn start(&mut self, element: &BytesStart<'_>, empty: bool) {
        match element.name().as_ref() {
            b"w:p" if empty => self.paragraphs.empty(),
            b"w:p" => self.paragraphs.open(),
            b"w:t" => self.in_text = !empty,
            b"w:tabs" => self.in_tab_stops = !empty,
            // w:tab inside w:tabs is a tab stop definition, not content
            b"w:tab" if !self.in_tab_stops => self.paragraphs.push('\t'),
            b"w:br" | b"w:cr" => self.paragraphs.push('\n'),
            _ => {}
        }
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            b"w:p" => self.paragraphs.close(),
            b"w:t" => self.in_text = false,
            b"w:tabs" => self.in_tab_stops = false,
            _ => {}
        }
    }
}

/// Paragraph text of a `word/document.xml` body.
pub(crate) fn docx_paragraphs(xml: &str) -> AppResult<String> {
    let mut reader = Reader::from_str(xml);
    let mut state = DocxState::default();

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => state.start(&e, false),
            Event::Empty(e) => state.start(&e, true),
            Event::End(e) => state.end(e.name().as_ref()),
            Event::Text(t) if state.in_text => state.paragraphs.push_str(&decode_text(&t)),
            Event::CData(c) if state.in_text => {
                state.paragraphs.push_str(&String::from_utf8_lossy(&c))
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(state.paragraphs.finish())
}

/// Count of a `text:s` element, 1 when absent or invalid.
fn space_count(element: &BytesStart<'_>) -> usize {
    element
        .try_get_attribute("text:c")
        .ok()
        .flatten()
        .and_then(|attr| {
            std::str::from_utf8(&attr.value)
                .ok()
                .and_then(|value| value.trim().parse().ok())
        })
        .unwrap_or(1)
}

fn odt_start(paragraphs: &mut Paragraphs, element: &BytesStart<'_>, empty: bool) {
    match element.name().as_ref() {
        b"text:p" | b"text:h" if empty => paragraphs.empty(),
        b"text:p" | b"text:h" => paragraphs.open(),
        b"text:s" => paragraphs.push_str(&" ".repeat(space_count(element))),
        b"text:tab" => paragraphs.push('\t'),
        b"text:line-break" => paragraphs.push('\n'),
        _ => {}
    }
}

/// Paragraph and heading text of an ODF `content.xml` body.
pub(crate) fn odt_paragraphs(xml: &str) -> AppResult<String> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Paragraphs::default();

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => odt_start(&mut paragraphs, &e, false),
            Event::Empty(e) => odt_start(&mut paragraphs, &e, true),
            Event::End(e) => {
                if matches!(e.name().as_ref(), b"text:p" | b"text:h") {
                    paragraphs.close();
                }
            }
            Event::Text(t) => paragraphs.push_collapsed(&decode_text(&t)),
            Event::CData(c) => paragraphs.push_collapsed(&String::from_utf8_lossy(&c)),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.finish())
}

/// Reads `.docx` documents.
#[derive(Debug, Default)]
pub struct WordProcessorReader;

impl FormatReader for WordProcessorReader {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::WordProcessor
    }

    fn name(&self) -> &'static str {
        "docx"
    }

    fn read(&self, path: &Path) -> AppResult<String> {
        let xml = read_archive_entry(path, "word/document.xml")?;
        docx_paragraphs(&xml)
    }
}

/// Reads `.odt` documents.
#[derive(Debug, Default)]
pub struct OpenDocumentReader;

impl FormatReader for OpenDocumentReader {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::OpenDocumentText
    }

    fn name(&self) -> &'static str {
        "odt"
    }

    fn read(&self, path: &Path) -> AppResult<String> {
        let xml = read_archive_entry(path, "content.xml")?;
        odt_paragraphs(&xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_archive(path: &Path, entry: &str, body: &str) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file(entry, zip::write::FileOptions::default())
            .unwrap();
        zip.write_all(body.as_bytes()).unwrap();
        zip.finish().unwrap();
    }

    const DOCX_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p>
      <w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>
      <w:r><w:t>Quarterly</w:t></w:r>
      <w:r><w:t xml:space="preserve"> report &amp; plan</w:t></w:r>
    </w:p>
    <w:p/>
    <w:p><w:r><w:t>Name</w:t><w:tab/><w:t>Value</w:t><w:br/><w:t>next</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    #[test]
    fn test_docx_paragraphs() {
        assert_eq!(
            docx_paragraphs(DOCX_BODY).unwrap(),
            "Quarterly report & plan\n\nName\tValue\nnext"
        );
    }

    #[test]
    fn test_docx_reader() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("report.docx");
        write_archive(&path, "word/document.xml", DOCX_BODY);

        let text = WordProcessorReader.read(&path).unwrap();
        assert!(text.starts_with("Quarterly report & plan"));
    }

    #[test]
    fn test_corrupt_docx_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.docx");
        std::fs::write(&path, b"PK\x03\x04 definitely not a zip").unwrap();

        assert!(WordProcessorReader.read(&path).is_err());
    }

    #[test]
    fn test_docx_without_body_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("other.docx");
        write_archive(&path, "readme.txt", "hello");

        assert!(WordProcessorReader.read(&path).is_err());
    }

    #[test]
    fn test_odt_paragraphs() {
        let xml = r#"<office:document-content>
<office:body><office:text>
<text:h text:outline-level="1">Minutes</text:h>
<text:p>Attendees:<text:s text:c="2"/>Ana<text:tab/>Bo</text:p>
<text:p><text:span text:style-name="T1">bold</text:span> move<text:line-break/>end</text:p>
<text:p/>
</office:text></office:body></office:document-content>"#;

        assert_eq!(
            odt_paragraphs(xml).unwrap(),
            "Minutes\nAttendees:  Ana\tBo\nbold move\nend\n"
        );
    }

    #[test]
    fn test_odt_whitespace_collapses() {
        let xml = "<text:p>\n    <text:span>one</text:span>\n    <text:span>two</text:span>\n  </text:p>";
        assert_eq!(odt_paragraphs(xml).unwrap(), "one two");

        let xml = "<text:p>  spaced \t\n out <text:s text:c=\"3\"/>kept</text:p>";
        assert_eq!(odt_paragraphs(xml).unwrap(), "spaced out    kept");
    }

    #[test]
    fn test_unknown_entity_kept_raw() {
        let xml = "<w:p><w:r><w:t>caf&eacute; menu</w:t></w:r></w:p>";
        assert_eq!(docx_paragraphs(xml).unwrap(), "caf&eacute; menu");
    }

    #[test]
    fn test_mismatched_tags_are_error() {
        assert!(docx_paragraphs("<w:p><w:t>open</w:p>").is_err());
    }

    #[test]
    fn test_odt_reader() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.odt");
        write_archive(
            &path,
            "content.xml",
            "<office:text><text:p>hello odt</text:p></office:text>",
        );

        assert_eq!(OpenDocumentReader.read(&path).unwrap(), "hello odt");
    }
}
