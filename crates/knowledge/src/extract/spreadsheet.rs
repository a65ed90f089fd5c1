//! Spreadsheet workbooks (xlsx, xlsm, xls, ods).

use super::{DocumentFormat, FormatReader};
use calamine::{open_workbook_auto, Data, Reader};
use localrag_core::{AppError, AppResult};
use std::path::Path;

/// Reads every sheet, one line per row, cells separated by tabs.
#[derive(Debug, Default)]
pub struct SpreadsheetReader;

fn format_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl FormatReader for SpreadsheetReader {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Spreadsheet
    }

    fn name(&self) -> &'static str {
        "spreadsheet"
    }

    fn read(&self, path: &Path) -> AppResult<String> {
        let mut workbook = open_workbook_auto(path)
            .map_err(|e| AppError::Extraction(format!("Failed to open workbook {:?}: {}", path, e)))?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names().to_vec() {
            let range = workbook.worksheet_range(&name).map_err(|e| {
                AppError::Extraction(format!("Failed to read sheet '{}' of {:?}: {}", name, path, e))
            })?;

            let rows: Vec<String> = range
                .rows()
                .map(|row| row.iter().map(format_cell).collect::<Vec<_>>().join("\t"))
                .collect();
            sheets.push(rows.join("\n"));
        }

        Ok(sheets.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="Sales" sheetId="1" r:id="rId1"/><sheet name="Notes" sheetId="2" r:id="rId2"/></sheets>
</workbook>"#;

    const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/>
</Relationships>"#;

    const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

    const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/worksheets/sheet2.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

    fn sheet(rows: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
            rows
        )
    }

    fn inline(cell: &str, text: &str) -> String {
        format!(r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#, cell, text)
    }

    /// Two-sheet workbook with inline strings, a number and a gap at B3.
    fn write_workbook(path: &Path) {
        let sales = sheet(&format!(
            r#"<row r="1">{}{}</row><row r="2">{}<c r="B2"><v>42</v></c></row><row r="3">{}{}</row>"#,
            inline("A1", "region"),
            inline("B1", "total"),
            inline("A2", "north"),
            inline("A3", "south"),
            inline("C3", "late"),
        ));
        let notes = sheet(&format!(r#"<row r="1">{}</row>"#, inline("A1", "draft")));

        let file = std::fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        for (name, body) in [
            ("[Content_Types].xml", CONTENT_TYPES.to_string()),
            ("_rels/.rels", ROOT_RELS.to_string()),
            ("xl/workbook.xml", WORKBOOK.to_string()),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
            ("xl/worksheets/sheet1.xml", sales),
            ("xl/worksheets/sheet2.xml", notes),
        ] {
            zip.start_file(name, zip::write::FileOptions::default())
                .unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_workbook_layout() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sales.xlsx");
        write_workbook(&path);

        let text = SpreadsheetReader.read(&path).unwrap();
        assert_eq!(
            text,
            "region\ttotal\t\nnorth\t42\t\nsouth\t\tlate\ndraft"
        );
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(&Data::Empty), "");
        assert_eq!(format_cell(&Data::String("a b".to_string())), "a b");
        assert_eq!(format_cell(&Data::Int(42)), "42");
        assert_eq!(format_cell(&Data::Bool(true)), "true");
    }

    #[test]
    fn test_corrupt_workbook_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.xlsx");
        std::fs::write(&path, b"not a workbook").unwrap();

        assert!(SpreadsheetReader.read(&path).is_err());
    }
}
