//! Text extraction for uploaded documents
//!
//! Turns PDF, DOCX, plain text and XLSX uploads into normalized plain text.
//! Spreadsheets additionally yield a structured per-sheet payload.

mod detect;
mod docx;
mod normalize;
mod pdf;
mod spreadsheet;
mod text;

pub use detect::detect_mime_type;
pub use normalize::normalize_text;
pub use spreadsheet::SheetData;

use thiserror::Error;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_TEXT: &str = "text/plain";
pub const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Media types the extractor understands
pub const SUPPORTED_MIME_TYPES: &[&str] = &[MIME_PDF, MIME_DOCX, MIME_TEXT, MIME_XLSX];

/// Human readable list of supported formats
pub const SUPPORTED_FORMATS: &[&str] = &["PDF", "DOCX", "TXT", "XLSX"];

/// Failure classification for an extraction attempt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("Unsupported media type: {0}")]
    UnsupportedType(String),

    #[error("PDF contains no extractable text (it may be a scanned image)")]
    NoExtractableText,

    #[error("Document contains no text")]
    EmptyDocument,

    #[error("Spreadsheet contains no rows")]
    EmptySpreadsheet,

    #[error("Failed to read {format}: {reason}")]
    Unreadable {
        format: &'static str,
        reason: String,
    },
}

impl ExtractionError {
    pub(crate) fn unreadable(format: &'static str, reason: impl ToString) -> Self {
        Self::Unreadable {
            format,
            reason: reason.to_string(),
        }
    }
}

/// Successful extraction output
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedDocument {
    /// Normalized text (for spreadsheets: the per-sheet summary)
    pub text: String,
    /// Sheets of a tabular source
    pub structured_data: Option<Vec<SheetData>>,
}

impl ExtractedDocument {
    fn plain(text: String) -> Self {
        Self {
            text,
            structured_data: None,
        }
    }
}

pub fn is_supported(mime_type: &str) -> bool {
    SUPPORTED_MIME_TYPES.contains(&mime_type)
}

/// Extract text from `data` already identified as `mime_type`
///
/// The result never carries empty text: a source without any content is
/// reported as an error instead.
pub fn extract(data: &[u8], mime_type: &str) -> Result<ExtractedDocument, ExtractionError> {
    let extracted = match mime_type {
        MIME_PDF => ExtractedDocument::plain(pdf::extract_pdf(data)?),
        MIME_DOCX => ExtractedDocument::plain(docx::extract_docx(data)?),
        MIME_TEXT => ExtractedDocument::plain(text::extract_plain_text(data)),
        MIME_XLSX => {
            let workbook = spreadsheet::extract_spreadsheet(data)?;
            ExtractedDocument {
                text: workbook.summary,
                structured_data: Some(workbook.sheets),
            }
        }
        other => return Err(ExtractionError::UnsupportedType(other.to_string())),
    };

    if extracted.text.trim().is_empty() {
        return Err(ExtractionError::EmptyDocument);
    }

    tracing::debug!(
        mime_type = mime_type,
        chars = extracted.text.chars().count(),
        "Document text extracted"
    );

    Ok(extracted)
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! In-memory builders for office documents used across extraction tests

    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    pub fn zip_archive(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    pub fn docx(body: &str) -> Vec<u8> {
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        );
        zip_archive(&[
            ("[Content_Types].xml", "<Types/>"),
            ("word/document.xml", &document),
        ])
    }

    /// Minimal XLSX workbook; each sheet is `(name, sheetData inner XML)`
    pub fn xlsx(sheets: &[(&str, &str)]) -> Vec<u8> {
        let mut workbook_sheets = String::new();
        let mut rels = String::new();
        let mut overrides = String::new();
        let mut sheet_files = Vec::new();

        for (idx, (name, data)) in sheets.iter().enumerate() {
            let n = idx + 1;
            workbook_sheets.push_str(&format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                name, n, n
            ));
            rels.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                n, n
            ));
            overrides.push_str(&format!(
                r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                n
            ));
            sheet_files.push((
                format!("xl/worksheets/sheet{}.xml", n),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
                    data
                ),
            ));
        }

        let content_types = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>{}</Types>"#,
            overrides
        );
        let workbook = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{}</sheets></workbook>"#,
            workbook_sheets
        );
        let workbook_rels = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
            rels
        );
        // Style 1 is the built-in date format (numFmtId 14)
        let styles = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="14" applyNumberFormat="1"/></cellXfs></styleSheet>"#;
        let root_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

        let mut entries: Vec<(&str, &str)> = vec![
            ("[Content_Types].xml", &content_types),
            ("_rels/.rels", root_rels),
            ("xl/workbook.xml", &workbook),
            ("xl/_rels/workbook.xml.rels", &workbook_rels),
            ("xl/styles.xml", styles),
        ];
        for (path, xml) in &sheet_files {
            entries.push((path.as_str(), xml.as_str()));
        }
        zip_archive(&entries)
    }

    /// Single-page PDF; `text` of `None` produces a page without a text layer
    pub fn pdf(text: Option<&str>) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document, Object, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let operations = match text {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
            // Only a filled rectangle, like a scanned page without OCR
            None => vec![
                Operation::new("re", vec![0.into(), 0.into(), 100.into(), 100.into()]),
                Operation::new("f", vec![]),
            ],
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_rejects_unsupported_type() {
        let result = extract(b"\x89PNG\r\n", "image/png");
        assert_eq!(
            result,
            Err(ExtractionError::UnsupportedType("image/png".to_string()))
        );
    }

    #[test]
    fn test_extract_plain_text() {
        let extracted = extract(b"Target NPS Q3: 80\n", MIME_TEXT).unwrap();
        assert_eq!(extracted.text, "Target NPS Q3: 80");
        assert!(extracted.structured_data.is_none());
    }

    #[test]
    fn test_extract_whitespace_only_text_is_an_error() {
        assert_eq!(
            extract(b"   \n\n\t\n", MIME_TEXT),
            Err(ExtractionError::EmptyDocument)
        );
    }

    #[test]
    fn test_extract_each_supported_format_yields_text() {
        let pdf = fixtures::pdf(Some("Hello PDF"));
        let docx = fixtures::docx("<w:p><w:r><w:t>Hello DOCX</w:t></w:r></w:p>");
        let xlsx = fixtures::xlsx(&[(
            "Data",
            r#"<row r="1"><c r="A1" t="inlineStr"><is><t>Nama</t></is></c></row><row r="2"><c r="A2" t="inlineStr"><is><t>Budi</t></is></c></row>"#,
        )]);

        for (data, mime) in [
            (pdf, MIME_PDF),
            (docx, MIME_DOCX),
            (b"hello txt".to_vec(), MIME_TEXT),
            (xlsx, MIME_XLSX),
        ] {
            let extracted = extract(&data, mime).unwrap();
            assert!(!extracted.text.is_empty(), "empty text for {}", mime);
        }
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported(MIME_PDF));
        assert!(is_supported(MIME_XLSX));
        assert!(!is_supported("application/zip"));
    }
}
