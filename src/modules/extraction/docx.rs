use std::io::{Cursor, Read};
use zip::ZipArchive;

use super::{normalize_text, ExtractionError};

const DOCUMENT_PART: &str = "word/document.xml";

/// Extract paragraphs and then table rows from a DOCX package
///
/// Non-blank body paragraphs come first, in document order. Each row of a
/// top-level table follows as one line with its cell texts joined by ` | `.
pub fn extract_docx(data: &[u8]) -> Result<String, ExtractionError> {
    let mut archive =
        ZipArchive::new(Cursor::new(data)).map_err(|e| ExtractionError::unreadable("DOCX", e))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractionError::unreadable("DOCX", e))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::unreadable("DOCX", e))?;

    let body = BodyText::parse(&xml);

    let mut lines: Vec<String> = body
        .paragraphs
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect();

    for row in body.table_rows {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let cells: Vec<&str> = row.iter().map(|cell| cell.trim()).collect();
        lines.push(cells.join(" | "));
    }

    if lines.is_empty() {
        return Err(ExtractionError::EmptyDocument);
    }

    Ok(normalize_text(&lines.join("\n")))
}

/// Text content of a WordprocessingML body
#[derive(Debug, Default)]
struct BodyText {
    paragraphs: Vec<String>,
    table_rows: Vec<Vec<String>>,
}

#[derive(Debug)]
enum Token<'a> {
    Start { name: &'a str, self_closing: bool },
    End(&'a str),
    Text(&'a str),
}

/// Minimal tag scanner; enough structure for body text, not a validating parser
struct Tokens<'a> {
    xml: &'a str,
    pos: usize,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        loop {
            let rest = &self.xml[self.pos..];
            if rest.is_empty() {
                return None;
            }

            if !rest.starts_with('<') {
                let end = rest.find('<').unwrap_or(rest.len());
                self.pos += end;
                return Some(Token::Text(&rest[..end]));
            }

            let close = match rest.find('>') {
                Some(close) => close,
                None => {
                    self.pos = self.xml.len();
                    return None;
                }
            };
            let tag = &rest[1..close];
            self.pos += close + 1;

            // Declarations, processing instructions, comments
            if tag.starts_with('?') || tag.starts_with('!') {
                continue;
            }

            if let Some(name) = tag.strip_prefix('/') {
                return Some(Token::End(name.trim()));
            }

            let self_closing = tag.ends_with('/');
            let name = tag
                .trim_end_matches('/')
                .split(|c: char| c.is_whitespace())
                .next()
                .unwrap_or_default();
            return Some(Token::Start { name, self_closing });
        }
    }
}

impl BodyText {
    fn parse(xml: &str) -> Self {
        let mut body = BodyText::default();

        let mut table_depth = 0usize;
        let mut skip_depth = 0usize;
        let mut in_run = false;
        let mut in_text_run = false;
        let mut paragraph = String::new();
        let mut row: Vec<String> = Vec::new();
        let mut cell: Vec<String> = Vec::new();

        let tokens = Tokens { xml, pos: 0 };
        for token in tokens {
            match token {
                // Text boxes and compatibility fallbacks duplicate body text
                Token::Start { name, self_closing } if is_skipped(name) => {
                    if !self_closing {
                        skip_depth += 1;
                    }
                }
                Token::End(name) if is_skipped(name) => {
                    skip_depth = skip_depth.saturating_sub(1);
                }
                _ if skip_depth > 0 => {}

                Token::Start { name, self_closing } => match (name, self_closing) {
                    ("w:tbl", false) => table_depth += 1,
                    ("w:tr", false) if table_depth == 1 => row.clear(),
                    ("w:tc", false) if table_depth == 1 => cell.clear(),
                    ("w:p", false) => paragraph.clear(),
                    ("w:p", true) if table_depth == 0 => body.paragraphs.push(String::new()),
                    ("w:r", false) => in_run = true,
                    ("w:t", false) => in_text_run = true,
                    // Tab stops in paragraph properties share the element name
                    ("w:tab", _) if in_run => paragraph.push('\t'),
                    ("w:br", _) | ("w:cr", _) if in_run => paragraph.push('\n'),
                    _ => {}
                },

                Token::End(name) => match name {
                    "w:tbl" => table_depth = table_depth.saturating_sub(1),
                    "w:tr" if table_depth == 1 => body.table_rows.push(std::mem::take(&mut row)),
                    "w:tc" if table_depth == 1 => row.push(cell.join("\n")),
                    "w:p" => {
                        let text = std::mem::take(&mut paragraph);
                        match table_depth {
                            0 => body.paragraphs.push(text),
                            1 => cell.push(text),
                            _ => {}
                        }
                    }
                    "w:r" => in_run = false,
                    "w:t" => in_text_run = false,
                    _ => {}
                },

                Token::Text(text) if in_text_run => paragraph.push_str(&unescape_xml(text)),
                Token::Text(_) => {}
            }
        }

        body
    }
}

fn is_skipped(name: &str) -> bool {
    matches!(name, "mc:Fallback" | "w:txbxContent")
}

fn unescape_xml(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest.find(';').and_then(|semi| {
            let entity = &rest[1..semi];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|ch| (ch, semi))
        });

        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::extraction::fixtures;

    fn para(text: &str) -> String {
        format!(r#"<w:p><w:pPr><w:pStyle w:val="Normal"/></w:pPr><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#, text)
    }

    fn cell(text: &str) -> String {
        format!("<w:tc><w:tcPr/>{}</w:tc>", para(text))
    }

    #[test]
    fn test_paragraphs_then_table_rows() {
        let body = format!(
            "{}<w:p/>{}<w:tbl><w:tr>{}{}</w:tr><w:tr>{}{}</w:tr></w:tbl>{}",
            para("Laporan Kinerja"),
            para("Kuartal 3"),
            cell("Metrik"),
            cell("Nilai"),
            cell(" NPS "),
            cell("80"),
            para("Penutup"),
        );
        let text = extract_docx(&fixtures::docx(&body)).unwrap();
        assert_eq!(
            text,
            "Laporan Kinerja\nKuartal 3\nPenutup\nMetrik | Nilai\nNPS | 80"
        );
    }

    #[test]
    fn test_skips_blank_table_rows() {
        let body = format!(
            "<w:tbl><w:tr>{}{}</w:tr><w:tr>{}{}</w:tr></w:tbl>",
            cell(""),
            cell(" "),
            cell("a"),
            cell("b"),
        );
        assert_eq!(extract_docx(&fixtures::docx(&body)).unwrap(), "a | b");
    }

    #[test]
    fn test_runs_tabs_and_entities() {
        let body = r#"<w:p><w:r><w:t>R&amp;D</w:t></w:r><w:r><w:tab/><w:t>&lt;80&gt; &#x41;&#66;</w:t></w:r></w:p>"#;
        assert_eq!(
            extract_docx(&fixtures::docx(body)).unwrap(),
            "R&D\t<80> AB"
        );
    }

    #[test]
    fn test_empty_document_is_an_error() {
        let body = "<w:p/><w:p><w:r><w:t>   </w:t></w:r></w:p>";
        assert_eq!(
            extract_docx(&fixtures::docx(body)),
            Err(ExtractionError::EmptyDocument)
        );
    }

    #[test]
    fn test_archive_without_document_part_is_unreadable() {
        let archive = fixtures::zip_archive(&[("xl/workbook.xml", "<workbook/>")]);
        assert!(matches!(
            extract_docx(&archive),
            Err(ExtractionError::Unreadable { format: "DOCX", .. })
        ));
    }

    #[test]
    fn test_unescape_leaves_unknown_entities() {
        assert_eq!(unescape_xml("a &bogus; b & c"), "a &bogus; b & c");
    }
}
