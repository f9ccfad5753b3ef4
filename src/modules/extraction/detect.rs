use std::io::Cursor;
use zip::ZipArchive;

use super::{MIME_DOCX, MIME_PDF, MIME_TEXT, MIME_XLSX};

/// How much of the upload is inspected for signatures
const SNIFF_WINDOW: usize = 2048;

const ZIP_SIGNATURE: &[u8] = b"PK\x03\x04";
const ZIP_EMPTY_SIGNATURE: &[u8] = b"PK\x05\x06";
const OLE_SIGNATURE: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Identify the media type of an upload from its leading bytes
///
/// The client-declared content type is never consulted. The filename is
/// only used to disambiguate container formats whose signature is shared,
/// such as ZIP archives that are not recognizable office documents.
pub fn detect_mime_type(data: &[u8], filename: Option<&str>) -> String {
    if data.is_empty() {
        return "application/x-empty".to_string();
    }

    let head = &data[..data.len().min(SNIFF_WINDOW)];

    if head.starts_with(b"%PDF-") {
        return MIME_PDF.to_string();
    }

    if head.starts_with(ZIP_SIGNATURE) || head.starts_with(ZIP_EMPTY_SIGNATURE) {
        return detect_office_archive(data)
            .map(str::to_string)
            .or_else(|| guess_from_filename(filename))
            .unwrap_or_else(|| "application/zip".to_string());
    }

    if head.starts_with(OLE_SIGNATURE) {
        return guess_from_filename(filename)
            .unwrap_or_else(|| "application/x-ole-storage".to_string());
    }

    if let Some(image) = detect_image(head) {
        return image.to_string();
    }

    if looks_like_text(head) {
        return MIME_TEXT.to_string();
    }

    "application/octet-stream".to_string()
}

/// Distinguish DOCX from XLSX by the parts the package contains
fn detect_office_archive(data: &[u8]) -> Option<&'static str> {
    let archive = ZipArchive::new(Cursor::new(data)).ok()?;
    let mut names = archive.file_names();

    let mime = names.find_map(|name| match name {
        "word/document.xml" => Some(MIME_DOCX),
        "xl/workbook.xml" => Some(MIME_XLSX),
        _ => None,
    });

    mime
}

fn detect_image(head: &[u8]) -> Option<&'static str> {
    if head.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if head.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if head.starts_with(b"GIF87a") || head.starts_with(b"GIF89a") {
        Some("image/gif")
    } else {
        None
    }
}

fn guess_from_filename(filename: Option<&str>) -> Option<String> {
    let filename = filename?;
    mime_guess::from_path(filename)
        .first()
        .map(|mime| mime.essence_str().to_string())
}

/// Text heuristic: no NUL bytes and only a small share of stray control bytes
///
/// Bytes above 0x7F are accepted so Latin-1 and Windows-1252 files are still
/// treated as text.
fn looks_like_text(head: &[u8]) -> bool {
    if head.contains(&0) {
        return false;
    }

    let suspicious = head
        .iter()
        .filter(|&&b| b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r' | 0x0C | 0x1B))
        .count();

    suspicious * 10 <= head.len()
}
