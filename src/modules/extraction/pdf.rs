use lopdf::Document;
use std::panic::{self, AssertUnwindSafe};

use super::{normalize_text, ExtractionError};

/// Extract the text layer of a PDF, page by page
///
/// Pages without text are skipped. A document where no page yields any text
/// is reported as [`ExtractionError::NoExtractableText`], which usually means
/// a scanned file without OCR.
pub fn extract_pdf(data: &[u8]) -> Result<String, ExtractionError> {
    let document =
        Document::load_mem(data).map_err(|e| ExtractionError::unreadable("PDF", e))?;

    let mut pages = Vec::new();
    for (page_number, _) in document.get_pages() {
        match document.extract_text(&[page_number]) {
            Ok(text) if !text.trim().is_empty() => pages.push(text),
            Ok(_) => tracing::debug!("PDF page {} has no text layer", page_number),
            Err(e) => tracing::debug!("PDF page {} text extraction failed: {}", page_number, e),
        }
    }

    if pages.is_empty() {
        // Some font encodings are only understood by pdf-extract
        if let Some(text) = extract_with_pdf_extract(data) {
            pages.push(text);
        }
    }

    if pages.is_empty() {
        return Err(ExtractionError::NoExtractableText);
    }

    Ok(normalize_text(&pages.join("\n")))
}

fn extract_with_pdf_extract(data: &[u8]) -> Option<String> {
    // pdf-extract panics on some malformed inputs
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(data)
    }));

    match result {
        Ok(Ok(text)) if !text.trim().is_empty() => Some(text),
        Ok(Ok(_)) => None,
        Ok(Err(e)) => {
            tracing::debug!("pdf-extract failed: {}", e);
            None
        }
        Err(_) => {
            tracing::warn!("pdf-extract panicked while reading PDF");
            None
        }
    }
}
