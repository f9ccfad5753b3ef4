use super::normalize_text;

/// Decode a plain text upload and normalize it
///
/// UTF-8 (with an optional BOM) is tried first. Anything else is read as
/// Latin-1, which maps every byte and so never fails.
pub fn extract_plain_text(data: &[u8]) -> String {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);

    let decoded = match std::str::from_utf8(data) {
        Ok(text) => text.to_string(),
        Err(_) => {
            tracing::debug!("Text upload is not UTF-8, decoding as Latin-1");
            data.iter().map(|&b| char::from(b)).collect()
        }
    };

    normalize_text(&decoded)
}
