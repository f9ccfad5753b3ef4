use std::borrow::Cow;

use crate::features::documents::models::Document;

/// Context used when no document is available
pub const EMPTY_CONTEXT: &str = "(Tidak ada dokumen konteks)";

const MIDDLE_CUT_MARKER: &str = "\n\n...[Bagian tengah dokumen dipotong]...\n\n";
const TOTAL_CUT_MARKER: &str = "...\n[Konteks total dipotong]";

/// Assemble the document context block sent to the model
///
/// Each document gets an equal share of `max_length` characters. A document
/// over its share keeps its head and tail around a cut marker, since key
/// figures often sit at either end. Should the combined blocks still exceed
/// `max_length`, the result is cut hard and marked as truncated. The `<DOC>`
/// tags and the middle marker count against `max_length`, so the hard cut
/// can eat into the tail of the last document.
pub fn build_documents_context(documents: &[Document], max_length: usize) -> String {
    if documents.is_empty() {
        return EMPTY_CONTEXT.to_string();
    }

    let per_document = max_length / documents.len();

    let combined = documents
        .iter()
        .map(|doc| {
            format!(
                "<DOC id=\"{}\" title=\"{}\">\n{}\n</DOC>",
                doc.id,
                doc.title,
                fit_to_budget(&doc.content, per_document)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    if combined.chars().count() <= max_length {
        return combined;
    }

    let mut truncated: String = combined.chars().take(max_length).collect();
    truncated.push_str(TOTAL_CUT_MARKER);
    truncated
}

/// Keep the first and last `budget / 2` characters of oversized content
fn fit_to_budget(content: &str, budget: usize) -> Cow<'_, str> {
    let length = content.chars().count();
    if length <= budget {
        return Cow::Borrowed(content);
    }

    let half = budget / 2;
    let head: String = content.chars().take(half).collect();
    let tail: String = content.chars().skip(length - half).collect();

    Cow::Owned(format!("{}{}{}", head, MIDDLE_CUT_MARKER, tail))
}
