use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::features::documents::models::Document;
use crate::shared::constants::CONTENT_PREVIEW_CHARS;

/// Upload document request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadDocumentDto {
    /// PDF, DOCX, TXT or XLSX file
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
    /// Document title; defaults to the uploaded filename
    #[schema(example = "Laporan Kinerja Q3")]
    pub title: Option<String>,
}

/// Text fields of the upload form
#[derive(Debug, Default, Validate)]
pub struct UploadDocumentFieldsDto {
    #[validate(length(max = 500, message = "Title must not exceed 500 characters"))]
    pub title: Option<String>,
}

/// Document as shown in listings
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentSummaryDto {
    pub id: i64,
    pub title: String,
    pub source_filename: String,
    pub mime_type: String,
    /// Size of the uploaded file in bytes
    pub content_length: i32,
    /// First 200 characters of the extracted text
    pub content_preview: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Document> for DocumentSummaryDto {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id,
            title: document.title.clone(),
            source_filename: document.source_filename.clone(),
            mime_type: document.mime_type.clone(),
            content_length: document.content_length,
            content_preview: content_preview(&document.content),
            created_at: document.created_at,
            updated_at: document.updated_at,
        }
    }
}

/// Document with its full extracted content
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentDetailDto {
    pub id: i64,
    pub owner_user_id: String,
    pub title: String,
    pub content: String,
    pub source_filename: String,
    pub mime_type: String,
    pub content_length: i32,
    /// Sheets of a spreadsheet upload: `[{name, columns, rows}]`
    #[schema(value_type = Option<Object>)]
    pub structured_data: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Document> for DocumentDetailDto {
    fn from(document: Document) -> Self {
        Self {
            id: document.id,
            owner_user_id: document.owner_user_id,
            title: document.title,
            content: document.content,
            source_filename: document.source_filename,
            mime_type: document.mime_type,
            content_length: document.content_length,
            structured_data: document.structured_data,
            created_at: document.created_at,
            updated_at: document.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadDocumentResponseDto {
    #[schema(example = "Dokumen berhasil diupload")]
    pub message: String,
    pub document: DocumentSummaryDto,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentListResponseDto {
    pub count: usize,
    pub documents: Vec<DocumentSummaryDto>,
}

/// First [`CONTENT_PREVIEW_CHARS`] characters, with `...` when cut
pub fn content_preview(content: &str) -> String {
    let mut chars = content.chars();
    let preview: String = chars.by_ref().take(CONTENT_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", preview)
    } else {
        preview
    }
}
