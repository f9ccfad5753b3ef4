use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::documents::dtos::{
    DocumentDetailDto, DocumentListResponseDto, DocumentSummaryDto, UploadDocumentFieldsDto,
};
use crate::features::documents::models::NewDocument;
use crate::features::documents::repositories::DocumentRepository;
use crate::modules::extraction::{self, SUPPORTED_FORMATS};
use crate::shared::constants::MAX_TITLE_CHARS;

/// File part of an upload form
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Service for document ingestion and lookup
pub struct DocumentService {
    repository: Arc<dyn DocumentRepository>,
    max_upload_size_mb: usize,
}

impl DocumentService {
    pub fn new(repository: Arc<dyn DocumentRepository>, max_upload_size_mb: usize) -> Self {
        Self {
            repository,
            max_upload_size_mb,
        }
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.max_upload_size_mb * 1024 * 1024
    }

    /// Validate, sniff, extract and store an uploaded file
    ///
    /// Nothing is persisted unless extraction produced text.
    pub async fn upload(
        &self,
        owner_user_id: &str,
        file: UploadedFile,
        fields: UploadDocumentFieldsDto,
    ) -> Result<DocumentSummaryDto> {
        fields.validate()?;

        if file.data.len() > self.max_upload_size_bytes() {
            return Err(AppError::PayloadTooLarge(format!(
                "File exceeds the maximum upload size of {} MB",
                self.max_upload_size_mb
            )));
        }

        let mime_type = extraction::detect_mime_type(&file.data, Some(&file.filename));
        if !extraction::is_supported(&mime_type) {
            debug!(
                "Rejecting upload '{}' with unsupported type {}",
                file.filename, mime_type
            );
            return Err(AppError::UnsupportedMediaType {
                mime_type,
                supported: SUPPORTED_FORMATS.to_vec(),
            });
        }

        let content_length = i32::try_from(file.data.len()).unwrap_or(i32::MAX);
        let data = file.data;
        let extraction_mime = mime_type.clone();
        let extracted =
            tokio::task::spawn_blocking(move || extraction::extract(&data, &extraction_mime))
                .await
                .map_err(|e| AppError::Internal(format!("Extraction task failed: {}", e)))??;

        let structured_data = extracted
            .structured_data
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| AppError::Internal(format!("Failed to encode sheet data: {}", e)))?;

        let title = fields
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| truncate_chars(&file.filename, MAX_TITLE_CHARS));

        let document = self
            .repository
            .create(NewDocument {
                owner_user_id: owner_user_id.to_string(),
                title,
                content: extracted.text,
                source_filename: truncate_chars(&file.filename, MAX_TITLE_CHARS),
                mime_type,
                content_length,
                structured_data,
            })
            .await?;

        info!(
            "Document stored: id={}, mime_type={}, content_length={}, owner={}",
            document.id, document.mime_type, document.content_length, document.owner_user_id
        );

        Ok(DocumentSummaryDto::from(&document))
    }

    /// All documents, newest first
    pub async fn list(&self) -> Result<DocumentListResponseDto> {
        let documents: Vec<DocumentSummaryDto> = self
            .repository
            .list()
            .await?
            .iter()
            .map(DocumentSummaryDto::from)
            .collect();

        Ok(DocumentListResponseDto {
            count: documents.len(),
            documents,
        })
    }

    pub async fn get(&self, id: i64) -> Result<DocumentDetailDto> {
        self.repository
            .find_by_id(id)
            .await?
            .map(DocumentDetailDto::from)
            .ok_or_else(|| AppError::NotFound(format!("Document with id {} not found", id)))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.repository.delete(id).await? {
            return Err(AppError::NotFound(format!(
                "Document with id {} not found",
                id
            )));
        }

        info!("Document deleted: id={}", id);
        Ok(())
    }
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}
