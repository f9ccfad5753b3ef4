use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::documents::dtos::{
    DocumentDetailDto, DocumentListResponseDto, UploadDocumentDto, UploadDocumentFieldsDto,
    UploadDocumentResponseDto,
};
use crate::features::documents::services::{DocumentService, UploadedFile};
use crate::shared::types::{ErrorResponse, MessageResponse};

fn multipart_error(e: MultipartError) -> AppError {
    debug!("Failed to read multipart data: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Uploaded file exceeds the maximum upload size".to_string())
    } else {
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    }
}

/// Upload a document
///
/// Accepts multipart/form-data with:
/// - `file`: The document to upload (required)
/// - `title`: Optional title, defaults to the filename
#[utoipa::path(
    post,
    path = "/api/documents",
    tag = "documents",
    request_body(
        content = UploadDocumentDto,
        content_type = "multipart/form-data",
        description = "Document file (PDF, DOCX, TXT, XLSX) with optional title",
    ),
    responses(
        (status = 201, description = "Document uploaded and extracted", body = UploadDocumentResponseDto),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "Unsupported file format", body = ErrorResponse),
        (status = 422, description = "Text could not be extracted", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_document(
    user: AuthenticatedUser,
    State(service): State<Arc<DocumentService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadDocumentResponseDto>), AppError> {
    let mut file: Option<UploadedFile> = None;
    let mut fields = UploadDocumentFieldsDto::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unnamed".to_string());
                let data = field.bytes().await.map_err(multipart_error)?;

                file = Some(UploadedFile {
                    filename,
                    data: data.to_vec(),
                });
            }
            "title" => {
                let text = field.text().await.map_err(multipart_error)?;
                fields.title = Some(text);
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let file =
        file.ok_or_else(|| AppError::Validation(vec!["file: File is required".to_string()]))?;

    let document = service.upload(&user.user_id, file, fields).await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadDocumentResponseDto {
            message: "Dokumen berhasil diupload".to_string(),
            document,
        }),
    ))
}

/// List all documents
///
/// Documents form one global pool shared by every user, newest first.
#[utoipa::path(
    get,
    path = "/api/documents",
    tag = "documents",
    responses(
        (status = 200, description = "Documents", body = DocumentListResponseDto),
        (status = 401, description = "Authentication required", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_documents(
    _user: AuthenticatedUser,
    State(service): State<Arc<DocumentService>>,
) -> Result<Json<DocumentListResponseDto>, AppError> {
    Ok(Json(service.list().await?))
}

/// Get a document with its full extracted content
#[utoipa::path(
    get,
    path = "/api/documents/{id}",
    tag = "documents",
    params(
        ("id" = i64, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document detail", body = DocumentDetailDto),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_document(
    _user: AuthenticatedUser,
    State(service): State<Arc<DocumentService>>,
    Path(id): Path<i64>,
) -> Result<Json<DocumentDetailDto>, AppError> {
    Ok(Json(service.get(id).await?))
}

/// Delete a document
#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    tag = "documents",
    params(
        ("id" = i64, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document deleted", body = MessageResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_document(
    user: AuthenticatedUser,
    State(service): State<Arc<DocumentService>>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    debug!("User {} deleting document {}", user.user_id, id);
    service.delete(id).await?;
    Ok(Json(MessageResponse::new("Dokumen berhasil dihapus")))
}
