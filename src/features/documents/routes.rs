use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;

use crate::features::documents::handlers::{
    delete_document, get_document, list_documents, upload_document,
};
use crate::features::documents::services::DocumentService;

/// Extra room for multipart boundaries and the text fields
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Create routes for the documents feature
pub fn routes(document_service: Arc<DocumentService>) -> Router {
    let body_limit = document_service.max_upload_size_bytes() + MULTIPART_OVERHEAD;

    Router::new()
        .route(
            "/api/documents",
            get(list_documents)
                .post(upload_document)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .route(
            "/api/documents/{id}",
            get(get_document).delete(delete_document),
        )
        .with_state(document_service)
}
