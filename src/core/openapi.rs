use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::chat::{dtos as chat_dtos, handlers as chat_handlers};
use crate::features::documents::{dtos as documents_dtos, handlers as documents_handlers};
use crate::shared::llm::ChatEnvelope;
use crate::shared::types::{ErrorResponse, MessageResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Documents
        documents_handlers::upload_document,
        documents_handlers::list_documents,
        documents_handlers::get_document,
        documents_handlers::delete_document,
        // Chat
        chat_handlers::chat,
        chat_handlers::get_chat_history,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            ChatEnvelope,
            documents_dtos::UploadDocumentDto,
            documents_dtos::UploadDocumentResponseDto,
            documents_dtos::DocumentSummaryDto,
            documents_dtos::DocumentDetailDto,
            documents_dtos::DocumentListResponseDto,
            chat_dtos::ChatRequestDto,
            chat_dtos::ChatLogDto,
            chat_dtos::ChatHistoryResponseDto,
        )
    ),
    tags(
        (name = "documents", description = "Document upload, text extraction and management"),
        (name = "chat", description = "Question answering over uploaded documents"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "NOC RAG API",
        version = "0.1.0",
        description = "Document question answering for the network operations center",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
