use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::Result;
use crate::features::documents::models::{Document, NewDocument};

/// Persistent store of extracted documents
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn create(&self, document: NewDocument) -> Result<Document>;

    /// Every stored document, newest first
    async fn list(&self) -> Result<Vec<Document>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Document>>;

    /// Returns `false` when no document had that id
    async fn delete(&self, id: i64) -> Result<bool>;
}

pub struct PgDocumentRepository {
    pool: PgPool,
}

impl PgDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn create(&self, document: NewDocument) -> Result<Document> {
        let created = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (owner_user_id, title, content, source_filename, mime_type, content_length, structured_data)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&document.owner_user_id)
        .bind(&document.title)
        .bind(&document.content)
        .bind(&document.source_filename)
        .bind(&document.mime_type)
        .bind(document.content_length)
        .bind(&document.structured_data)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Document>> {
        let documents = sqlx::query_as::<_, Document>(
            r#"
            SELECT * FROM documents
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(documents)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Document>> {
        let document = sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(document)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
