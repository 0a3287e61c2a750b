//! `PostgreSQL` document store.
//!
//! Documents live in a single `documents` table keyed by
//! `(collection, id)` with the fields in a `JSONB` column. See
//! `migrations/20240301000001_create_documents.sql`.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;

use super::{Document, DocumentBody, DocumentStore, RepositoryError};

/// Document store backed by a `PostgreSQL` `JSONB` table.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a store over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

type DocumentRow = (String, Json<DocumentBody>);

fn into_documents(rows: Vec<DocumentRow>) -> Vec<Document> {
    rows.into_iter()
        .map(|(id, Json(body))| Document { id, body })
        .collect()
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, RepositoryError> {
        let row: Option<DocumentRow> = sqlx::query_as(
            r"
            SELECT id, body
            FROM documents
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, Json(body))| Document { id, body }))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, RepositoryError> {
        let rows: Vec<DocumentRow> = sqlx::query_as(
            r"
            SELECT id, body
            FROM documents
            WHERE collection = $1
            ORDER BY id
            ",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        Ok(into_documents(rows))
    }

    async fn list_where(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, RepositoryError> {
        let rows: Vec<DocumentRow> = sqlx::query_as(
            r"
            SELECT id, body
            FROM documents
            WHERE collection = $1 AND body -> $2 = $3
            ORDER BY id
            ",
        )
        .bind(collection)
        .bind(field)
        .bind(Json(value))
        .fetch_all(&self.pool)
        .await?;

        Ok(into_documents(rows))
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        body: DocumentBody,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO documents (collection, id, body)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET body = EXCLUDED.body, updated_at = now()
            ",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(body))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
