use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::resume::ResumeDocumentRow;
use crate::store::DocumentStore;
use crate::translation::content::ContentNode;

/// Résumé documents stored as JSONB in `resume_documents`.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn load(&self, id: Uuid) -> Result<Option<ContentNode>> {
        let row = sqlx::query_as::<_, ResumeDocumentRow>(
            "SELECT content FROM resume_documents WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to load resume document {id}"))?;

        Ok(row.map(|row| ContentNode::from(row.content)))
    }

    async fn save(&self, id: Uuid, document: &ContentNode) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO resume_documents (id, content)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE
                SET content = EXCLUDED.content,
                    updated_at = now()
            "#,
        )
        .bind(id)
        .bind(document.to_json())
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to save resume document {id}"))?;

        info!("Saved resume document {id}");
        Ok(())
    }
}
