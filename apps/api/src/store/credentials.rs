use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::credential::CredentialRow;
use crate::store::{Credential, CredentialPool};

const SELECT_BEST_CREDENTIAL: &str = r#"
    SELECT id, secret, usage_count, failure_count FROM api_credentials
    WHERE service = $1 AND status = 'active'
    ORDER BY failure_count ASC, usage_count ASC, last_used_at ASC NULLS FIRST
    LIMIT 1
"#;

/// Credential pool over the `api_credentials` table.
///
/// Selection: active credentials for the service, fewest failures first, then
/// fewest uses, then least recently used.
#[derive(Clone)]
pub struct PgCredentialPool {
    pool: PgPool,
}

impl PgCredentialPool {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialPool for PgCredentialPool {
    async fn get_best_credential(&self, service: &str) -> Result<Option<Credential>> {
        let row = sqlx::query_as::<_, CredentialRow>(SELECT_BEST_CREDENTIAL)
            .bind(service)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to select credential for service '{service}'"))?;

        if let Some(row) = &row {
            debug!(
                "Selected credential {} (uses={}, failures={})",
                row.id, row.usage_count, row.failure_count
            );
        }

        Ok(row.map(Credential::from))
    }

    async fn record_usage(&self, credential_id: Uuid, success: bool, note: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE api_credentials
            SET usage_count = usage_count + 1,
                failure_count = failure_count + CASE WHEN $2 THEN 0 ELSE 1 END,
                last_note = $3,
                last_used_at = now()
            WHERE id = $1
            "#,
        )
        .bind(credential_id)
        .bind(success)
        .bind(note)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to record usage for credential {credential_id}"))?;
        Ok(())
    }

    async fn mark_failed(&self, credential_id: Uuid, reason: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE api_credentials SET status = 'failed', last_error = $2 WHERE id = $1",
        )
        .bind(credential_id)
        .bind(reason)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to mark credential {credential_id} as failed"))?;

        if result.rows_affected() == 0 {
            warn!("Credential {credential_id} not found while marking it failed");
        }
        Ok(())
    }
}
