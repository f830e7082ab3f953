use sqlx::FromRow;
use uuid::Uuid;

use crate::store::Credential;

/// The columns of an `api_credentials` row that credential selection reads.
/// Not `Debug` or `Serialize`: rows carry the secret.
#[derive(FromRow)]
pub struct CredentialRow {
    pub id: Uuid,
    pub secret: String,
    pub usage_count: i64,
    pub failure_count: i64,
}

impl From<CredentialRow> for Credential {
    fn from(row: CredentialRow) -> Self {
        Credential {
            id: row.id,
            secret: row.secret,
        }
    }
}
