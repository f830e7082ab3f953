//! External collaborators of the translation pipeline: where résumé documents live
//! and where generation credentials come from. The pipeline only sees the traits;
//! PostgreSQL implementations back them in production.

use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::translation::content::ContentNode;

pub mod credentials;
pub mod documents;

pub use credentials::PgCredentialPool;
pub use documents::PgDocumentStore;

/// An API key handed out by the credential pool.
#[derive(Clone)]
pub struct Credential {
    pub id: Uuid,
    pub secret: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Hands out generation credentials and tracks their health.
#[async_trait]
pub trait CredentialPool: Send + Sync {
    /// The healthiest active credential for `service`, if any.
    async fn get_best_credential(&self, service: &str) -> Result<Option<Credential>>;

    async fn record_usage(&self, credential_id: Uuid, success: bool, note: &str) -> Result<()>;

    async fn mark_failed(&self, credential_id: Uuid, reason: &str) -> Result<()>;
}

/// Loads and saves résumé documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<Option<ContentNode>>;

    async fn save(&self, id: Uuid, document: &ContentNode) -> Result<()>;
}
