use serde_json::Value;
use sqlx::FromRow;

/// The stored résumé record. Only the section subtree of `content` is ever
/// translated.
#[derive(Debug, Clone, FromRow)]
pub struct ResumeDocumentRow {
    pub content: Value,
}
