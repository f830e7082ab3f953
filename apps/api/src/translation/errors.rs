use thiserror::Error;

use crate::errors::AppError;
use crate::translation::language::Language;

/// Broad class of a translation failure. Drives retry eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network, non-2xx or service-reported failures.
    Transient,
    /// The generator answered, but not with a usable structured object.
    Payload,
    /// The credential in use was rejected by the service.
    Credential,
    /// Retrying cannot help.
    Fatal,
}

impl ErrorCategory {
    pub fn is_retry_eligible(self) -> bool {
        !matches!(self, ErrorCategory::Fatal)
    }
}

/// Errors raised inside the translation pipeline. Every variant keeps the technical
/// detail for operators; only `RetryBudgetExhausted` and `CredentialUnavailable`
/// ever leave the pipeline.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("No usable credential for service '{service}': {reason}")]
    CredentialUnavailable { service: String, reason: String },

    #[error("Generation failed on model {model}: {message}")]
    GenerationFailed {
        model: String,
        message: String,
        credential_rejected: bool,
    },

    #[error("Generator output contains no JSON object")]
    NoStructuredPayload,

    #[error("Generator output is not a valid résumé object: {0}")]
    MalformedPayload(String),

    #[error("{} placeholder(s) missing from translation: {}", missing.len(), missing.join(", "))]
    PlaceholderMismatch { missing: Vec<String> },

    #[error("Invalid translation input: {0}")]
    InvalidInput(String),

    #[error("Translation failed after {attempts} attempts: {last}")]
    RetryBudgetExhausted {
        attempts: u32,
        last: Box<TranslationError>,
    },
}

impl TranslationError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TranslationError::CredentialUnavailable { .. } => ErrorCategory::Fatal,
            TranslationError::GenerationFailed {
                credential_rejected: true,
                ..
            } => ErrorCategory::Credential,
            TranslationError::GenerationFailed { .. } => ErrorCategory::Transient,
            TranslationError::NoStructuredPayload | TranslationError::MalformedPayload(_) => {
                ErrorCategory::Payload
            }
            // Only ever logged; never returned from an attempt.
            TranslationError::PlaceholderMismatch { .. } => ErrorCategory::Payload,
            TranslationError::InvalidInput(_) => ErrorCategory::Fatal,
            TranslationError::RetryBudgetExhausted { .. } => ErrorCategory::Fatal,
        }
    }

    pub fn is_retry_eligible(&self) -> bool {
        self.category().is_retry_eligible()
    }

    /// Converts a pipeline failure into the HTTP error shown to the user. The full
    /// diagnostic is logged here; the response only carries a short hint written in
    /// the language the user asked for.
    pub fn into_app_error(self, target: Language) -> AppError {
        tracing::error!("Translation into {target} failed: {self}");
        match self {
            TranslationError::InvalidInput(message) => AppError::Validation(message),
            TranslationError::CredentialUnavailable { .. } => AppError::ServiceUnavailable,
            _ => AppError::TranslationFailed(target.failure_hint().to_string()),
        }
    }
}
