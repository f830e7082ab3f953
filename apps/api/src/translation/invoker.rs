//! Generation invoker — obtains translated text from the generation service.
//!
//! Tries the primary (cheaper) model, then the fallback model with the same
//! credential. Every attempt is reported to the credential pool; when both fail the
//! credential is marked failed so the next attempt picks another one. The returned
//! text is not interpreted here.

use std::sync::Arc;

use tracing::{info, warn};

use crate::llm_client::TextGenerator;
use crate::store::{Credential, CredentialPool};
use crate::translation::errors::TranslationError;

/// Primary and fallback model identifiers.
#[derive(Debug, Clone)]
pub struct ModelPair {
    pub primary: String,
    pub fallback: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success(String),
    Failure {
        reason: String,
        credential_rejected: bool,
    },
}

/// One call to one model. Not persisted.
#[derive(Debug, Clone)]
pub struct ModelAttempt {
    pub model_name: String,
    pub outcome: AttemptOutcome,
}

pub struct GenerationInvoker {
    generator: Arc<dyn TextGenerator>,
    credentials: Arc<dyn CredentialPool>,
    models: ModelPair,
}

impl GenerationInvoker {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        credentials: Arc<dyn CredentialPool>,
        models: ModelPair,
    ) -> Self {
        Self {
            generator,
            credentials,
            models,
        }
    }

    pub fn models(&self) -> &ModelPair {
        &self.models
    }

    pub async fn invoke(
        &self,
        credential: &Credential,
        prompt: &str,
    ) -> Result<String, TranslationError> {
        let primary = self.attempt(credential, &self.models.primary, prompt).await;
        let primary_reason = match primary.outcome {
            AttemptOutcome::Success(text) => {
                self.report(credential, true, &format!("{}: success", primary.model_name))
                    .await;
                return Ok(text);
            }
            AttemptOutcome::Failure { reason, .. } => reason,
        };

        warn!(
            "Primary model {} failed ({}); falling back to {}",
            primary.model_name, primary_reason, self.models.fallback
        );
        self.report(
            credential,
            false,
            &format!(
                "{}: failed, falling back to {}",
                primary.model_name, self.models.fallback
            ),
        )
        .await;

        let fallback = self.attempt(credential, &self.models.fallback, prompt).await;
        match fallback.outcome {
            AttemptOutcome::Success(text) => {
                self.report(
                    credential,
                    true,
                    &format!("{}: success after fallback", fallback.model_name),
                )
                .await;
                Ok(text)
            }
            AttemptOutcome::Failure {
                reason,
                credential_rejected,
            } => {
                self.report(
                    credential,
                    false,
                    &format!("{}: fallback failed", fallback.model_name),
                )
                .await;
                if let Err(e) = self.credentials.mark_failed(credential.id, &reason).await {
                    warn!("Could not mark credential {} as failed: {e:#}", credential.id);
                }
                Err(TranslationError::GenerationFailed {
                    model: fallback.model_name,
                    message: reason,
                    credential_rejected,
                })
            }
        }
    }

    async fn attempt(&self, credential: &Credential, model: &str, prompt: &str) -> ModelAttempt {
        let outcome = match self.generator.generate(&credential.secret, model, prompt).await {
            Ok(text) => {
                info!("Model {model} returned {} bytes", text.len());
                AttemptOutcome::Success(text)
            }
            Err(e) => AttemptOutcome::Failure {
                credential_rejected: e.is_credential_rejection(),
                reason: e.to_string(),
            },
        };
        ModelAttempt {
            model_name: model.to_string(),
            outcome,
        }
    }

    /// Usage reporting never fails the translation.
    async fn report(&self, credential: &Credential, success: bool, note: &str) {
        if let Err(e) = self
            .credentials
            .record_usage(credential.id, success, note)
            .await
        {
            warn!("Could not record usage for credential {}: {e:#}", credential.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::translation::testing::{overloaded, RecordingPool, ScriptedGenerator};

    fn models() -> ModelPair {
        ModelPair {
            primary: "fast-model".to_string(),
            fallback: "strong-model".to_string(),
        }
    }

    fn invoker(generator: Arc<ScriptedGenerator>, pool: Arc<RecordingPool>) -> GenerationInvoker {
        GenerationInvoker::new(generator, pool, models())
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let generator = Arc::new(ScriptedGenerator::sequence(vec![Ok("{}".to_string())]));
        let pool = Arc::new(RecordingPool::with_credentials(1));
        let credential = pool.credential(0);

        let text = invoker(generator.clone(), pool.clone())
            .invoke(&credential, "prompt")
            .await
            .unwrap();

        assert_eq!(text, "{}");
        assert_eq!(generator.models_called(), vec!["fast-model"]);
        assert_eq!(
            pool.usage(),
            vec![(credential.id, true, "fast-model: success".to_string())]
        );
        assert!(pool.marked_failed().is_empty());
    }

    #[tokio::test]
    async fn test_primary_failure_falls_back_with_same_credential() {
        let generator = Arc::new(ScriptedGenerator::sequence(vec![
            Err(overloaded()),
            Ok("{\"a\": \"b\"}".to_string()),
        ]));
        let pool = Arc::new(RecordingPool::with_credentials(1));
        let credential = pool.credential(0);

        let text = invoker(generator.clone(), pool.clone())
            .invoke(&credential, "prompt")
            .await
            .unwrap();

        assert_eq!(text, "{\"a\": \"b\"}");
        assert_eq!(generator.models_called(), vec!["fast-model", "strong-model"]);
        assert_eq!(generator.keys_used(), vec![credential.secret.clone(); 2]);
        let usage = pool.usage();
        assert_eq!(usage.len(), 2);
        assert!(!usage[0].1);
        assert!(usage[0].2.contains("falling back to strong-model"));
        assert!(usage[1].1);
        assert!(pool.marked_failed().is_empty());
    }

    #[tokio::test]
    async fn test_both_models_failing_marks_credential_and_errors() {
        let generator = Arc::new(ScriptedGenerator::always(|| Err(overloaded())));
        let pool = Arc::new(RecordingPool::with_credentials(1));
        let credential = pool.credential(0);

        let err = invoker(generator.clone(), pool.clone())
            .invoke(&credential, "prompt")
            .await
            .unwrap_err();

        match err {
            TranslationError::GenerationFailed {
                model,
                message,
                credential_rejected,
            } => {
                assert_eq!(model, "strong-model");
                assert!(message.contains("Overloaded"));
                assert!(!credential_rejected);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(generator.call_count(), 2);
        assert_eq!(pool.marked_failed().len(), 1);
        assert_eq!(pool.marked_failed()[0].0, credential.id);
        assert!(pool.usage().iter().all(|(_, success, _)| !success));
    }

    #[tokio::test]
    async fn test_rejected_key_is_reported_as_credential_error() {
        let generator = Arc::new(ScriptedGenerator::always(|| {
            Err(LlmError::Api {
                status: 401,
                message: "invalid x-api-key".to_string(),
            })
        }));
        let pool = Arc::new(RecordingPool::with_credentials(1));
        let credential = pool.credential(0);

        let err = invoker(generator, pool)
            .invoke(&credential, "prompt")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TranslationError::GenerationFailed {
                credential_rejected: true,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_pool_reporting_errors_do_not_fail_invocation() {
        let generator = Arc::new(ScriptedGenerator::sequence(vec![Ok("{}".to_string())]));
        let pool = Arc::new(RecordingPool::with_credentials(1).failing_reports());
        let credential = pool.credential(0);

        let text = invoker(generator, pool)
            .invoke(&credential, "prompt")
            .await
            .unwrap();
        assert_eq!(text, "{}");
    }
}
