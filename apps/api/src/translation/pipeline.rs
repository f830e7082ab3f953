//! Translation pipeline.
//!
//! protect → [prompt → generate (with model fallback) → sanitize → shape check]
//! → restore → localize dates → reconcile section labels.
//!
//! The bracketed part runs under the retry controller; protection happens once per
//! request so every attempt sees the same placeholder tokens.

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::llm_client::TextGenerator;
use crate::store::{Credential, CredentialPool};
use crate::translation::content::ContentNode;
use crate::translation::dates::localize_dates;
use crate::translation::errors::TranslationError;
use crate::translation::invoker::{GenerationInvoker, ModelPair};
use crate::translation::language::{Language, SourceLanguage};
use crate::translation::placeholders::{protect, restore, PlaceholderMap};
use crate::translation::prompts::build_translation_prompt;
use crate::translation::retry::{RetryController, RetryPolicy};
use crate::translation::sanitizer::{sanitize_response, ValidatedPayload};
use crate::translation::sections::{reconcile_section_names, SectionNameSet, SECTION_NAMES_KEY};

/// One translation job. Only `retry_count` changes after creation.
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    /// Placeholder-protected content.
    pub content: ContentNode,
    pub source: SourceLanguage,
    pub target: Language,
    pub retry_count: u32,
}

impl TranslationRequest {
    pub fn new(content: ContentNode, source: SourceLanguage, target: Language) -> Self {
        Self {
            content,
            source,
            target,
            retry_count: 0,
        }
    }
}

/// Result of a successful translation.
#[derive(Debug, Clone)]
pub struct TranslationOutcome {
    /// Translated content with links restored and dates localized. The
    /// section-label key is removed; labels are in `section_names`.
    pub content: ContentNode,
    pub section_names: SectionNameSet,
    /// Tokens the generator lost. Their links are gone from the output.
    pub missing_placeholders: Vec<String>,
    pub attempts: u32,
}

pub struct Translator {
    credentials: Arc<dyn CredentialPool>,
    invoker: GenerationInvoker,
    retry: RetryController,
    service: String,
}

impl Translator {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        credentials: Arc<dyn CredentialPool>,
        models: ModelPair,
        policy: RetryPolicy,
        service: impl Into<String>,
    ) -> Self {
        Self {
            invoker: GenerationInvoker::new(generator, credentials.clone(), models),
            credentials,
            retry: RetryController::new(policy),
            service: service.into(),
        }
    }

    /// Translates `content` into `target`. `overrides` are the caller's own section
    /// labels, which win over both defaults and generated labels.
    pub async fn translate(
        &self,
        content: &ContentNode,
        source: SourceLanguage,
        target: Language,
        overrides: Option<&ContentNode>,
    ) -> Result<TranslationOutcome, TranslationError> {
        let protected = protect(content);
        let placeholders = &protected.placeholders;
        let mut request = TranslationRequest::new(protected.content.clone(), source, target);
        let last_credential = Mutex::new(None);
        let last_credential = &last_credential;

        info!(
            "Translating résumé from {source} into {target} ({} protected links, models {} → {})",
            placeholders.len(),
            self.invoker.models().primary,
            self.invoker.models().fallback
        );

        let payload = self
            .retry
            .run(&mut request, move |snapshot| {
                self.attempt(snapshot, placeholders, last_credential)
            })
            .await?;

        let restored = restore(&payload.content, placeholders);
        let mut localized = localize_dates(&restored, source, target);
        let generated_labels = localized.remove(SECTION_NAMES_KEY);
        let section_names = reconcile_section_names(target, generated_labels.as_ref(), overrides);

        info!(
            "Translation into {target} succeeded after {} attempt(s)",
            request.retry_count + 1
        );

        Ok(TranslationOutcome {
            content: localized,
            section_names,
            missing_placeholders: payload.missing_placeholders,
            attempts: request.retry_count + 1,
        })
    }

    /// One pass from prompt to validated payload.
    async fn attempt(
        &self,
        request: TranslationRequest,
        placeholders: &PlaceholderMap,
        last_credential: &Mutex<Option<Credential>>,
    ) -> Result<ValidatedPayload, TranslationError> {
        let credential = match self.acquire_credential().await {
            Ok(credential) => credential,
            // A retry still gets its turn when the pool has run dry: the
            // previous attempt's credential is reused.
            Err(err) if request.retry_count > 0 => {
                let previous = last_credential.lock().ok().and_then(|slot| slot.clone());
                match previous {
                    Some(credential) => {
                        warn!("{err}; retrying with credential {}", credential.id);
                        credential
                    }
                    None => return Err(err),
                }
            }
            Err(err) => return Err(err),
        };
        if let Ok(mut slot) = last_credential.lock() {
            *slot = Some(credential.clone());
        }

        let prompt = build_translation_prompt(&request.content, request.source, request.target);
        let raw = self.invoker.invoke(&credential, &prompt).await?;
        let payload = sanitize_response(&raw, placeholders)?;

        if let Some(mismatch) = shape_drift(&request.content, &payload.content) {
            warn!("Translated payload changed the document shape: {mismatch}");
            return Err(TranslationError::MalformedPayload(format!(
                "document shape changed at {mismatch}"
            )));
        }

        Ok(payload)
    }

    async fn acquire_credential(&self) -> Result<Credential, TranslationError> {
        match self.credentials.get_best_credential(&self.service).await {
            Ok(Some(credential)) => Ok(credential),
            Ok(None) => Err(TranslationError::CredentialUnavailable {
                service: self.service.clone(),
                reason: "no active credential in the pool".to_string(),
            }),
            Err(e) => Err(TranslationError::CredentialUnavailable {
                service: self.service.clone(),
                reason: format!("{e:#}"),
            }),
        }
    }
}

/// Shape comparison that tolerates the generator adding or dropping the
/// section-label key.
fn shape_drift(expected: &ContentNode, actual: &ContentNode) -> Option<String> {
    let mut expected = expected.clone();
    let mut actual = actual.clone();
    expected.remove(SECTION_NAMES_KEY);
    actual.remove(SECTION_NAMES_KEY);
    expected.shape_mismatch(&actual)
}
