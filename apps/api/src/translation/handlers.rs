//! Axum route handlers for the Translation API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::translation::content::ContentNode;
use crate::translation::document::{translate_document, TranslatedDocument};
use crate::translation::language::{Language, SourceLanguage};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub document: ContentNode,
    pub target_language: Language,
    #[serde(default)]
    pub source_language: SourceLanguage,
}

#[derive(Debug, Deserialize)]
pub struct TranslateResumeRequest {
    pub target_language: Language,
    #[serde(default)]
    pub source_language: SourceLanguage,
    #[serde(default)]
    pub save: bool,
}

#[derive(Debug, Serialize)]
pub struct TranslateResumeResponse {
    #[serde(flatten)]
    pub translation: TranslatedDocument,
    pub saved: bool,
}

#[derive(Debug, Serialize)]
pub struct LanguageInfo {
    pub id: Language,
    pub code: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub languages: Vec<LanguageInfo>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/translate
///
/// Translates a résumé document supplied in the request body. Nothing is stored.
pub async fn handle_translate(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslatedDocument>, AppError> {
    let target = request.target_language;

    let translation = translate_document(
        &state.translator,
        &request.document,
        request.source_language,
        target,
    )
    .await
    .map_err(|e| e.into_app_error(target))?;

    Ok(Json(translation))
}

/// POST /api/v1/resumes/:id/translate
///
/// Translates a stored résumé. With `save: true` the translated document
/// replaces the stored one.
pub async fn handle_translate_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(request): Json<TranslateResumeRequest>,
) -> Result<Json<TranslateResumeResponse>, AppError> {
    let target = request.target_language;

    let document = state
        .documents
        .load(resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

    let translation = translate_document(
        &state.translator,
        &document,
        request.source_language,
        target,
    )
    .await
    .map_err(|e| e.into_app_error(target))?;

    if request.save {
        state.documents.save(resume_id, &translation.document).await?;
        info!("Saved {target} translation of resume {resume_id}");
    }

    Ok(Json(TranslateResumeResponse {
        translation,
        saved: request.save,
    }))
}

/// GET /api/v1/languages
pub async fn handle_list_languages() -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: Language::ALL
            .into_iter()
            .map(|lang| LanguageInfo {
                id: lang,
                code: lang.code(),
                name: lang.name(),
            })
            .collect(),
    })
}
