//! Whole-document translation: picks the translatable sections out of a stored
//! résumé, runs them through the pipeline and merges the result back.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::translation::content::ContentNode;
use crate::translation::errors::TranslationError;
use crate::translation::language::{Language, SourceLanguage};
use crate::translation::pipeline::Translator;
use crate::translation::sections::{
    SectionKey, SectionNameSet, CUSTOM_SECTION_NAMES_KEY, SECTION_NAMES_KEY,
};

#[derive(Debug, Clone, Serialize)]
pub struct TranslationMetadata {
    pub source_language: SourceLanguage,
    pub target_language: Language,
    pub translated_at: DateTime<Utc>,
    pub sections_translated: Vec<String>,
    /// Section keys present on the document, including empty ones that were skipped.
    pub total_sections: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslatedDocument {
    pub document: ContentNode,
    pub metadata: TranslationMetadata,
}

/// Root entries that go to the generator: non-empty canonical sections plus the
/// section-label map. Ids, template settings and caller overrides stay behind.
pub fn extract_translatable(document: &ContentNode) -> Result<ContentNode, TranslationError> {
    let ContentNode::Map(entries) = document else {
        return Err(TranslationError::InvalidInput(
            "document must be a JSON object".to_string(),
        ));
    };

    let sections: Vec<(String, ContentNode)> = entries
        .iter()
        .filter(|(key, value)| SectionKey::from_key(key).is_some() && value.has_text())
        .cloned()
        .collect();

    if sections.is_empty() {
        return Err(TranslationError::InvalidInput(
            "document has no translatable sections".to_string(),
        ));
    }

    let mut subset = ContentNode::Map(sections);
    if let Some(labels) = document.get(SECTION_NAMES_KEY) {
        subset.insert(SECTION_NAMES_KEY, labels.clone());
    }
    Ok(subset)
}

/// Replaces translated sections in a copy of `original` and sets the final labels.
pub fn merge_translation(
    original: &ContentNode,
    translated: &ContentNode,
    section_names: &SectionNameSet,
) -> ContentNode {
    let mut merged = original.clone();
    if let ContentNode::Map(entries) = translated {
        for (key, value) in entries {
            merged.insert(key, value.clone());
        }
    }
    merged.insert(SECTION_NAMES_KEY, section_names.to_node());
    merged
}

pub async fn translate_document(
    translator: &Translator,
    document: &ContentNode,
    source: SourceLanguage,
    target: Language,
) -> Result<TranslatedDocument, TranslationError> {
    let subset = extract_translatable(document)?;
    let overrides = document.get(CUSTOM_SECTION_NAMES_KEY);

    let outcome = translator.translate(&subset, source, target, overrides).await?;

    let sections_translated: Vec<String> = outcome
        .content
        .keys()
        .into_iter()
        .filter(|key| SectionKey::from_key(key).is_some())
        .map(str::to_string)
        .collect();
    let total_sections = document
        .keys()
        .into_iter()
        .filter(|key| SectionKey::from_key(key).is_some())
        .count();

    info!(
        "Translated {}/{} sections into {target}",
        sections_translated.len(),
        total_sections
    );

    Ok(TranslatedDocument {
        document: merge_translation(document, &outcome.content, &outcome.section_names),
        metadata: TranslationMetadata {
            source_language: source,
            target_language: target,
            translated_at: Utc::now(),
            sections_translated,
            total_sections,
        },
    })
}
