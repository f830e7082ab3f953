//! Turns raw generator text into a parsed content tree.
//!
//! Steps: strip code fences → slice from the first `{` to the last `}` →
//! light syntax repair → parse → check that every placeholder token survived.
//! Missing tokens are logged, not fatal.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::translation::content::ContentNode;
use crate::translation::errors::TranslationError;
use crate::translation::placeholders::PlaceholderMap;

// A fence on its own line, or at the very start or end of the response.
static FENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)(?:^[ \t]*```[A-Za-z0-9_-]*[ \t]*$)|(?:\A\s*```[A-Za-z0-9_-]*)|(?:```\s*\z)")
        .expect("Invalid fence regex")
});

static TRAILING_COMMA_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",(\s*[}\]])").expect("Invalid trailing comma regex"));

static BLANK_LINES_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").expect("Invalid blank line regex"));

/// A parsed generator response, plus any placeholder tokens it lost.
#[derive(Debug, Clone)]
pub struct ValidatedPayload {
    pub content: ContentNode,
    pub missing_placeholders: Vec<String>,
}

pub fn sanitize_response(
    raw: &str,
    placeholders: &PlaceholderMap,
) -> Result<ValidatedPayload, TranslationError> {
    let unfenced = strip_code_fences(raw);
    let sliced = extract_object(&unfenced).ok_or(TranslationError::NoStructuredPayload)?;
    let repaired = repair_json(sliced);

    debug!(
        "Sanitized response: {} raw bytes → {} repaired bytes",
        raw.len(),
        repaired.len()
    );

    let content = parse_content(&repaired)?;

    let missing_placeholders = placeholders.missing_in(&content.to_string());
    if !missing_placeholders.is_empty() {
        let mismatch = TranslationError::PlaceholderMismatch {
            missing: missing_placeholders.clone(),
        };
        warn!("{mismatch}; restoring the rest");
    }

    Ok(ValidatedPayload {
        content,
        missing_placeholders,
    })
}

/// Removes markdown code fence markers around the payload. Backticks inside
/// string values are left alone.
fn strip_code_fences(text: &str) -> String {
    FENCE_REGEX.replace_all(text, "").trim().to_string()
}

/// Slice between the first `{` and the last `}`, inclusive.
fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Drops trailing commas before `}`/`]` and collapses runs of blank lines.
fn repair_json(text: &str) -> String {
    let without_commas = TRAILING_COMMA_REGEX.replace_all(text, "$1");
    BLANK_LINES_REGEX
        .replace_all(&without_commas, "\n\n")
        .into_owned()
}

fn parse_content(text: &str) -> Result<ContentNode, TranslationError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| TranslationError::MalformedPayload(e.to_string()))?;
    if !value.is_object() {
        return Err(TranslationError::MalformedPayload(
            "top-level value is not an object".to_string(),
        ));
    }
    Ok(ContentNode::from(value))
}
