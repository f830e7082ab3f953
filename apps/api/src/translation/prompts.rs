// Prompt constants for résumé translation.
// The JSON-only system prompt lives in llm_client::prompts and is sent with every call.

use crate::translation::content::ContentNode;
use crate::translation::language::{Language, SourceLanguage};
use crate::translation::placeholders::PLACEHOLDER_PREFIX;
use crate::translation::sections::{SectionKey, SECTION_NAMES_KEY};

/// Translation prompt template.
/// Replace: {source_language}, {target_language}, {placeholder_prefix},
///          {section_names_key}, {glossary}, {content_json}
pub const TRANSLATION_PROMPT_TEMPLATE: &str = r#"Translate the résumé JSON below from {source_language} into {target_language}.

HARD RULES:
1. Do NOT change contact details: names, e-mail addresses, phone numbers, URLs, usernames and street addresses stay exactly as written
2. Do NOT change dates or date ranges in any way — copy them character for character
3. Every token that starts with {placeholder_prefix} MUST appear in your output exactly as it appears in the input — same spelling, same underscores, same number
4. Translate ONLY human-readable text: job titles, descriptions, summaries, degree names, skill descriptions and section labels
5. Do NOT translate values that are category or type tags (for example "type", "level", "category" codes) — keep them identical
6. Keep the document shape EXACTLY: the same keys, the same nesting, the same number of items in every array — never add, drop or rename a field
7. Translate the labels under "{section_names_key}" using the glossary below when a key matches
8. Return ONLY the translated JSON object — no explanations, no comments, no markdown

LINK PRESERVATION EXAMPLE:
Input:  {"email": "jane@example.com", "summary": "Portfolio at janedoe.dev, code on github.com/jane"}
Output: {"email": "jane@example.com", "summary": "<summary translated into {target_language}, still containing janedoe.dev and github.com/jane unchanged>"}

PLACEHOLDER PRESERVATION EXAMPLE:
Input:  {"description": "Built the company site __LINK_PLACEHOLDER_3__ with React"}
Output: {"description": "<description translated into {target_language}, still containing __LINK_PLACEHOLDER_3__ unchanged>"}
WRONG:  {"description": "... __LINK_PLACEHOLDER_ 3__ ..."}   (token altered)
WRONG:  {"description": "... link placeholder 3 ..."}         (token translated)

SECTION LABEL GLOSSARY for {target_language} (use these exact labels):
{glossary}

RÉSUMÉ JSON:
{content_json}"#;

/// Renders the full translation instruction for one attempt.
pub fn build_translation_prompt(
    content: &ContentNode,
    source: SourceLanguage,
    target: Language,
) -> String {
    TRANSLATION_PROMPT_TEMPLATE
        .replace("{source_language}", &source.prompt_label())
        .replace("{target_language}", target.name())
        .replace("{placeholder_prefix}", PLACEHOLDER_PREFIX)
        .replace("{section_names_key}", SECTION_NAMES_KEY)
        .replace("{glossary}", &section_glossary(target))
        // content last so that braces inside it are never mistaken for slots
        .replace("{content_json}", &content.to_pretty_string())
}

fn section_glossary(target: Language) -> String {
    SectionKey::ALL
        .iter()
        .map(|key| format!("- {}: \"{}\"", key.as_str(), key.default_label(target)))
        .collect::<Vec<_>>()
        .join("\n")
}
