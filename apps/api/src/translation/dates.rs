//! Rewrites month names left in the source language.
//!
//! The generator is told not to touch dates, so "March 2020" survives translation
//! verbatim. Every source/universal month name is replaced with the target's, as a
//! whole word. Month names that are also common words ("may") are only replaced in
//! free text when a year follows them; under date-like keys they always are.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::translation::content::ContentNode;
use crate::translation::language::{Language, SourceLanguage};

/// Month names that double as ordinary words. Lowercase.
const AMBIGUOUS_MONTH_NAMES: &[&str] = &["may"];

struct MonthPattern {
    index: usize,
    /// Also an ordinary word; free text needs a year after it.
    ambiguous: bool,
    /// The month name on its own.
    bare: Regex,
    /// The month name followed by an optional day and a four-digit year.
    dated: Regex,
}

static MONTH_TABLES: Lazy<Vec<(Language, Vec<MonthPattern>)>> = Lazy::new(|| {
    Language::ALL
        .into_iter()
        .map(|lang| {
            let patterns = lang
                .month_names()
                .iter()
                .enumerate()
                .map(|(index, name)| {
                    let ambiguous = AMBIGUOUS_MONTH_NAMES.contains(&name.to_lowercase().as_str());
                    let name = regex::escape(name);
                    MonthPattern {
                        index,
                        ambiguous,
                        bare: Regex::new(&format!(r"(?i)\b{name}\b")).expect("Invalid month regex"),
                        dated: Regex::new(&format!(
                            r"(?i)\b{name}\b(\.?,?\s+(?:\d{{1,2}},?\s+)?\d{{4}}\b)"
                        ))
                        .expect("Invalid month regex"),
                    }
                })
                .collect();
            (lang, patterns)
        })
        .collect()
});

/// True for keys whose values are dates or date ranges.
pub fn is_date_key(key: &str) -> bool {
    if key == "startDate" || key == "endDate" {
        return true;
    }
    let key = key.to_lowercase();
    key.contains("date") || key.contains("duration") || key.contains("period")
}

/// Replaces source-language (and universal-language) month names with the
/// target's throughout the tree. Idempotent.
pub fn localize_dates(content: &ContentNode, source: SourceLanguage, target: Language) -> ContentNode {
    let tables = tables_for(source, target);
    if tables.is_empty() {
        return content.clone();
    }
    let target_names = target.month_names();

    content.map_scalars(&mut |key, text| {
        if key.is_some_and(is_date_key) {
            replace_bare(text, &tables, target_names)
        } else {
            replace_free_text(text, &tables, target_names)
        }
    })
}

/// Month tables to translate from. The target's own table is never included,
/// which is what makes a second pass a no-op.
fn tables_for(source: SourceLanguage, target: Language) -> Vec<&'static [MonthPattern]> {
    let languages: Vec<Language> = match source {
        SourceLanguage::Known(lang) => vec![lang, Language::UNIVERSAL],
        SourceLanguage::Auto => Language::ALL.to_vec(),
    };

    let mut selected: Vec<Language> = Vec::new();
    for lang in languages {
        if lang != target && !selected.contains(&lang) {
            selected.push(lang);
        }
    }

    MONTH_TABLES
        .iter()
        .filter(|(lang, _)| selected.contains(lang))
        .map(|(_, patterns)| patterns.as_slice())
        .collect()
}

fn replace_bare(text: &str, tables: &[&[MonthPattern]], target_names: &[&str; 12]) -> String {
    let mut current = text.to_string();
    for pattern in tables.iter().flat_map(|table| table.iter()) {
        let replacement = target_names[pattern.index];
        if pattern.bare.is_match(&current) {
            current = pattern
                .bare
                .replace_all(&current, |_: &Captures<'_>| replacement.to_string())
                .into_owned();
        }
    }
    current
}

/// Bare month names, except ambiguous ones, which need a year after them.
fn replace_free_text(text: &str, tables: &[&[MonthPattern]], target_names: &[&str; 12]) -> String {
    let mut current = text.to_string();
    for pattern in tables.iter().flat_map(|table| table.iter()) {
        let replacement = target_names[pattern.index];
        let regex = if pattern.ambiguous { &pattern.dated } else { &pattern.bare };
        if regex.is_match(&current) {
            current = regex
                .replace_all(&current, |caps: &Captures<'_>| {
                    let rest = caps.get(1).map_or("", |m| m.as_str());
                    format!("{replacement}{rest}")
                })
                .into_owned();
        }
    }
    current
}
