//! Placeholder codec — hides links, e-mail addresses and domains from the generator
//! behind opaque tokens, and puts them back afterwards.
//!
//! Tokens look like `__LINK_PLACEHOLDER_<n>__`. `n` counts matches across the whole
//! tree for one `protect` call, starting at 0. Repeated source strings get separate
//! tokens so restoration follows order of occurrence.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use crate::translation::content::ContentNode;

pub const PLACEHOLDER_PREFIX: &str = "__LINK_PLACEHOLDER_";
const PLACEHOLDER_SUFFIX: &str = "__";

/// Characters that end a sentence rather than a link.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}', '\'', '"'];

struct LinkPattern {
    name: &'static str,
    regex: Regex,
}

// Priority order: most specific first. An e-mail must be claimed before the bare
// domain pattern sees its host part.
static LINK_PATTERNS: Lazy<Vec<LinkPattern>> = Lazy::new(|| {
    [
        ("url", r#"(?i)\b(?:https?|ftp)://[^\s<>"'`]+"#),
        ("www", r#"(?i)\bwww\.[a-z0-9-]+(?:\.[a-z0-9-]+)+(?:/[^\s<>"'`]*)?"#),
        (
            "social_path",
            r#"(?i)\b(?:linkedin\.com|github\.com|gitlab\.com|bitbucket\.org|behance\.net|dribbble\.com|medium\.com|twitter\.com|x\.com|stackoverflow\.com|kaggle\.com)/[^\s<>"'`]+"#,
        ),
        ("email", r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b"),
        (
            "domain",
            r#"(?i)\b[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)*\.(?:com|org|net|io|dev|app|ai|co|me|info|edu|gov|az|ru|tr|de|fr|es|uk|us)\b(?:/[^\s<>"'`]*)?"#,
        ),
    ]
    .into_iter()
    .map(|(name, pattern)| LinkPattern {
        name,
        regex: Regex::new(pattern).expect("Invalid link pattern"),
    })
    .collect()
});

static TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__LINK_PLACEHOLDER_\d+__").expect("Invalid placeholder regex"));

/// Token → original substring, in the order tokens were minted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderMap {
    entries: Vec<(String, String)>,
}

impl PlaceholderMap {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(token, _)| token.as_str())
    }

    pub fn original(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, original)| original.as_str())
    }

    /// Tokens that do not occur verbatim in `text`.
    pub fn missing_in(&self, text: &str) -> Vec<String> {
        self.tokens()
            .filter(|token| !text.contains(token))
            .map(str::to_string)
            .collect()
    }
}

/// Output of `protect`: the tree with tokens substituted, and how to undo it.
#[derive(Debug, Clone)]
pub struct Protected {
    pub content: ContentNode,
    pub placeholders: PlaceholderMap,
}

/// Replaces every protectable substring in the tree with a fresh token.
pub fn protect(content: &ContentNode) -> Protected {
    let mut minter = TokenMinter::default();
    let content = content.map_scalars(&mut |_, text| minter.protect_text(text));

    debug!("Protected {} non-translatable substrings", minter.map.len());

    Protected {
        content,
        placeholders: minter.map,
    }
}

/// Puts original substrings back in place of their tokens. Tokens unknown to the
/// map are left as they are.
pub fn restore(content: &ContentNode, placeholders: &PlaceholderMap) -> ContentNode {
    if placeholders.is_empty() {
        return content.clone();
    }

    let lookup: HashMap<&str, &str> = placeholders
        .entries
        .iter()
        .map(|(token, original)| (token.as_str(), original.as_str()))
        .collect();

    content.map_scalars(&mut |_, text| restore_text(text, &lookup))
}

fn restore_text(text: &str, lookup: &HashMap<&str, &str>) -> String {
    if !text.contains(PLACEHOLDER_PREFIX) {
        return text.to_string();
    }
    TOKEN_REGEX
        .replace_all(text, |caps: &Captures<'_>| {
            let token = &caps[0];
            lookup.get(token).copied().unwrap_or(token).to_string()
        })
        .into_owned()
}

#[derive(Default)]
struct TokenMinter {
    next_index: usize,
    map: PlaceholderMap,
}

impl TokenMinter {
    fn protect_text(&mut self, text: &str) -> String {
        LINK_PATTERNS
            .iter()
            .fold(text.to_string(), |current, pattern| {
                self.replace_matches(&current, pattern)
            })
    }

    fn replace_matches(&mut self, text: &str, pattern: &LinkPattern) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;

        for found in pattern.regex.find_iter(text) {
            let candidate = found.as_str().trim_end_matches(TRAILING_PUNCTUATION);
            if candidate.is_empty() || candidate.contains(PLACEHOLDER_PREFIX) {
                continue;
            }
            out.push_str(&text[last..found.start()]);
            out.push_str(&self.mint(candidate, pattern.name));
            last = found.start() + candidate.len();
        }

        out.push_str(&text[last..]);
        out
    }

    fn mint(&mut self, original: &str, kind: &str) -> String {
        let token = format!("{PLACEHOLDER_PREFIX}{}{PLACEHOLDER_SUFFIX}", self.next_index);
        self.next_index += 1;
        debug!("Minted {token} for {kind}");
        self.map
            .entries
            .push((token.clone(), original.to_string()));
        token
    }
}
