//! The recursive scalar/list/map tree for the résumé subset
//! that travels through the translation pipeline.
//!
//! Only scalar leaves ever change during translation. Map key sets and list lengths
//! must survive untouched; `shape_mismatch` is the check for that.

use std::collections::HashSet;
use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// A node of the content tree. Maps keep their insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub enum ContentNode {
    Scalar(String),
    List(Vec<ContentNode>),
    Map(Vec<(String, ContentNode)>),
}

impl ContentNode {
    pub fn scalar(text: impl Into<String>) -> Self {
        ContentNode::Scalar(text.into())
    }

    pub fn empty_map() -> Self {
        ContentNode::Map(Vec::new())
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            ContentNode::Scalar(text) => Some(text),
            _ => None,
        }
    }

    /// Looks up a direct child of a map node.
    pub fn get(&self, key: &str) -> Option<&ContentNode> {
        match self {
            ContentNode::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Keys of a map node, in order. Empty for scalars and lists.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            ContentNode::Map(entries) => entries.iter().map(|(k, _)| k.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    /// Inserts or replaces a child of a map node. No-op on scalars and lists.
    pub fn insert(&mut self, key: &str, value: ContentNode) {
        if let ContentNode::Map(entries) = self {
            match entries.iter_mut().find(|(k, _)| k == key) {
                Some((_, existing)) => *existing = value,
                None => entries.push((key.to_string(), value)),
            }
        }
    }

    /// Removes a child of a map node and returns it.
    pub fn remove(&mut self, key: &str) -> Option<ContentNode> {
        match self {
            ContentNode::Map(entries) => {
                let index = entries.iter().position(|(k, _)| k == key)?;
                Some(entries.remove(index).1)
            }
            _ => None,
        }
    }

    /// True when at least one scalar below this node holds non-blank text.
    pub fn has_text(&self) -> bool {
        match self {
            ContentNode::Scalar(text) => !text.trim().is_empty(),
            ContentNode::List(items) => items.iter().any(ContentNode::has_text),
            ContentNode::Map(entries) => entries.iter().any(|(_, v)| v.has_text()),
        }
    }

    /// Rebuilds the tree, passing every scalar through `transform`.
    ///
    /// The transform also receives the nearest enclosing map key, so list items
    /// under `"dates": [...]` see `Some("dates")`. Root-level scalars see `None`.
    pub fn map_scalars<F>(&self, transform: &mut F) -> ContentNode
    where
        F: FnMut(Option<&str>, &str) -> String,
    {
        self.fold(None, transform)
    }

    fn fold<F>(&self, key: Option<&str>, transform: &mut F) -> ContentNode
    where
        F: FnMut(Option<&str>, &str) -> String,
    {
        match self {
            ContentNode::Scalar(text) => ContentNode::Scalar(transform(key, text)),
            ContentNode::List(items) => {
                ContentNode::List(items.iter().map(|item| item.fold(key, transform)).collect())
            }
            ContentNode::Map(entries) => ContentNode::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.fold(Some(k.as_str()), transform)))
                    .collect(),
            ),
        }
    }

    /// Returns the path of the first structural difference between two trees,
    /// or `None` when map key sets and list lengths agree at every depth.
    pub fn shape_mismatch(&self, other: &ContentNode) -> Option<String> {
        shape_diff(self, other, "$")
    }

    pub fn to_json(&self) -> Value {
        Value::from(self)
    }

    /// Indented JSON, used when embedding the tree in a prompt.
    pub fn to_pretty_string(&self) -> String {
        format!("{:#}", self.to_json())
    }
}

fn shape_diff(expected: &ContentNode, actual: &ContentNode, path: &str) -> Option<String> {
    match (expected, actual) {
        (ContentNode::Scalar(_), ContentNode::Scalar(_)) => None,
        (ContentNode::List(a), ContentNode::List(b)) => {
            if a.len() != b.len() {
                return Some(format!("{path}: expected {} items, got {}", a.len(), b.len()));
            }
            a.iter()
                .zip(b)
                .enumerate()
                .find_map(|(i, (x, y))| shape_diff(x, y, &format!("{path}[{i}]")))
        }
        (ContentNode::Map(a), ContentNode::Map(_)) => {
            let expected_keys: HashSet<&str> = expected.keys().into_iter().collect();
            let actual_keys: HashSet<&str> = actual.keys().into_iter().collect();
            if expected_keys != actual_keys {
                let mut missing: Vec<_> = expected_keys.difference(&actual_keys).collect();
                let mut extra: Vec<_> = actual_keys.difference(&expected_keys).collect();
                missing.sort();
                extra.sort();
                return Some(format!("{path}: missing keys {missing:?}, unexpected keys {extra:?}"));
            }
            a.iter().find_map(|(key, child)| {
                let other = actual.get(key)?;
                shape_diff(child, other, &format!("{path}.{key}"))
            })
        }
        _ => Some(format!("{path}: node kind changed")),
    }
}

impl From<Value> for ContentNode {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ContentNode::Scalar(String::new()),
            Value::Bool(b) => ContentNode::Scalar(b.to_string()),
            Value::Number(n) => ContentNode::Scalar(n.to_string()),
            Value::String(s) => ContentNode::Scalar(s),
            Value::Array(items) => ContentNode::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                ContentNode::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&ContentNode> for Value {
    fn from(node: &ContentNode) -> Self {
        match node {
            ContentNode::Scalar(text) => Value::String(text.clone()),
            ContentNode::List(items) => Value::Array(items.iter().map(Value::from).collect()),
            ContentNode::Map(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for ContentNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ContentNode::Scalar(text) => serializer.serialize_str(text),
            ContentNode::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ContentNode::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

/// Compact JSON form. This is the "serialized form" placeholder checks search.
impl fmt::Display for ContentNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
