//! Shared types for the finlit glossary and content tooling.
//!
//! The glossary side is built around [`GlossaryTerm`] (one financial concept
//! with several description variants) and [`TextSegment`], a borrowed slice
//! of display text that may be linked to a term. Lesson content arrives as
//! loosely shaped JSON; [`ContentNode`] classifies it once at the boundary so
//! downstream walks can `match` exhaustively instead of sniffing object shapes.
//!
//! ```rust
//! use finlit_types::{ContentNode, KnowledgeLevel};
//! use serde_json::json;
//!
//! let node = ContentNode::from(&json!({ "type": "term", "termId": "t1", "text": "APR" }));
//! assert!(matches!(node, ContentNode::TermRef { .. }));
//! assert_eq!(KnowledgeLevel::from_preference("Beginner"), KnowledgeLevel::Beginner);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One glossary entry. Ids are stable across locales.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryTerm {
    pub id: String,
    pub term: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simple: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learn_more_url: Option<String>,
}

impl GlossaryTerm {
    /// Minimal constructor; description variants default to empty.
    pub fn new(id: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            term: term.into(),
            aliases: Vec::new(),
            definition: String::new(),
            simple: None,
            advanced: None,
            example: None,
            learn_more_url: None,
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = definition.into();
        self
    }

    /// `definition` is required by the glossary format but defaults to empty
    /// when absent; loaders warn about terms where this returns `false`.
    pub fn has_definition(&self) -> bool {
        !self.definition.trim().is_empty()
    }

    /// Pick the description matching a learner's knowledge level.
    ///
    /// Missing or blank variants fall back to `definition`.
    pub fn description_for(&self, level: KnowledgeLevel) -> &str {
        let variant = match level {
            KnowledgeLevel::Beginner => self.simple.as_deref(),
            KnowledgeLevel::Intermediate => None,
            KnowledgeLevel::Advanced => self.advanced.as_deref(),
        };
        variant
            .filter(|text| !text.trim().is_empty())
            .unwrap_or(self.definition.as_str())
    }
}

/// Self-reported familiarity with personal finance.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl KnowledgeLevel {
    /// Parse a stored preference; anything unrecognised is `Intermediate`.
    pub fn from_preference(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "beginner" | "novice" | "new" => KnowledgeLevel::Beginner,
            "advanced" | "expert" => KnowledgeLevel::Advanced,
            _ => KnowledgeLevel::Intermediate,
        }
    }
}

impl fmt::Display for KnowledgeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KnowledgeLevel::Beginner => "beginner",
            KnowledgeLevel::Intermediate => "intermediate",
            KnowledgeLevel::Advanced => "advanced",
        })
    }
}

/// A contiguous piece of display text, optionally linked to a term.
///
/// `text` borrows from the input string; segments concatenated in order
/// reproduce it exactly.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct TextSegment<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<&'a GlossaryTerm>,
}

impl<'a> TextSegment<'a> {
    pub fn plain(text: &'a str) -> Self {
        Self { text, term: None }
    }

    pub fn linked(text: &'a str, term: &'a GlossaryTerm) -> Self {
        Self {
            text,
            term: Some(term),
        }
    }

    pub fn term_id(&self) -> Option<&'a str> {
        self.term.map(|t| t.id.as_str())
    }
}

/// Lesson content classified by shape.
///
/// Decoding rules for JSON objects, in order:
/// - `type: "term"`, or a string `termId` / `termKey` field: [`ContentNode::TermRef`]
///   (display text read from `text`).
/// - `type: "text"` with a string `text` field: [`ContentNode::Text`].
/// - anything else: [`ContentNode::Object`], keys in source order.
///
/// Strings and numbers become [`ContentNode::Leaf`]; null and booleans carry
/// no prose and become [`ContentNode::Empty`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum ContentNode {
    Empty,
    Leaf(String),
    TermRef {
        term_id: Option<String>,
        term_key: Option<String>,
        text: Option<String>,
    },
    Text(String),
    Array(Vec<ContentNode>),
    Object(Vec<(String, ContentNode)>),
}

impl From<&Value> for ContentNode {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null | Value::Bool(_) => ContentNode::Empty,
            Value::Number(n) => ContentNode::Leaf(n.to_string()),
            Value::String(s) => ContentNode::Leaf(s.clone()),
            Value::Array(items) => ContentNode::Array(items.iter().map(ContentNode::from).collect()),
            Value::Object(map) => classify_object(map),
        }
    }
}

impl From<Value> for ContentNode {
    fn from(value: Value) -> Self {
        ContentNode::from(&value)
    }
}

fn classify_object(map: &Map<String, Value>) -> ContentNode {
    let tag = map.get("type").and_then(Value::as_str);
    let term_id = string_field(map, "termId");
    let term_key = string_field(map, "termKey");

    if tag == Some("term") || term_id.is_some() || term_key.is_some() {
        return ContentNode::TermRef {
            term_id,
            term_key,
            text: string_field(map, "text"),
        };
    }

    if tag == Some("text")
        && let Some(text) = string_field(map, "text")
    {
        return ContentNode::Text(text);
    }

    ContentNode::Object(
        map.iter()
            .map(|(key, value)| (key.clone(), ContentNode::from(value)))
            .collect(),
    )
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}
