//! Response normalization
//!
//! Agents return anything from plain strings to deeply nested
//! `content`/`message`/`text` envelopes. This module decodes that mess
//! at the gateway boundary into one tagged result shape using an
//! ordered set of shape-matching rules. Normalization is total: every
//! input maps to exactly one result and never fails.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Depth ceiling for envelope unwrapping. Structures nested deeper
/// than this are stringified verbatim instead of recursed into.
const MAX_UNWRAP_DEPTH: usize = 20;

/// SQL keywords that classify a string response as `sql`.
const SQL_KEYWORDS: &str = "SELECT|INSERT|UPDATE|DELETE|CREATE|ALTER|DROP|WITH|FROM";

fn sql_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"(?i)\b(?:{})\b", SQL_KEYWORDS)).expect("static regex is valid")
    })
}

/// A normalized agent response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NormalizedResult {
    /// A structured JSON object
    Json {
        /// The decoded value
        value: Value,
    },
    /// A response containing SQL
    Sql {
        /// The SQL text, verbatim
        text: String,
    },
    /// A delimited plain-text table
    Table {
        /// The table text, verbatim
        text: String,
    },
    /// A bulleted list
    List {
        /// The list text, verbatim
        text: String,
    },
    /// Plain text
    Text {
        /// The text
        text: String,
    },
    /// Nothing came back
    Empty,
}

impl NormalizedResult {
    /// The tag name, as serialized in the `kind` field.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Json { .. } => "json",
            Self::Sql { .. } => "sql",
            Self::Table { .. } => "table",
            Self::List { .. } => "list",
            Self::Text { .. } => "text",
            Self::Empty => "empty",
        }
    }

    /// Render the result for a chat transcript.
    #[must_use]
    pub fn display_text(&self) -> String {
        match self {
            Self::Json { value } => serde_json::to_string_pretty(value)
                .unwrap_or_else(|e| format!("{}\n\nRaw response: {}", e, value)),
            Self::Sql { text } | Self::Table { text } | Self::List { text } | Self::Text { text } => {
                text.clone()
            }
            Self::Empty => "No response received from the agent.".to_string(),
        }
    }
}

/// Normalize an arbitrary agent response. Total: never fails, every
/// input maps to exactly one result.
#[must_use]
pub fn normalize(raw: &Value) -> NormalizedResult {
    normalize_at(raw, 0)
}

fn normalize_at(raw: &Value, depth: usize) -> NormalizedResult {
    if depth > MAX_UNWRAP_DEPTH {
        return NormalizedResult::Text {
            text: stringify(raw),
        };
    }

    match raw {
        Value::Null => NormalizedResult::Empty,
        Value::String(s) if s.trim().is_empty() => NormalizedResult::Empty,
        Value::String(s) => classify_text(s),
        Value::Array(items) if items.is_empty() => NormalizedResult::Empty,
        Value::Array(items) => {
            let joined = join_parts(items);
            normalize_at(&Value::String(joined), depth + 1)
        }
        Value::Object(map) if map.is_empty() => NormalizedResult::Empty,
        Value::Object(map) => {
            // An envelope mapping gets unwrapped; a plain mapping is a
            // ready structured object from the caller.
            if map.contains_key("content") || map.contains_key("message") || map.contains_key("text")
            {
                unwrap_envelope(raw, depth)
            } else {
                NormalizedResult::Json { value: raw.clone() }
            }
        }
        other => NormalizedResult::Text {
            text: stringify(other),
        },
    }
}

/// Ordered text rules: JSON braces, SQL keywords, delimited table,
/// bullet list, plain text. First match wins.
fn classify_text(s: &str) -> NormalizedResult {
    let trimmed = s.trim();

    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            return NormalizedResult::Json { value };
        }
        // Looked like JSON but wasn't; fall through to the later rules.
    }

    if sql_regex().is_match(trimmed) {
        return NormalizedResult::Sql {
            text: s.to_string(),
        };
    }

    if s.contains('|') && (s.contains("-+-") || s.contains("+---")) {
        return NormalizedResult::Table {
            text: s.to_string(),
        };
    }

    if trimmed.starts_with("- ") || trimmed.starts_with("* ") {
        return NormalizedResult::List {
            text: s.to_string(),
        };
    }

    NormalizedResult::Text {
        text: s.to_string(),
    }
}

/// Unwrap a `content`/`message`/`text` envelope, in that priority.
fn unwrap_envelope(raw: &Value, depth: usize) -> NormalizedResult {
    let map = match raw.as_object() {
        Some(m) => m,
        None => {
            return NormalizedResult::Text {
                text: stringify(raw),
            }
        }
    };

    if let Some(content) = map.get("content") {
        return match content {
            Value::Array(items) => {
                let joined = join_parts(items);
                normalize_at(&Value::String(joined), depth + 1)
            }
            Value::String(s) => normalize_at(&Value::String(s.clone()), depth + 1),
            Value::Object(inner) => {
                if let Some(Value::String(text)) = inner.get("text") {
                    normalize_at(&Value::String(text.clone()), depth + 1)
                } else {
                    NormalizedResult::Text {
                        text: stringify(content),
                    }
                }
            }
            // Unusable content shape: keep the whole envelope visible.
            _ => NormalizedResult::Text {
                text: stringify(raw),
            },
        };
    }

    if let Some(message) = map.get("message") {
        return normalize_at(message, depth + 1);
    }

    if let Some(Value::String(text)) = map.get("text") {
        return NormalizedResult::Text {
            text: text.clone(),
        };
    }

    NormalizedResult::Text {
        text: stringify(raw),
    }
}

/// Join a content sequence into one string: each element contributes
/// its `text` field, its stringified `content` field, or its raw
/// string form, separated by single spaces.
fn join_parts(items: &[Value]) -> String {
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Object(map) => {
                if let Some(Value::String(text)) = map.get("text") {
                    parts.push(text.clone());
                } else if let Some(content) = map.get("content") {
                    parts.push(stringify(content));
                } else {
                    parts.push(stringify(item));
                }
            }
            other => parts.push(stringify(other)),
        }
    }
    parts.join(" ")
}

/// String form of a value: strings verbatim, everything else as
/// compact JSON.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
