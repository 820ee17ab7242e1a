//! Text cleanup and best-effort coercion of JSON values into text

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

struct TextCleaner {
    html_tag: Regex,
    whitespace: Regex,
}

impl TextCleaner {
    fn new() -> Self {
        Self {
            html_tag: Regex::new(r"<[^>]+>").expect("Invalid HTML tag regex"),
            whitespace: Regex::new(r"\s+").expect("Invalid whitespace regex"),
        }
    }
}

fn cleaner() -> &'static TextCleaner {
    static CLEANER: OnceLock<TextCleaner> = OnceLock::new();
    CLEANER.get_or_init(TextCleaner::new)
}

/// Strip HTML tags and collapse runs of whitespace into single spaces.
pub fn normalize_text(text: &str) -> String {
    let cleaner = cleaner();
    let stripped = cleaner.html_tag.replace_all(text.trim(), " ");
    cleaner.whitespace.replace_all(&stripped, " ").trim().to_string()
}

/// Render any JSON value as plain text.
///
/// Arrays join with `", "`, objects render as `key: value` pairs and null is empty.
pub fn coerce_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(coerce_text)
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (k, coerce_text(v)))
            .filter(|(_, v)| !v.trim().is_empty())
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Whether a value carries content: not null, not a blank string, not an empty container.
pub fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}
