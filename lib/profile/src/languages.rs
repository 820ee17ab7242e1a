//! Language proficiency parsing

use crate::fields::{self, first_present};
use crate::text::coerce_text;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MIN_LEVEL: f32 = 0.0;
pub const MAX_LEVEL: f32 = 2.0;

/// Level assumed for a language given without a recognizable proficiency
pub const UNLABELED_LEVEL: f32 = 1.0;

/// Level for a structured entry that has no level field at all
pub const MISSING_LEVEL: f32 = 0.0;

const PROFICIENCY_TABLE: &[(&str, f32)] = &[
    ("native", 2.0),
    ("mother tongue", 2.0),
    ("fluent", 2.0),
    ("advanced", 2.0),
    ("intermediate", 1.0),
    ("basic", 0.0),
];

/// A spoken language and a 0-2 proficiency (0 basic, 1 working, 2 native)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub language: String,
    pub level: f32,
}

impl LanguageEntry {
    pub fn new(language: impl Into<String>, level: f32) -> Self {
        Self {
            language: language.into(),
            level: clamp_level(level),
        }
    }
}

fn clamp_level(level: f32) -> f32 {
    if level.is_finite() {
        level.clamp(MIN_LEVEL, MAX_LEVEL)
    } else {
        UNLABELED_LEVEL
    }
}

/// Numeric text parses directly; known keywords map through the proficiency
/// table; anything else is [`UNLABELED_LEVEL`].
pub fn parse_level_text(text: &str) -> f32 {
    let text = text.trim();
    if let Ok(level) = text.parse::<f32>() {
        if level.is_finite() {
            return clamp_level(level);
        }
    }

    let lowered = text.to_lowercase();
    PROFICIENCY_TABLE
        .iter()
        .find(|(keyword, _)| *keyword == lowered)
        .map(|(_, level)| *level)
        .unwrap_or(UNLABELED_LEVEL)
}

fn parse_level_value(value: &Value) -> f32 {
    match value {
        Value::Number(n) => n.as_f64().map(|l| clamp_level(l as f32)).unwrap_or(UNLABELED_LEVEL),
        Value::Bool(true) => 1.0,
        Value::Bool(false) => 0.0,
        Value::String(s) => parse_level_text(s),
        other => parse_level_text(&coerce_text(other)),
    }
}

/// `"English"`, `"English:2"`, `"English - fluent"`, `"English – native"`
fn parse_language_item(item: &str) -> Option<LanguageEntry> {
    let (name, level) = match item.split_once([':', '-', '–']) {
        Some((name, level)) => (name, parse_level_text(level)),
        None => (item, UNLABELED_LEVEL),
    };

    let name = name.trim();
    (!name.is_empty()).then(|| LanguageEntry::new(name, level))
}

/// Parse a languages field of any supported shape. Entries without a name are dropped.
pub fn parse_languages(value: &Value) -> Vec<LanguageEntry> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(entry) => {
                    let name = first_present(entry, fields::LANGUAGE_NAME)
                        .map(coerce_text)
                        .unwrap_or_default();
                    let name = name.trim();
                    if name.is_empty() {
                        return None;
                    }
                    let level = first_present(entry, fields::LANGUAGE_LEVEL)
                        .map(parse_level_value)
                        .unwrap_or(MISSING_LEVEL);
                    Some(LanguageEntry::new(name, level))
                }
                Value::String(s) => parse_language_item(s),
                _ => None,
            })
            .collect(),
        Value::Object(map) => map
            .iter()
            .filter(|(name, _)| !name.trim().is_empty())
            .map(|(name, level)| {
                let level = match level {
                    Value::Null => UNLABELED_LEVEL,
                    other => parse_level_value(other),
                };
                LanguageEntry::new(name.trim(), level)
            })
            .collect(),
        Value::String(s) => s
            .split([',', '|', ';'])
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| LanguageEntry::new(name, UNLABELED_LEVEL))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structured_list() {
        let langs = parse_languages(&json!([
            {"language": "English", "level": "native"},
            {"name": "French", "proficiency": 1.5},
            {"language": "German"},
            {"language": "Klingon", "level": "conversational"},
            {"level": 2}
        ]));
        assert_eq!(
            langs,
            vec![
                LanguageEntry::new("English", 2.0),
                LanguageEntry::new("French", 1.5),
                LanguageEntry::new("German", MISSING_LEVEL),
                LanguageEntry::new("Klingon", UNLABELED_LEVEL),
            ]
        );
    }

    #[test]
    fn test_map_shape_and_clamping() {
        let langs = parse_languages(&json!({"Spanish": 7, "Italian": "Basic", "Dutch": -1}));
        assert_eq!(
            langs,
            vec![
                LanguageEntry::new("Spanish", 2.0),
                LanguageEntry::new("Italian", 0.0),
                LanguageEntry::new("Dutch", 0.0),
            ]
        );
    }

    #[test]
    fn test_labeled_strings() {
        let langs = parse_languages(&json!(["English:2", "French - intermediate", "Arabic – mother tongue", "Greek"]));
        let levels: Vec<f32> = langs.iter().map(|l| l.level).collect();
        assert_eq!(levels, vec![2.0, 1.0, 2.0, UNLABELED_LEVEL]);
        assert_eq!(langs[2].language, "Arabic");
    }

    #[test]
    fn test_delimited_string() {
        let langs = parse_languages(&json!("English, French | German; "));
        let names: Vec<&str> = langs.iter().map(|l| l.language.as_str()).collect();
        assert_eq!(names, vec!["English", "French", "German"]);
        assert!(langs.iter().all(|l| l.level == UNLABELED_LEVEL));
    }

    #[test]
    fn test_delimited_string_keeps_hyphenated_names() {
        let langs = parse_languages(&json!("Serbo-Croatian, English: 2"));
        assert_eq!(
            langs,
            vec![
                LanguageEntry::new("Serbo-Croatian", UNLABELED_LEVEL),
                LanguageEntry::new("English: 2", UNLABELED_LEVEL),
            ]
        );
    }

    #[test]
    fn test_unsupported_shapes() {
        assert!(parse_languages(&json!(null)).is_empty());
        assert!(parse_languages(&json!(3)).is_empty());
    }

    #[test]
    fn test_level_text() {
        assert_eq!(parse_level_text("FLUENT"), 2.0);
        assert_eq!(parse_level_text(" 0.5 "), 0.5);
        assert_eq!(parse_level_text("nan"), UNLABELED_LEVEL);
        assert_eq!(parse_level_text("who knows"), UNLABELED_LEVEL);
    }
}
