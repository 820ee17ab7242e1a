//! Ordered chain of lenient parsers for profile payloads

use crate::pylit::parse_python_literal;
use serde_json::Value;

/// A single parsing stage: returns `None` when it cannot make sense of the input.
pub type ParseStage = fn(&str) -> Option<Value>;

/// Stages tried in order. The first one that succeeds wins.
pub const PARSE_CHAIN: &[(&str, ParseStage)] = &[
    ("json", parse_json),
    ("python-literal", parse_python_literal),
];

#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Parsed { value: Value, stage: &'static str },
    Unparseable,
}

impl ParseOutcome {
    pub fn into_value(self) -> Option<Value> {
        match self {
            ParseOutcome::Parsed { value, .. } => Some(value),
            ParseOutcome::Unparseable => None,
        }
    }
}

fn parse_json(input: &str) -> Option<Value> {
    serde_json::from_str(input).ok()
}

/// Run `input` through [`PARSE_CHAIN`].
pub fn parse_lenient(input: &str) -> ParseOutcome {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return ParseOutcome::Unparseable;
    }

    PARSE_CHAIN
        .iter()
        .find_map(|&(stage, parse)| parse(trimmed).map(|value| ParseOutcome::Parsed { value, stage }))
        .unwrap_or(ParseOutcome::Unparseable)
}

/// Decode strings that look like an encoded object or list; leave everything else as is.
pub fn decode_embedded(value: &Value) -> Value {
    let Value::String(s) = value else {
        return value.clone();
    };

    let trimmed = s.trim();
    let looks_structured = matches!(trimmed.chars().next(), Some('{' | '['))
        && matches!(trimmed.chars().last(), Some('}' | ']'));
    if !looks_structured {
        return value.clone();
    }

    parse_lenient(trimmed).into_value().unwrap_or_else(|| value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_stage_first() {
        let outcome = parse_lenient(r#"{"id": "a", "ok": true}"#);
        assert_eq!(
            outcome,
            ParseOutcome::Parsed {
                value: json!({"id": "a", "ok": true}),
                stage: "json"
            }
        );
    }

    #[test]
    fn test_python_literal_fallback() {
        let outcome = parse_lenient("{'id': 'a', 'ok': True}");
        assert_eq!(
            outcome,
            ParseOutcome::Parsed {
                value: json!({"id": "a", "ok": true}),
                stage: "python-literal"
            }
        );
    }

    #[test]
    fn test_unparseable_is_typed() {
        assert_eq!(parse_lenient("{not: valid"), ParseOutcome::Unparseable);
        assert_eq!(parse_lenient("   "), ParseOutcome::Unparseable);
    }

    #[test]
    fn test_decode_embedded_only_touches_structured_strings() {
        assert_eq!(decode_embedded(&json!("{'a': 1}")), json!({"a": 1}));
        assert_eq!(decode_embedded(&json!("[1, 2]")), json!([1, 2]));
        assert_eq!(decode_embedded(&json!("plain text")), json!("plain text"));
        assert_eq!(decode_embedded(&json!("{broken")), json!("{broken"));
        assert_eq!(decode_embedded(&json!(5)), json!(5));
    }
}
