//! Section flattening: turn arbitrarily shaped section values into text.

use crate::fields::{self, first_filled, first_present, Aliases};
use crate::text::{coerce_text, is_filled};
use serde_json::{Map, Value};

const FIELD_SEPARATOR: &str = " | ";
const SKILL_SEPARATOR: &str = "; ";

const EXPERIENCE_LINE: [Aliases; 6] = [
    fields::ROLE,
    fields::COMPANY,
    fields::EXPERIENCE_PERIOD,
    fields::LOCATION,
    fields::ENTRY_SKILLS,
    fields::EXPERIENCE_DESCRIPTION,
];

const EDUCATION_LINE: [Aliases; 5] = [
    fields::INSTITUTION,
    fields::FIELD_OF_STUDY,
    fields::EDUCATION_PERIOD,
    fields::GRADE,
    fields::EDUCATION_DESCRIPTION,
];

/// Join the non-empty canonical parts of an entry with `" | "`.
fn render_line(entry: &Map<String, Value>, layout: &[Aliases]) -> String {
    layout
        .iter()
        .filter_map(|&aliases| first_present(entry, aliases))
        .map(|value| coerce_text(value).trim().to_string())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR)
}

/// One line per experience entry, in source order.
pub fn flatten_experience(value: &Value) -> Vec<String> {
    let mut lines = Vec::new();
    collect_experience(value, &mut lines);
    lines
}

fn collect_experience(value: &Value, out: &mut Vec<String>) {
    if !is_filled(value) {
        return;
    }

    match value {
        Value::Object(map) => {
            if let Some(items) = first_filled(map, fields::EXPERIENCE_ITEMS) {
                return collect_experience(items, out);
            }
            // keyed by company, date range, ...
            for nested in map.values() {
                if matches!(nested, Value::Array(_) | Value::Object(_) | Value::String(_)) {
                    collect_experience(nested, out);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                let line = match item {
                    Value::Object(entry) => render_line(entry, &EXPERIENCE_LINE),
                    other => coerce_text(other).trim().to_string(),
                };
                if !line.is_empty() {
                    out.push(line);
                }
            }
        }
        other => {
            let line = coerce_text(other).trim().to_string();
            if !line.is_empty() {
                out.push(line);
            }
        }
    }
}

/// All education entries as one newline-joined block.
pub fn flatten_education(value: &Value) -> String {
    if !is_filled(value) {
        return String::new();
    }

    let entries: Vec<&Value> = match value {
        Value::Object(map) => {
            if let Some(items) = first_filled(map, fields::EDUCATION_ITEMS) {
                return flatten_education(items);
            }
            vec![value]
        }
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    entries
        .into_iter()
        .map(|entry| match entry {
            Value::Object(map) => render_line(map, &EDUCATION_LINE),
            other => coerce_text(other).trim().to_string(),
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Skills as a single `"; "`-joined string.
///
/// A flat `{skill: level}` map renders as `skill:level` pairs; a map of
/// categories flattens its nested lists.
pub fn flatten_skills(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => join_skills(items.iter().map(coerce_text)),
        Value::Object(map) => {
            let all_scalar = map
                .values()
                .all(|v| matches!(v, Value::String(_) | Value::Number(_) | Value::Bool(_)));
            if all_scalar {
                return join_skills(map.iter().map(|(k, v)| format!("{}:{}", k, coerce_text(v))));
            }

            join_skills(map.values().flat_map(|v| match v {
                Value::Array(items) => items.iter().map(coerce_text).collect::<Vec<_>>(),
                other => vec![coerce_text(other)],
            }))
        }
        other => coerce_text(other),
    }
}

fn join_skills<I: Iterator<Item = String>>(parts: I) -> String {
    parts
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(SKILL_SEPARATOR)
}
