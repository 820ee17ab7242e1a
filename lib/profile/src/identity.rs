use crate::fields::{self, first_filled};
use crate::text::coerce_text;
use crate::unwrap::RawProfile;
use serde_json::Value;
use std::path::Path;

/// Resolve the stable candidate id: explicit id field, then profile URL,
/// then the origin's file name without extension.
pub fn resolve_candidate_id(profile: &RawProfile, origin: &str) -> String {
    [fields::CANDIDATE_ID, fields::PROFILE_URL]
        .into_iter()
        .filter_map(|aliases| first_filled(profile, aliases).map(id_text))
        .find(|id| !id.is_empty())
        .unwrap_or_else(|| origin_stem(origin))
}

fn id_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        other => coerce_text(other).trim().to_string(),
    }
}

/// File name of `origin` without its extension, or `origin` itself when it has none.
pub fn origin_stem(origin: &str) -> String {
    Path::new(origin)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| origin.to_string())
}
