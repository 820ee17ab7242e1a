//! Extraction of profile objects from the wrapper shapes scrapers emit

use crate::fields;
use crate::parse::decode_embedded;
use serde_json::{Map, Value};

pub type RawProfile = Map<String, Value>;

const MAX_DEPTH: usize = 16;

/// The input shapes understood by [`extract_profiles`]
#[derive(Debug)]
pub enum BlobShape<'a> {
    /// `{"results": [...]}`
    ResultList(&'a [Value]),
    /// `{"result": {...}}` or `{"result": "<encoded object>"}`
    ResultSingle(&'a Map<String, Value>, &'a Value),
    /// Any other object is taken to be a profile
    Profile(&'a Map<String, Value>),
    List(&'a [Value]),
    Encoded,
    Scalar,
}

impl<'a> BlobShape<'a> {
    pub fn classify(blob: &'a Value) -> Self {
        match blob {
            Value::Object(map) => match (map.get(fields::RESULT_LIST), map.get(fields::RESULT_SINGLE)) {
                (Some(Value::Array(items)), _) => BlobShape::ResultList(items),
                (_, Some(inner)) => BlobShape::ResultSingle(map, inner),
                _ => BlobShape::Profile(map),
            },
            Value::Array(items) => BlobShape::List(items),
            Value::String(_) => BlobShape::Encoded,
            _ => BlobShape::Scalar,
        }
    }
}

/// Every profile object reachable from `blob`, in document order.
pub fn extract_profiles(blob: &Value) -> Vec<RawProfile> {
    let mut out = Vec::new();
    extract_into(blob, 0, &mut out);
    out
}

fn extract_into(blob: &Value, depth: usize, out: &mut Vec<RawProfile>) {
    if depth > MAX_DEPTH {
        return;
    }

    match BlobShape::classify(blob) {
        BlobShape::ResultList(items) => {
            for item in items {
                if let Value::Object(item) = decode_embedded(item) {
                    out.push(unnest(item));
                }
            }
        }
        BlobShape::ResultSingle(wrapper, inner) => match decode_embedded(inner) {
            Value::Object(mut inner) => {
                for key in fields::MERGED_FROM_WRAPPER {
                    if let Some(value) = wrapper.get(*key) {
                        if !inner.contains_key(*key) {
                            inner.insert(key.to_string(), value.clone());
                        }
                    }
                }
                out.push(inner);
            }
            _ => out.push(wrapper.clone()),
        },
        BlobShape::Profile(map) => out.push(map.clone()),
        BlobShape::List(items) => {
            for item in items {
                let decoded = decode_embedded(item);
                if decoded.is_object() {
                    extract_into(&decoded, depth + 1, out);
                }
            }
        }
        BlobShape::Encoded => {
            let decoded = decode_embedded(blob);
            if decoded.is_object() || decoded.is_array() {
                extract_into(&decoded, depth + 1, out);
            }
        }
        BlobShape::Scalar => {}
    }
}

/// Replace a result item by its nested `profile`/`person`/`candidate` object when present.
fn unnest(mut item: RawProfile) -> RawProfile {
    for key in fields::NESTED_PROFILE {
        if let Some(Value::Object(_)) = item.get(*key) {
            if let Some(Value::Object(inner)) = item.remove(*key) {
                return inner;
            }
        }
    }
    item
}
