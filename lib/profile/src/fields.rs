//! Canonical field names and the source keys accepted for each of them.
//!
//! Lookup order is the order of each alias list.

use crate::text::is_filled;
use serde_json::{Map, Value};

pub type Aliases = &'static [&'static str];

// Identity
pub const CANDIDATE_ID: Aliases = &["id", "candidate_id", "profile_id", "uid", "user_id"];
pub const PROFILE_URL: Aliases = &["url", "linkedin", "linkedin_url", "profile_url"];

// Profile level sources
pub const SKILLS: Aliases = &["skills", "skill", "skill_set", "keywords", "skills_list"];
pub const SKILLS_FALLBACK: Aliases = &["summary", "about", "description", "details"];
pub const ABOUT: Aliases = &["summary", "about", "headline"];
pub const EXPERIENCE: Aliases = &["experience", "work_experience", "positions", "jobs"];
pub const EDUCATION: Aliases = &["education", "studies", "education_history"];
pub const LANGUAGES: Aliases = &["languages", "language", "langs"];

// Wrappers
pub const RESULT_LIST: &str = "results";
pub const RESULT_SINGLE: &str = "result";
pub const NESTED_PROFILE: Aliases = &["profile", "person", "candidate"];
pub const MERGED_FROM_WRAPPER: Aliases = &["url", "candidate_id", "profile_url", "id"];
pub const EXPERIENCE_ITEMS: Aliases = &["items", "positions", "roles"];
pub const EDUCATION_ITEMS: Aliases = &["items", "degrees", "education"];

// Experience entry
pub const ROLE: Aliases = &["role", "title", "position", "job_title"];
pub const COMPANY: Aliases = &["company", "employer", "organisation", "organization"];
pub const EXPERIENCE_PERIOD: Aliases = &["start_end", "duration", "dates", "date"];
pub const LOCATION: Aliases = &["location", "place"];
pub const ENTRY_SKILLS: Aliases = &["skills", "keywords", "stack", "technologies"];
pub const EXPERIENCE_DESCRIPTION: Aliases = &["description", "summary", "details", "about"];

// Education entry
pub const INSTITUTION: Aliases = &["institution", "school", "college", "university"];
pub const FIELD_OF_STUDY: Aliases = &["field_of_study", "major", "degree"];
pub const EDUCATION_PERIOD: Aliases = &["start_end", "dates", "duration"];
pub const GRADE: Aliases = &["grade", "score", "gpa"];
pub const EDUCATION_DESCRIPTION: Aliases = &["description", "notes", "summary"];

// Language entry
pub const LANGUAGE_NAME: Aliases = &["language", "name"];
pub const LANGUAGE_LEVEL: Aliases = &["level", "proficiency"];

/// First alias whose value is present and not null.
pub fn first_present<'a>(map: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !value.is_null())
}

/// First alias whose value carries content (see [`is_filled`]).
pub fn first_filled<'a>(map: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|value| is_filled(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_first_present_skips_null_only() {
        let m = map(json!({"role": null, "title": "", "position": "CTO"}));
        assert_eq!(first_present(&m, ROLE), Some(&json!("")));
        assert_eq!(first_filled(&m, ROLE), Some(&json!("CTO")));
    }

    #[test]
    fn test_alias_order_wins() {
        let m = map(json!({"employer": "B", "company": "A"}));
        assert_eq!(first_present(&m, COMPANY), Some(&json!("A")));
        assert_eq!(first_present(&m, GRADE), None);
    }
}
