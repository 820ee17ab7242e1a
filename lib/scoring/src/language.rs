use crate::aggregate::clamp_unit;
use talentx_profile::{LanguageEntry, MAX_LEVEL};

/// Share credited for a language the job text does not mention
const UNMENTIONED_CREDIT: f32 = 0.5;

/// Language match score in [0, 1].
///
/// A language named in `job_text_lower` earns its full level, any other
/// language half of it. The total is divided by the best possible
/// `MAX_LEVEL * n`. No languages scores 0.
pub fn language_score(languages: &[LanguageEntry], job_text_lower: &str) -> f32 {
    if languages.is_empty() {
        return 0.0;
    }

    let raw: f32 = languages
        .iter()
        .map(|entry| {
            let name = entry.language.trim().to_lowercase();
            if !name.is_empty() && job_text_lower.contains(&name) {
                entry.level
            } else {
                UNMENTIONED_CREDIT * entry.level
            }
        })
        .sum();

    clamp_unit(raw / (MAX_LEVEL * languages.len() as f32))
}
