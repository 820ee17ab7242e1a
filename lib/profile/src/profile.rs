use crate::fields::{self, first_filled};
use crate::flatten::{flatten_education, flatten_experience, flatten_skills};
use crate::identity::resolve_candidate_id;
use crate::languages::{parse_languages, LanguageEntry};
use crate::text::{coerce_text, normalize_text};
use crate::unwrap::RawProfile;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use talentx_core::{Section, SectionEntry};

/// Free text shorter than this is not used as a stand-in for skills
const SKILLS_FALLBACK_MIN_CHARS: usize = 10;

/// A candidate profile after normalization.
///
/// `raw` keeps the original fields for later lookups; the section fields hold
/// the flattened text before whitespace/HTML cleanup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub candidate_id: String,
    pub origin: String,
    pub raw: RawProfile,
    pub skills: Option<String>,
    pub experience: Vec<String>,
    pub education: Option<String>,
    pub languages: Vec<LanguageEntry>,
}

impl CandidateProfile {
    pub fn from_raw(raw: RawProfile, origin: &str) -> Self {
        let candidate_id = resolve_candidate_id(&raw, origin);
        let skills = skills_text(&raw);
        let experience = first_filled(&raw, fields::EXPERIENCE)
            .map(flatten_experience)
            .unwrap_or_default();
        let education = first_filled(&raw, fields::EDUCATION)
            .map(flatten_education)
            .filter(|text| !text.is_empty());
        let languages = first_filled(&raw, fields::LANGUAGES)
            .map(parse_languages)
            .unwrap_or_default();

        Self {
            candidate_id,
            origin: origin.to_string(),
            raw,
            skills,
            experience,
            education,
            languages,
        }
    }

    /// Entries to embed: at most one skills block, one per experience item,
    /// at most one education block. Blank text after cleanup is skipped.
    pub fn section_entries(&self) -> Vec<SectionEntry> {
        let mut entries = Vec::with_capacity(self.experience.len() + 2);

        if let Some(skills) = &self.skills {
            entries.extend(self.entry(Section::Skills, skills));
        }
        for (index, item) in self.experience.iter().enumerate() {
            entries.extend(
                self.entry(Section::Experience, item)
                    .map(|entry| entry.with_item_index(index)),
            );
        }
        if let Some(education) = &self.education {
            entries.extend(self.entry(Section::Education, education));
        }

        entries
    }

    fn entry(&self, section: Section, source: &str) -> Option<SectionEntry> {
        let text = normalize_text(source);
        (!text.is_empty())
            .then(|| SectionEntry::new(&self.candidate_id, section, text, source, &self.origin))
    }
}

/// Skills text with the summary/free-text fallbacks applied.
fn skills_text(raw: &RawProfile) -> Option<String> {
    let mut skills = first_filled(raw, fields::SKILLS)
        .map(flatten_skills)
        .unwrap_or_default();

    if skills.trim().is_empty() {
        skills = fields::SKILLS_FALLBACK
            .iter()
            .filter_map(|key| raw.get(*key).and_then(Value::as_str))
            .find(|text| text.chars().count() > SKILLS_FALLBACK_MIN_CHARS)
            .map(str::to_string)
            .unwrap_or_default();
    }

    let about = first_filled(raw, fields::ABOUT)
        .map(coerce_text)
        .unwrap_or_default();
    if !about.trim().is_empty() && !skills.contains(about.as_str()) {
        skills = if skills.trim().is_empty() {
            about
        } else {
            format!("{}\n{}", about, skills)
        };
    }

    (!skills.trim().is_empty()).then_some(skills)
}
