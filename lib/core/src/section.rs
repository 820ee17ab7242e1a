use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum number of characters kept in [`SectionEntry::excerpt`].
pub const EXCERPT_CHARS: usize = 300;

/// One of the independently indexed parts of a candidate profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Skills,
    Experience,
    Education,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Skills, Section::Experience, Section::Education];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Skills => "skills",
            Section::Experience => "experience",
            Section::Education => "education",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skills" => Ok(Section::Skills),
            "experience" => Ok(Section::Experience),
            "education" => Ok(Section::Education),
            other => Err(crate::Error::InvalidConfig(format!("unknown section '{}'", other))),
        }
    }
}

/// Metadata stored next to every indexed vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionEntry {
    pub candidate_id: String,
    pub section: Section,
    /// Normalized text that was embedded
    pub text: String,
    /// Bounded preview of the source text
    pub excerpt: String,
    /// Where the entry came from (usually a file path)
    pub origin: String,
    /// Position among the candidate's experience entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_index: Option<usize>,
}

impl SectionEntry {
    pub fn new(
        candidate_id: impl Into<String>,
        section: Section,
        text: impl Into<String>,
        source_text: &str,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            section,
            text: text.into(),
            excerpt: excerpt(source_text),
            origin: origin.into(),
            item_index: None,
        }
    }

    #[must_use]
    pub fn with_item_index(mut self, index: usize) -> Self {
        self.item_index = Some(index);
        self
    }
}

/// First [`EXCERPT_CHARS`] characters of `text`, cut on a char boundary.
pub fn excerpt(text: &str) -> String {
    match text.char_indices().nth(EXCERPT_CHARS) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}
