//! # talentx-profile
//!
//! Turns loosely structured candidate profiles into a uniform shape.
//!
//! Inputs may be JSON or Python-literal text, wrapped in scraper envelopes
//! (`{"results": [...]}`, `{"result": ...}`), nested under `profile`/`person`
//! keys, or carry fields under any of several aliases. Each profile resolves
//! to a [`CandidateProfile`] with a stable id, flattened skills/experience/
//! education text and a list of [`LanguageEntry`] proficiencies.
//!
//! ```
//! use talentx_profile::ProfileSource;
//! use serde_json::json;
//!
//! let source = ProfileSource::new(
//!     "inline",
//!     json!({"results": [{"id": "c1", "skills": ["Rust", "SQL"]}]}),
//! );
//! let profiles = source.profiles().unwrap();
//! assert_eq!(profiles[0].candidate_id, "c1");
//! assert_eq!(profiles[0].skills.as_deref(), Some("Rust; SQL"));
//! ```

pub mod error;
pub mod fields;
pub mod flatten;
pub mod identity;
pub mod languages;
pub mod parse;
pub mod profile;
pub mod pylit;
pub mod source;
pub mod text;
pub mod unwrap;

pub use error::{ProfileError, Result};
pub use identity::resolve_candidate_id;
pub use languages::{parse_languages, LanguageEntry, MAX_LEVEL, MIN_LEVEL};
pub use parse::{parse_lenient, ParseOutcome};
pub use profile::CandidateProfile;
pub use source::{collect_json_files, load_sources, normalize_sources, ProfileSource};
pub use text::normalize_text;
pub use unwrap::{extract_profiles, RawProfile};
