//! # talentx
//!
//! An in-memory candidate scoring engine.
//!
//! talentx ingests loosely structured candidate profiles, indexes their
//! skills, experience and education text in one vector index per section, and
//! ranks every candidate against a free-text job description with a weighted
//! mix of section similarity and language match.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! talentx serve --http-port 8088
//! curl -X POST localhost:8088/scorer/load_profiles -H 'content-type: application/json' \
//!      -d '{"json_folder": "./profiles"}'
//! curl -X POST localhost:8088/scorer/score -H 'content-type: application/json' \
//!      -d '{"job_text": "Senior Rust engineer", "top_k_search": 200}'
//! ```
//!
//! ### From the Command Line
//!
//! ```bash
//! talentx score --profiles ./profiles --job @job.txt --top 5
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use std::sync::Arc;
//! use talentx::prelude::*;
//!
//! let mut engine = ScoringEngine::new(Arc::new(HashingEmbedder::default()), EngineConfig::default())?;
//! engine.add_sources(&[ProfileSource::new(
//!     "inline",
//!     serde_json::json!({"results": [
//!         {"id": "alice", "skills": "python machine learning"},
//!         {"id": "bob", "experience": [{"title": "Backend Engineer", "company": "Acme"}]}
//!     ]}),
//! )])?;
//!
//! let options = ScoreOptions::default().with_weights(ScoreWeights::from_pairs([("skills", 1.0)]));
//! let ranked = engine.score("python developer", &options)?;
//! assert_eq!(ranked[0].candidate_id, "alice");
//! # Ok::<(), talentx::ScoringError>(())
//! ```
//!
//! ## Crate Structure
//!
//! - `talentx-core` - vectors, SIMD inner product, per-section exact index
//! - `talentx-profile` - lenient parsing and normalization of profile records
//! - `talentx-scoring` - embedders, weights, aggregation and the scoring engine
//! - `talentx-api` - REST endpoints

// Re-export core types
pub use talentx_core::{
    Section, SectionEntry, SectionIndex, SearchHit, EntryId, Vector,
    Error, Result,
};

// Re-export profile normalization
pub use talentx_profile::{
    CandidateProfile, LanguageEntry, ProfileError, ProfileSource,
    collect_json_files, extract_profiles, parse_lenient,
};

// Re-export scoring
pub use talentx_scoring::{
    ScoringEngine, EngineConfig, EngineStatus, IngestReport,
    ScoreOptions, ScoreWeights, ScoreResult, ScoreBreakdown, ExpAggMode,
    Embedder, HashingEmbedder, OpenAiConfig, OpenAiEmbedder,
    CandidateStore, ScoringError,
};

// Re-export API
pub use talentx_api::{RestApi, ScorerState};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Section, SectionEntry, SectionIndex, Vector,
        CandidateProfile, LanguageEntry, ProfileSource,
        ScoringEngine, EngineConfig, ScoreOptions, ScoreWeights, ScoreResult, ScoreBreakdown,
        ExpAggMode, Embedder, HashingEmbedder,
        RestApi, ScorerState,
    };
}

/// SIMD-optimized vector operations
pub mod simd {
    pub use talentx_core::simd::{inner_product, norm};
}
