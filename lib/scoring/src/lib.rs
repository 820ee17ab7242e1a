//! # talentx-scoring
//!
//! Ranks candidates against a free-text job description.
//!
//! Each candidate contributes up to three kinds of section entries (skills,
//! experience, education) that are embedded and stored in one
//! [`SectionIndex`](talentx_core::SectionIndex) per section. A scoring call
//! embeds the job text once, queries the three indices, aggregates hits per
//! candidate and adds a language match computed straight from the profile.
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use talentx_profile::ProfileSource;
//! use talentx_scoring::{EngineConfig, HashingEmbedder, ScoreOptions, ScoringEngine};
//!
//! let mut engine = ScoringEngine::new(Arc::new(HashingEmbedder::default()), EngineConfig::default())?;
//! engine.add_sources(&[ProfileSource::new(
//!     "inline",
//!     json!([{"id": "ada", "skills": "rust, distributed systems"}]),
//! )])?;
//!
//! let ranked = engine.score("Rust engineer", &ScoreOptions::default())?;
//! assert_eq!(ranked[0].candidate_id, "ada");
//! # Ok::<(), talentx_scoring::ScoringError>(())
//! ```

pub mod aggregate;
pub mod config;
pub mod embedder;
pub mod engine;
pub mod error;
pub mod language;
pub mod openai;
pub mod result;
pub mod store;
pub mod weights;

pub use aggregate::{clamp_unit, ExpAggMode};
pub use config::{
    parse_top_k, EngineConfig, ScoreOptions, DEFAULT_EMBEDDING_BATCH_SIZE, DEFAULT_TOP_K_SEARCH,
    MAX_TOP_K_SEARCH,
};
pub use embedder::{embed_all, Embedder, HashingEmbedder, DEFAULT_HASH_DIM};
pub use engine::{EngineStatus, IngestReport, ScoringEngine};
pub use error::{Result, ScoringError};
pub use language::language_score;
pub use openai::{OpenAiConfig, OpenAiEmbedder};
pub use result::{ScoreBreakdown, ScoreResult};
pub use store::CandidateStore;
pub use weights::ScoreWeights;
