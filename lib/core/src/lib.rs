//! # talentx Core
//!
//! Core data structures for the talentx candidate scoring engine.
//!
//! - [`Vector`] - Dense embedding with L2 normalization
//! - [`Section`] / [`SectionEntry`] - Indexed profile sections and their metadata
//! - [`SectionIndex`] - Exact inner-product index with an append-only id space
//!
//! ## Example
//!
//! ```rust
//! use talentx_core::{Section, SectionEntry, SectionIndex, Vector};
//!
//! let mut index = SectionIndex::new(Section::Skills, 3).unwrap();
//! let entry = SectionEntry::new("alice", Section::Skills, "rust; sql", "Rust; SQL", "alice.json");
//! index.add(vec![Vector::new(vec![1.0, 0.0, 0.0])], vec![entry]).unwrap();
//!
//! let hits = index.search(&Vector::new(vec![1.0, 0.0, 0.0]), 10).unwrap();
//! assert_eq!(hits[0].entry.candidate_id, "alice");
//! ```

pub mod error;
pub mod index;
pub mod section;
pub mod vector;

/// Inner-product kernels
///
/// AVX2/FMA on x86_64 and NEON on ARM64, with a scalar fallback.
pub mod simd;

pub use error::{Error, Result};
pub use index::{EntryId, SearchHit, SectionIndex};
pub use section::{excerpt, Section, SectionEntry, EXCERPT_CHARS};
pub use vector::Vector;
