//! The scoring engine: ingestion into per-section indices and ranking.

use crate::aggregate::{clamp_unit, ExpAggMode};
use crate::config::{EngineConfig, ScoreOptions};
use crate::embedder::{embed_all, Embedder};
use crate::error::{Result, ScoringError};
use crate::language::language_score;
use crate::result::{ScoreBreakdown, ScoreResult};
use crate::store::CandidateStore;
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use talentx_core::{EntryId, Section, SectionEntry, SectionIndex, Vector};
use talentx_profile::{
    collect_json_files, load_sources, normalize_sources, normalize_text, CandidateProfile,
    ProfileSource,
};
use tracing::{debug, info};

/// Live entry ids of one candidate in one section
type LiveIds = SmallVec<[EntryId; 4]>;

/// Per-candidate best or aggregated similarity for one section
type SectionScores<'a> = AHashMap<&'a str, f32>;

/// Outcome of one ingestion call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Profiles written to the store (after in-batch deduplication)
    pub profiles: usize,
    /// Profiles whose id was not known before
    pub new_candidates: usize,
    pub entries_indexed: usize,
    /// Entries of overwritten candidates that are no longer searchable
    pub entries_retired: usize,
    /// Files or blobs skipped because they could not be read or held no profiles
    pub sources_skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStatus {
    pub indexed_profiles: usize,
    pub exp_agg_mode: ExpAggMode,
    pub skills_entries: usize,
    pub experience_entries: usize,
    pub education_entries: usize,
}

#[derive(Debug, Clone)]
struct SectionIndices {
    skills: SectionIndex,
    experience: SectionIndex,
    education: SectionIndex,
}

impl SectionIndices {
    fn new(dim: usize) -> Result<Self> {
        Ok(Self {
            skills: SectionIndex::new(Section::Skills, dim)?,
            experience: SectionIndex::new(Section::Experience, dim)?,
            education: SectionIndex::new(Section::Education, dim)?,
        })
    }

    fn get(&self, section: Section) -> &SectionIndex {
        match section {
            Section::Skills => &self.skills,
            Section::Experience => &self.experience,
            Section::Education => &self.education,
        }
    }

    fn get_mut(&mut self, section: Section) -> &mut SectionIndex {
        match section {
            Section::Skills => &mut self.skills,
            Section::Experience => &mut self.experience,
            Section::Education => &mut self.education,
        }
    }
}

/// In-memory candidate scoring engine.
///
/// Lifecycle is construct, ingest any number of times, score any number of
/// times. Ingestion takes `&mut self`; scoring only reads, so concurrent
/// scoring calls can share the engine behind a read lock.
pub struct ScoringEngine {
    config: EngineConfig,
    embedder: Arc<dyn Embedder>,
    store: CandidateStore,
    indices: SectionIndices,
    live: AHashMap<(String, Section), LiveIds>,
}

impl ScoringEngine {
    pub fn new(embedder: Arc<dyn Embedder>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        if embedder.dim() == 0 {
            return Err(ScoringError::invalid("embedding_dim", "must be greater than 0"));
        }
        let indices = SectionIndices::new(embedder.dim())?;

        Ok(Self {
            config,
            embedder,
            store: CandidateStore::new(),
            indices,
            live: AHashMap::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn exp_agg_mode(&self) -> ExpAggMode {
        self.config.exp_agg_mode
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    pub fn store(&self) -> &CandidateStore {
        &self.store
    }

    pub fn index(&self, section: Section) -> &SectionIndex {
        self.indices.get(section)
    }

    /// Number of distinct candidates ingested so far
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            indexed_profiles: self.store.len(),
            exp_agg_mode: self.config.exp_agg_mode,
            skills_entries: self.indices.skills.live_count(),
            experience_entries: self.indices.experience.live_count(),
            education_entries: self.indices.education.live_count(),
        }
    }

    /// Drop every candidate and entry, keeping configuration and embedder.
    pub fn reset(&mut self) -> Result<()> {
        self.indices = SectionIndices::new(self.embedder.dim())?;
        self.store.clear();
        self.live.clear();
        info!("Scoring engine reset");
        Ok(())
    }

    /// Ingest normalized profiles.
    ///
    /// All texts are embedded before anything is written, so an embedding
    /// failure leaves the engine unchanged. When an id occurs more than once
    /// in `profiles` the last occurrence wins. Entries of a candidate that is
    /// ingested again are retired and no longer show up in searches.
    pub fn add_profiles(&mut self, profiles: Vec<CandidateProfile>) -> Result<IngestReport> {
        let profiles = dedup_last_wins(profiles);
        if profiles.is_empty() {
            return Ok(IngestReport::default());
        }

        let entries: Vec<Vec<SectionEntry>> = profiles.iter().map(|p| p.section_entries()).collect();
        let texts: Vec<String> = entries
            .iter()
            .flatten()
            .map(|entry| entry.text.clone())
            .collect();
        let mut vectors = embed_all(self.embedder.as_ref(), &texts, self.config.embedding_batch_size)?
            .into_iter();

        let mut report = IngestReport {
            profiles: profiles.len(),
            ..IngestReport::default()
        };

        let mut batches: AHashMap<Section, (Vec<Vector>, Vec<SectionEntry>)> = AHashMap::new();
        for profile_entries in entries {
            for entry in profile_entries {
                let vector = vectors.next().ok_or_else(|| {
                    ScoringError::Embedding("fewer vectors than section texts".to_string())
                })?;
                let batch = batches.entry(entry.section).or_default();
                batch.0.push(vector);
                batch.1.push(entry);
            }
        }

        for profile in &profiles {
            report.entries_retired += self.retire_candidate(&profile.candidate_id);
        }

        for section in Section::ALL {
            let Some((section_vectors, metas)) = batches.remove(&section) else {
                continue;
            };
            let index = self.indices.get_mut(section);
            let first_id = index.next_id();
            let owners: Vec<String> = metas.iter().map(|m| m.candidate_id.clone()).collect();
            let added = index.add(section_vectors, metas)?;
            for (offset, owner) in owners.into_iter().enumerate() {
                self.live
                    .entry((owner, section))
                    .or_default()
                    .push(first_id + offset as EntryId);
            }
            debug!("Indexed {} {} entries", added, section);
            report.entries_indexed += added;
        }

        for profile in profiles {
            if self.store.upsert(profile) {
                report.new_candidates += 1;
            }
        }

        info!(
            "Ingested {} profiles ({} new), {} entries indexed, {} retired",
            report.profiles, report.new_candidates, report.entries_indexed, report.entries_retired
        );
        Ok(report)
    }

    /// Normalize and ingest parsed sources; sources without profiles are skipped.
    pub fn add_sources(&mut self, sources: &[ProfileSource]) -> Result<IngestReport> {
        let (profiles, skipped) = normalize_sources(sources);
        let mut report = self.add_profiles(profiles)?;
        report.sources_skipped = skipped;
        Ok(report)
    }

    /// Ingest every `*.json` file directly inside `folder`.
    pub fn load_folder(&mut self, folder: &Path) -> Result<IngestReport> {
        let files = collect_json_files(folder)?;
        info!("Loading {} profile files from {}", files.len(), folder.display());
        self.load_files(&files)
    }

    /// Ingest profile files; unreadable or empty files are skipped.
    pub fn load_files(&mut self, files: &[PathBuf]) -> Result<IngestReport> {
        let sources = load_sources(files);
        let unreadable = files.len() - sources.len();

        let mut report = self.add_sources(&sources)?;
        report.sources_skipped += unreadable;
        Ok(report)
    }

    fn retire_candidate(&mut self, candidate_id: &str) -> usize {
        let mut retired = 0;
        for section in Section::ALL {
            if let Some(ids) = self.live.remove(&(candidate_id.to_string(), section)) {
                retired += self.indices.get_mut(section).retire(ids);
            }
        }
        retired
    }

    /// Rank every known candidate against `job_text`.
    ///
    /// The result covers all ingested candidates, sorted by descending score;
    /// equal scores keep ingestion order. An engine with no candidates returns
    /// an empty list.
    pub fn score(&self, job_text: &str, options: &ScoreOptions) -> Result<Vec<ScoreResult>> {
        options.validate()?;
        let weights = options.weights.normalized()?;
        if self.store.is_empty() {
            return Ok(Vec::new());
        }

        let query = self.embedder.embed(job_text)?;
        if query.dim() != self.embedder.dim() {
            return Err(ScoringError::EmbeddingDimension {
                expected: self.embedder.dim(),
                actual: query.dim(),
            });
        }

        let top_k = options.top_k_search;
        let (skills, (experience, education)) = rayon::join(
            || self.section_best(Section::Skills, &query, top_k),
            || {
                rayon::join(
                    || self.experience_scores(&query, top_k),
                    || self.section_best(Section::Education, &query, top_k),
                )
            },
        );
        let (skills, experience, education) = (skills?, experience?, education?);

        let job_lower = normalize_text(job_text).to_lowercase();
        let mut results: Vec<ScoreResult> = self
            .store
            .iter()
            .map(|profile| {
                let id = profile.candidate_id.as_str();
                let breakdown = ScoreBreakdown {
                    experience: experience.get(id).copied().unwrap_or(0.0),
                    skills: skills.get(id).copied().unwrap_or(0.0),
                    education: education.get(id).copied().unwrap_or(0.0),
                    languages: language_score(&profile.languages, &job_lower),
                };
                ScoreResult {
                    candidate_id: profile.candidate_id.clone(),
                    score: clamp_unit(weights.combine(&breakdown)),
                    breakdown,
                }
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));

        info!("Scored {} candidates (top_k_search={})", results.len(), top_k);
        Ok(results)
    }

    /// Best similarity per candidate in one section, clamped to [0, 1].
    fn section_best(&self, section: Section, query: &Vector, top_k: usize) -> Result<SectionScores<'_>> {
        let hits = self.indices.get(section).search(query, top_k)?;
        debug!("{} search returned {} hits", section, hits.len());

        let mut best: SectionScores<'_> = AHashMap::new();
        for hit in hits {
            let slot = best.entry(hit.entry.candidate_id.as_str()).or_insert(0.0);
            *slot = slot.max(hit.similarity);
        }
        for value in best.values_mut() {
            *value = clamp_unit(*value);
        }
        Ok(best)
    }

    /// Experience similarities grouped by candidate and aggregated with the engine's mode.
    fn experience_scores(&self, query: &Vector, top_k: usize) -> Result<SectionScores<'_>> {
        let hits = self.indices.experience.search(query, top_k)?;
        debug!("experience search returned {} hits", hits.len());

        let mut grouped: AHashMap<&str, SmallVec<[f32; 4]>> = AHashMap::new();
        for hit in hits {
            grouped
                .entry(hit.entry.candidate_id.as_str())
                .or_default()
                .push(hit.similarity);
        }

        let mode = self.config.exp_agg_mode;
        Ok(grouped
            .into_iter()
            .map(|(id, sims)| (id, clamp_unit(mode.aggregate(&sims))))
            .collect())
    }
}

/// Keep only the last profile per candidate id, in the order those last occurrences appear.
fn dedup_last_wins(profiles: Vec<CandidateProfile>) -> Vec<CandidateProfile> {
    let mut seen = AHashSet::new();
    let mut kept: Vec<CandidateProfile> = profiles
        .into_iter()
        .rev()
        .filter(|p| seen.insert(p.candidate_id.clone()))
        .collect();
    kept.reverse();
    kept
}
