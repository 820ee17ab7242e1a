use parking_lot::RwLock;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use talentx_profile::collect_json_files;
use talentx_scoring::{
    EngineConfig, Embedder, ExpAggMode, IngestReport, Result, ScoreOptions, ScoreResult,
    ScoringEngine,
};
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub indexed_profiles: usize,
    pub exp_agg_mode: Option<ExpAggMode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadSummary {
    pub indexed_profiles: usize,
    pub source: PathBuf,
    pub files_added: usize,
    pub exp_agg_mode: ExpAggMode,
    pub report: IngestReport,
}

/// The shared scorer behind the HTTP layer.
///
/// Holds at most one engine. Loading takes the write lock for the whole
/// ingestion; scoring only takes the read lock.
pub struct ScorerState {
    embedder: Arc<dyn Embedder>,
    base_config: EngineConfig,
    engine: RwLock<Option<ScoringEngine>>,
}

impl ScorerState {
    pub fn new(embedder: Arc<dyn Embedder>, base_config: EngineConfig) -> Self {
        Self {
            embedder,
            base_config,
            engine: RwLock::new(None),
        }
    }

    pub fn health(&self) -> HealthStatus {
        let engine = self.engine.read();
        HealthStatus {
            status: "ok",
            indexed_profiles: engine.as_ref().map_or(0, ScoringEngine::len),
            exp_agg_mode: engine.as_ref().map(ScoringEngine::exp_agg_mode),
        }
    }

    pub fn indexed_profiles(&self) -> usize {
        self.engine.read().as_ref().map_or(0, ScoringEngine::len)
    }

    /// Load every JSON file in `folder`.
    ///
    /// A fresh engine is built when `reset` is set, when none exists yet, or
    /// when `exp_agg_mode` differs from the live engine's. The fresh engine
    /// only replaces the live one once ingestion succeeded.
    pub fn load_profiles(&self, folder: &Path, exp_agg_mode: ExpAggMode, reset: bool) -> Result<LoadSummary> {
        let files = collect_json_files(folder)?;
        let source = files
            .first()
            .and_then(|f| f.parent())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| folder.to_path_buf());

        let mut guard = self.engine.write();
        let reuse = !reset
            && guard
                .as_ref()
                .is_some_and(|engine| engine.exp_agg_mode() == exp_agg_mode);

        let mut fresh = None;
        let engine = match guard.as_mut() {
            Some(engine) if reuse => engine,
            _ => fresh.insert(ScoringEngine::new(
                self.embedder.clone(),
                self.base_config.with_exp_agg_mode(exp_agg_mode),
            )?),
        };
        let report = engine.load_files(&files)?;
        if let Some(engine) = fresh {
            info!("Rebuilt scoring engine with exp_agg_mode={}", exp_agg_mode);
            *guard = Some(engine);
        }

        Ok(LoadSummary {
            indexed_profiles: guard.as_ref().map_or(0, ScoringEngine::len),
            source,
            files_added: files.len(),
            exp_agg_mode,
            report,
        })
    }

    /// Score against the live engine; `None` when nothing has been indexed.
    pub fn score(&self, job_text: &str, options: &ScoreOptions) -> Result<Option<Vec<ScoreResult>>> {
        let guard = self.engine.read();
        match guard.as_ref() {
            Some(engine) if !engine.is_empty() => engine.score(job_text, options).map(Some),
            _ => Ok(None),
        }
    }
}
