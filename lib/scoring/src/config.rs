use crate::aggregate::ExpAggMode;
use crate::error::{Result, ScoringError};
use crate::weights::ScoreWeights;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TOP_K_SEARCH: usize = 200;
pub const MAX_TOP_K_SEARCH: usize = 5000;
pub const DEFAULT_EMBEDDING_BATCH_SIZE: usize = 64;

/// Settings fixed for the lifetime of a [`ScoringEngine`](crate::ScoringEngine)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub exp_agg_mode: ExpAggMode,
    #[serde(default = "default_batch_size")]
    pub embedding_batch_size: usize,
}

fn default_batch_size() -> usize {
    DEFAULT_EMBEDDING_BATCH_SIZE
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            exp_agg_mode: ExpAggMode::default(),
            embedding_batch_size: DEFAULT_EMBEDDING_BATCH_SIZE,
        }
    }
}

impl EngineConfig {
    pub fn with_exp_agg_mode(mut self, mode: ExpAggMode) -> Self {
        self.exp_agg_mode = mode;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.embedding_batch_size == 0 {
            return Err(ScoringError::invalid("embedding_batch_size", "must be greater than 0"));
        }
        Ok(())
    }
}

/// Per-call scoring options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreOptions {
    #[serde(default)]
    pub weights: ScoreWeights,
    #[serde(default = "default_top_k_search")]
    pub top_k_search: usize,
}

fn default_top_k_search() -> usize {
    DEFAULT_TOP_K_SEARCH
}

impl Default for ScoreOptions {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            top_k_search: DEFAULT_TOP_K_SEARCH,
        }
    }
}

impl ScoreOptions {
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_top_k_search(mut self, top_k_search: usize) -> Self {
        self.top_k_search = top_k_search;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_top_k(self.top_k_search)?;
        self.weights.validate()
    }
}

fn check_top_k(top_k: usize) -> Result<usize> {
    if !(1..=MAX_TOP_K_SEARCH).contains(&top_k) {
        return Err(ScoringError::invalid(
            "top_k_search",
            format!("must be between 1 and {}, got {}", MAX_TOP_K_SEARCH, top_k),
        ));
    }
    Ok(top_k)
}

/// Convert a signed `top_k_search` from an outer layer, rejecting values out of range.
pub fn parse_top_k(value: i64) -> Result<usize> {
    let top_k = usize::try_from(value).map_err(|_| {
        ScoringError::invalid("top_k_search", format!("must be positive, got {}", value))
    })?;
    check_top_k(top_k)
}
