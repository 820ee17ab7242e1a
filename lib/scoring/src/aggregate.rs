//! Aggregation of several experience similarities into one score

use crate::error::ScoringError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpAggMode {
    Sum,
    Mean,
    /// `sum / (1 + ln(1 + n))`
    #[default]
    SumNorm,
}

impl ExpAggMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpAggMode::Sum => "sum",
            ExpAggMode::Mean => "mean",
            ExpAggMode::SumNorm => "sum_norm",
        }
    }

    /// Raw aggregate of `similarities`; 0 when there are none. Not clamped.
    pub fn aggregate(&self, similarities: &[f32]) -> f32 {
        if similarities.is_empty() {
            return 0.0;
        }
        let n = similarities.len() as f32;
        let sum: f32 = similarities.iter().sum();
        match self {
            ExpAggMode::Sum => sum,
            ExpAggMode::Mean => sum / n,
            ExpAggMode::SumNorm => sum / (1.0 + n.ln_1p()),
        }
    }
}

impl fmt::Display for ExpAggMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpAggMode {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(ExpAggMode::Sum),
            "mean" => Ok(ExpAggMode::Mean),
            "sum_norm" => Ok(ExpAggMode::SumNorm),
            other => Err(ScoringError::invalid(
                "exp_agg_mode",
                format!("unknown mode '{}', expected sum, mean or sum_norm", other),
            )),
        }
    }
}

/// Clamp to [0, 1]; NaN becomes 0.
#[inline]
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
