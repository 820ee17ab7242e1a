use serde::{Deserialize, Serialize};

/// Per-component scores of one candidate, each in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub experience: f32,
    pub skills: f32,
    pub education: f32,
    pub languages: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub candidate_id: String,
    pub score: f32,
    pub breakdown: ScoreBreakdown,
}
