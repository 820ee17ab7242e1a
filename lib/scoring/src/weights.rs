//! Component weights for the final score

use crate::error::{Result, ScoringError};
use crate::result::ScoreBreakdown;
use serde::{Deserialize, Serialize};

/// Weights of the four score components.
///
/// Deserializing ignores unknown keys and treats absent keys as 0. The
/// [`Default`] value is the stock weighting used when a caller supplies none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    #[serde(default)]
    pub experience: f32,
    #[serde(default)]
    pub skills: f32,
    #[serde(default)]
    pub education: f32,
    #[serde(default)]
    pub languages: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            experience: 0.4,
            skills: 0.4,
            education: 0.2,
            languages: 0.1,
        }
    }
}

impl ScoreWeights {
    pub const ZERO: ScoreWeights = ScoreWeights {
        experience: 0.0,
        skills: 0.0,
        education: 0.0,
        languages: 0.0,
    };

    /// Build weights from `(component, weight)` pairs; unknown names are ignored.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f32)>,
    {
        let mut weights = Self::ZERO;
        for (name, weight) in pairs {
            match name {
                "experience" => weights.experience = weight,
                "skills" => weights.skills = weight,
                "education" => weights.education = weight,
                "languages" => weights.languages = weight,
                _ => {}
            }
        }
        weights
    }

    fn components(&self) -> [(&'static str, f32); 4] {
        [
            ("experience", self.experience),
            ("skills", self.skills),
            ("education", self.education),
            ("languages", self.languages),
        ]
    }

    pub fn sum(&self) -> f32 {
        self.experience + self.skills + self.education + self.languages
    }

    pub fn validate(&self) -> Result<()> {
        for (name, weight) in self.components() {
            if !weight.is_finite() {
                return Err(ScoringError::invalid(format!("weights.{}", name), "must be finite"));
            }
            if weight < 0.0 {
                return Err(ScoringError::invalid(format!("weights.{}", name), "must not be negative"));
            }
        }
        if self.sum() <= 0.0 {
            return Err(ScoringError::invalid("weights", "at least one weight must be positive"));
        }
        Ok(())
    }

    /// Validated weights scaled to sum to 1.0.
    pub fn normalized(&self) -> Result<Self> {
        self.validate()?;
        let sum = self.sum();
        Ok(Self {
            experience: self.experience / sum,
            skills: self.skills / sum,
            education: self.education / sum,
            languages: self.languages / sum,
        })
    }

    /// Weighted sum of the components.
    pub fn combine(&self, breakdown: &ScoreBreakdown) -> f32 {
        self.experience * breakdown.experience
            + self.skills * breakdown.skills
            + self.education * breakdown.education
            + self.languages * breakdown.languages
    }
}
