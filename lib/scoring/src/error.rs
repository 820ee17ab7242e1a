use talentx_profile::ProfileError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScoringError>;

#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Embedder returned vectors of dimension {actual}, expected {expected}")]
    EmbeddingDimension { expected: usize, actual: usize },

    #[error("Invalid {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error(transparent)]
    Index(#[from] talentx_core::Error),

    #[error(transparent)]
    Profile(#[from] ProfileError),
}

impl ScoringError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ScoringError::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
