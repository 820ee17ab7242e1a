use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Length mismatch: {vectors} vectors for {metadatas} metadata entries")]
    LengthMismatch { vectors: usize, metadatas: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
