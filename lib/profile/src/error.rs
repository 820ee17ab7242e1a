use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProfileError>;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unparseable profile source: {origin}")]
    Unparseable { origin: String },

    #[error("No profile objects found in {origin}")]
    NoProfiles { origin: String },

    #[error("Profile folder not found: {0}")]
    FolderNotFound(PathBuf),

    #[error("No JSON files found in {0}")]
    NoJsonFiles(PathBuf),
}
