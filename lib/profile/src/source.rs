//! Profile sources: files or in-memory blobs, and folder discovery

use crate::error::{ProfileError, Result};
use crate::parse::{decode_embedded, parse_lenient};
use crate::profile::CandidateProfile;
use crate::unwrap::extract_profiles;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A parsed profile document together with where it came from
#[derive(Debug, Clone)]
pub struct ProfileSource {
    pub origin: String,
    pub blob: Value,
}

impl ProfileSource {
    pub fn new(origin: impl Into<String>, blob: Value) -> Self {
        Self {
            origin: origin.into(),
            blob,
        }
    }

    /// Parse raw text (JSON, then Python-literal) into a source.
    pub fn from_text(origin: impl Into<String>, text: &str) -> Result<Self> {
        let origin = origin.into();
        match parse_lenient(text).into_value() {
            Some(blob) => Ok(Self { origin, blob }),
            None => Err(ProfileError::Unparseable { origin }),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_text(path.display().to_string(), &text)
    }

    /// Every candidate profile in this source, in document order.
    ///
    /// A blob with no recognizable profiles inside is itself taken as the
    /// profile when it decodes to an object.
    pub fn profiles(&self) -> Result<Vec<CandidateProfile>> {
        let mut raws = extract_profiles(&self.blob);
        if raws.is_empty() {
            if let Value::Object(whole) = decode_embedded(&self.blob) {
                debug!("Using whole blob of {} as a profile", self.origin);
                raws.push(whole);
            }
        }

        let profiles: Vec<CandidateProfile> = raws
            .into_iter()
            .map(|raw| CandidateProfile::from_raw(raw, &self.origin))
            .collect();

        if profiles.is_empty() {
            return Err(ProfileError::NoProfiles {
                origin: self.origin.clone(),
            });
        }
        Ok(profiles)
    }
}

/// Normalize a batch of sources, skipping the ones that yield nothing.
///
/// Returns the profiles in source order and the number of skipped sources.
pub fn normalize_sources(sources: &[ProfileSource]) -> (Vec<CandidateProfile>, usize) {
    let mut profiles = Vec::new();
    let mut skipped = 0;
    for source in sources {
        match source.profiles() {
            Ok(found) => {
                debug!("{} profile(s) from {}", found.len(), source.origin);
                profiles.extend(found);
            }
            Err(e) => {
                warn!("Skipping {}: {}", source.origin, e);
                skipped += 1;
            }
        }
    }
    (profiles, skipped)
}

/// Read every file, skipping (with a warning) the ones that cannot be read or parsed.
pub fn load_sources(paths: &[PathBuf]) -> Vec<ProfileSource> {
    paths
        .iter()
        .filter_map(|path| match ProfileSource::from_path(path) {
            Ok(source) => Some(source),
            Err(e) => {
                warn!("Skipping {}", e);
                None
            }
        })
        .collect()
}

/// `*.json` files directly inside `folder`, sorted by path.
///
/// Relative folders resolve against the current working directory.
pub fn collect_json_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let folder = if folder.is_relative() {
        std::env::current_dir()
            .map_err(|source| ProfileError::Io {
                path: folder.to_path_buf(),
                source,
            })?
            .join(folder)
    } else {
        folder.to_path_buf()
    };

    if !folder.is_dir() {
        return Err(ProfileError::FolderNotFound(folder));
    }

    let entries = fs::read_dir(&folder).map_err(|source| ProfileError::Io {
        path: folder.clone(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(ProfileError::NoJsonFiles(folder));
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_from_text_accepts_python_literal() {
        let source = ProfileSource::from_text("inline", "{'id': 'p1', 'skills': ['Go']}").unwrap();
        let profiles = source.profiles().unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].candidate_id, "p1");
    }

    #[test]
    fn test_from_text_rejects_garbage() {
        let result = ProfileSource::from_text("junk", "not a profile {");
        assert!(matches!(result, Err(ProfileError::Unparseable { origin }) if origin == "junk"));
    }

    #[test]
    fn test_no_profiles() {
        let source = ProfileSource::new("numbers.json", json!([1, "two", null]));
        assert!(matches!(source.profiles(), Err(ProfileError::NoProfiles { .. })));
    }

    #[test]
    fn test_empty_wrapper_falls_back_to_whole_blob() {
        for blob in [json!({"results": []}), json!({"results": ["garbage", 3]})] {
            let source = ProfileSource::new("dir/wrapper.json", blob);
            let profiles = source.profiles().unwrap();
            assert_eq!(profiles.len(), 1);
            assert_eq!(profiles[0].candidate_id, "wrapper");
            assert!(profiles[0].section_entries().is_empty());
        }
    }

    #[test]
    fn test_normalize_sources_skips_empty() {
        let sources = vec![
            ProfileSource::new("a.json", json!([{"id": "a"}, {"id": "b"}])),
            ProfileSource::new("b.json", json!(42)),
            ProfileSource::new("c.json", json!({"id": "c"})),
        ];
        let (profiles, skipped) = normalize_sources(&sources);
        let ids: Vec<String> = profiles.into_iter().map(|p| p.candidate_id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(skipped, 1);
    }

    #[test]
    fn test_collect_json_files_sorted() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let files = collect_json_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_collect_json_files_errors() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            collect_json_files(dir.path()),
            Err(ProfileError::NoJsonFiles(_))
        ));
        assert!(matches!(
            collect_json_files(&dir.path().join("missing")),
            Err(ProfileError::FolderNotFound(_))
        ));
    }

    #[test]
    fn test_load_sources_skips_unreadable() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.json");
        let bad = dir.path().join("bad.json");
        fs::write(&good, r#"{"id": "g"}"#).unwrap();
        fs::write(&bad, "<<<").unwrap();

        let sources = load_sources(&[bad, good.clone(), dir.path().join("gone.json")]);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].origin, good.display().to_string());
    }
}
