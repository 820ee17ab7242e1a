use ahash::AHashMap;
use talentx_profile::CandidateProfile;

/// Candidate profiles keyed by id, iterated in first-insertion order.
///
/// Overwriting an id replaces the profile but keeps its original position,
/// which is the tie-break order of ranked results.
#[derive(Debug, Clone, Default)]
pub struct CandidateStore {
    order: Vec<String>,
    profiles: AHashMap<String, CandidateProfile>,
}

impl CandidateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; returns `true` when the id was not known before.
    pub fn upsert(&mut self, profile: CandidateProfile) -> bool {
        let id = profile.candidate_id.clone();
        match self.profiles.insert(id.clone(), profile) {
            Some(_) => false,
            None => {
                self.order.push(id);
                true
            }
        }
    }

    pub fn get(&self, candidate_id: &str) -> Option<&CandidateProfile> {
        self.profiles.get(candidate_id)
    }

    pub fn contains(&self, candidate_id: &str) -> bool {
        self.profiles.contains_key(candidate_id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CandidateProfile> {
        self.order.iter().filter_map(|id| self.profiles.get(id))
    }

    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.profiles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(id: &str, skills: &str) -> CandidateProfile {
        let raw = json!({"id": id, "skills": skills}).as_object().cloned().unwrap();
        CandidateProfile::from_raw(raw, "test.json")
    }

    #[test]
    fn test_upsert_keeps_first_position() {
        let mut store = CandidateStore::new();
        assert!(store.upsert(profile("a", "rust")));
        assert!(store.upsert(profile("b", "go")));
        assert!(!store.upsert(profile("a", "python")));

        assert_eq!(store.ids(), ["a", "b"]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a").unwrap().skills.as_deref(), Some("python"));
    }

    #[test]
    fn test_same_profile_twice_is_unchanged() {
        let mut store = CandidateStore::new();
        store.upsert(profile("a", "rust"));
        let before = store.get("a").cloned();
        store.upsert(profile("a", "rust"));
        assert_eq!(store.get("a").cloned(), before);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut store = CandidateStore::new();
        store.upsert(profile("a", "rust"));
        store.clear();
        assert!(store.is_empty());
        assert!(!store.contains("a"));
        assert_eq!(store.iter().count(), 0);
    }
}
