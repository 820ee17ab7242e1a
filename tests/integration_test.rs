// Integration tests for talentx
use serde_json::json;
use std::fs;
use std::sync::Arc;
use talentx::prelude::*;
use talentx::{collect_json_files, ExpAggMode, IngestReport, ProfileError, ScoringError};

fn engine() -> ScoringEngine {
    ScoringEngine::new(Arc::new(HashingEmbedder::default()), EngineConfig::default()).unwrap()
}

#[test]
fn test_folder_with_mixed_shapes() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("01_plain.json"),
        r#"{"candidate_id": "alice", "skills": ["python", "machine learning"]}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("02_wrapped.json"),
        r#"{"results": [
            {"person": {"profile_url": "https://example.com/in/bob",
                        "experience": {"positions": [{"job_title": "Backend Engineer", "employer": "Acme"}]}}},
            "{'uid': 'carol', 'education': [{'university': 'ETH', 'major': 'CS'}], 'langs': ['German', 'English - fluent']}"
        ]}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("03_single.json"),
        r#"{"url": "https://example.com/in/dave", "result": {"summary": "Rust and embedded systems engineer"}}"#,
    )
    .unwrap();
    fs::write(dir.path().join("04_broken.json"), "{not json").unwrap();
    fs::write(dir.path().join("05_empty.json"), r#"{"results": []}"#).unwrap();
    fs::write(dir.path().join("eve.json"), r#"{"skills": "go"}"#).unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let mut engine = engine();
    let report = engine.load_folder(dir.path()).unwrap();
    assert_eq!(report.sources_skipped, 1);
    assert_eq!(report.new_candidates, 6);

    let ids = engine.store().ids().to_vec();
    assert_eq!(
        ids,
        vec![
            "alice",
            "https://example.com/in/bob",
            "carol",
            "https://example.com/in/dave",
            "05_empty",
            "eve"
        ]
    );

    let carol = engine.store().get("carol").unwrap();
    assert_eq!(carol.education.as_deref(), Some("ETH | CS"));
    assert_eq!(carol.languages.len(), 2);
    assert_eq!(carol.languages[1].level, 2.0);

    let bob = engine.store().get("https://example.com/in/bob").unwrap();
    assert_eq!(bob.experience, vec!["Backend Engineer | Acme"]);
}

#[test]
fn test_alice_and_bob_scenario() {
    let mut engine = engine();
    engine
        .add_sources(&[ProfileSource::new(
            "batch",
            json!([
                {"id": "alice", "skills": "python machine learning"},
                {"id": "bob", "experience": ["Backend Engineer | Acme | 2019-2021 | | python, go | built APIs"]}
            ]),
        )])
        .unwrap();

    let results = engine.score("python backend engineer", &ScoreOptions::default()).unwrap();
    let alice = results.iter().find(|r| r.candidate_id == "alice").unwrap();
    let bob = results.iter().find(|r| r.candidate_id == "bob").unwrap();

    assert!(bob.breakdown.experience > 0.0);
    assert!(alice.breakdown.skills > 0.0);
    assert_eq!(alice.breakdown.languages, 0.0);
    assert_eq!(bob.breakdown.languages, 0.0);
}

#[test]
fn test_identity_prefers_id_over_url() {
    let source = ProfileSource::new(
        "people/x.json",
        json!({"url": "https://example.com/in/zed", "id": "zed-1", "skills": "sql"}),
    );
    let profiles = source.profiles().unwrap();
    assert_eq!(profiles[0].candidate_id, "zed-1");
}

#[test]
fn test_weights_and_language_scenarios() {
    let mut engine = engine();
    engine
        .add_sources(&[ProfileSource::new(
            "batch",
            json!([
                {"id": "en", "skills": "technical writing", "languages": [{"language": "English", "level": "native"}]},
                {"id": "fr", "skills": "writing", "languages": {"French": "native"}}
            ]),
        )])
        .unwrap();

    let results = engine.score("Technical writer, English", &ScoreOptions::default()).unwrap();
    let en = results.iter().find(|r| r.candidate_id == "en").unwrap();
    let fr = results.iter().find(|r| r.candidate_id == "fr").unwrap();
    assert_eq!(en.breakdown.languages, 1.0);
    assert_eq!(fr.breakdown.languages, 0.5);

    let skills_only = ScoreOptions::default().with_weights(ScoreWeights::from_pairs([("skills", 1.0)]));
    for r in engine.score("Technical writer, English", &skills_only).unwrap() {
        assert_eq!(r.score, r.breakdown.skills);
    }
}

#[test]
fn test_reload_replaces_stale_snippets() {
    let mut engine = engine();
    let first = ProfileSource::new("v1", json!({"id": "sam", "skills": "cobol mainframe"}));
    let second = ProfileSource::new("v2", json!({"id": "sam", "skills": "react typescript"}));

    engine.add_sources(&[first]).unwrap();
    let report: IngestReport = engine.add_sources(&[second]).unwrap();
    assert_eq!(report.entries_retired, 1);

    let skills = engine.index(Section::Skills);
    assert_eq!(skills.count(), 2);
    assert_eq!(skills.live_count(), 1);

    let results = engine.score("cobol mainframe", &ScoreOptions::default()).unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].breakdown.skills < 0.5);
}

#[test]
fn test_empty_engine_and_bad_config() {
    let engine = engine();
    assert!(engine.score("anything", &ScoreOptions::default()).unwrap().is_empty());

    let err = "avg".parse::<ExpAggMode>().unwrap_err();
    assert!(matches!(err, ScoringError::InvalidConfig { ref field, .. } if field == "exp_agg_mode"));

    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        collect_json_files(dir.path()),
        Err(ProfileError::NoJsonFiles(_))
    ));
}
