use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use submval_reconcile::compare::{
    participants_missing_from_registry, participants_without_consent,
    registry_participants_missing_from_db, registry_samples_missing_from_db,
    sample_participant_mismatch, samples_missing_from_registry,
};
use submval_reconcile::{
    DbSnapshot, Level, ReconcileError, ReconcileHeader, RegistrySnapshot, load_snapshot,
    reconcile, render_markdown,
};

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn consents(pairs: &[(&str, i64)]) -> BTreeMap<String, i64> {
    pairs
        .iter()
        .map(|(id, consent)| (id.to_string(), *consent))
        .collect()
}

fn samples(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(sample, participant)| (sample.to_string(), participant.to_string()))
        .collect()
}

fn temp_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("submval_reconcile_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

#[test]
fn unregistered_db_participants_are_errors() {
    let registry = consents(&[("ptc_1", 0), ("ptc_2", 1)]);

    let result = participants_missing_from_registry(&ids(&["ptc_1", "ptc_2", "ptc_3"]), &registry);
    assert_eq!(result.level, Level::Error);
    assert!(result.to_markdown().starts_with("ERROR: Found 1 participant(s)"));
    assert!(result.to_markdown().contains("| ptc_3          |"));

    let result = participants_missing_from_registry(&ids(&["ptc_1", "ptc_2"]), &registry);
    assert_eq!(result.to_markdown(), "INFO: All participants in DB found in dbGaP");
}

#[test]
fn consented_registry_participants_must_exist_in_db() {
    let result = registry_participants_missing_from_db(
        &ids(&["ptc_1", "ptc_2"]),
        &consents(&[("ptc_1", 0), ("ptc_2", 1), ("ptc_3", 1), ("ptc_4", 1)]),
    );
    assert_eq!(result.level, Level::Warning);
    assert!(
        result
            .message
            .starts_with("Found 2 participant(s) in dbGaP (consent non-0) but not in DB")
    );

    let result = registry_participants_missing_from_db(
        &ids(&["ptc_2", "ptc_3"]),
        &consents(&[("ptc_1", 0), ("ptc_2", 1)]),
    );
    assert_eq!(result.level, Level::Info);
}

#[test]
fn consent_zero_and_no_overlap_are_errors() {
    let db = ids(&["ptc_1", "ptc_2", "ptc_3"]);

    let result = participants_without_consent(&db, &consents(&[("ptc_1", 0), ("ptc_2", 1)]));
    assert_eq!(result.level, Level::Error);
    assert!(result.message.starts_with("Found 1 participant(s) in DB"));

    let result = participants_without_consent(&db, &consents(&[("ptc_1", 1), ("ptc_2", 1)]));
    assert_eq!(result.message, "All participants in DB have consent code non-0");

    let result = participants_without_consent(&db, &consents(&[("ptc_4", 1), ("ptc_5", 1)]));
    assert_eq!(result.level, Level::Error);
    assert!(result.message.starts_with("No overlap of participants found"));
}

#[test]
fn unregistered_samples_report_both_groups() {
    let results = samples_missing_from_registry(
        &samples(&[("sample_1", "ptc_1"), ("sample_2", "ptc_2"), ("sample_3", "ptc_3")]),
        &samples(&[("sample_2", "ptc_2")]),
        &consents(&[("ptc_1", 1), ("ptc_2", 1)]),
    );
    let levels = results.iter().map(|result| result.level).collect::<Vec<_>>();
    assert_eq!(levels, vec![Level::Warning, Level::Error]);
    assert!(results[0].to_markdown().starts_with("WARNING: 1 Sample(s)"));
    assert!(results[1].to_markdown().starts_with("ERROR: 1 Sample(s)"));
    assert!(results[1].to_markdown().contains("| sample_3 | ptc_3       |"));

    let results = samples_missing_from_registry(
        &samples(&[("sample_1", "ptc_1")]),
        &samples(&[("sample_1", "ptc_1"), ("sample_4", "ptc_4")]),
        &consents(&[("ptc_1", 1)]),
    );
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].message, "Samples in DB passed validation");
}

#[test]
fn registry_samples_missing_from_db_warn() {
    let db = samples(&[("sample_2", "ptc_2"), ("sample_3", "ptc_3")]);

    let result = registry_samples_missing_from_db(
        &db,
        &samples(&[
            ("sample_1", "ptc_1"),
            ("sample_2", "ptc_2"),
            ("sample_3", "ptc_3"),
            ("sample_4", "ptc_4"),
        ]),
    );
    assert!(result.to_markdown().starts_with("WARNING: 2 Sample(s) "));

    let result = registry_samples_missing_from_db(&db, &db);
    assert_eq!(result.level, Level::Info);
}

#[test]
fn sample_participants_must_agree() {
    let db = samples(&[("sample_1", "ptc_1"), ("sample_2", "ptc_2"), ("sample_3", "ptc_3")]);

    let result = sample_participant_mismatch(
        &db,
        &samples(&[("sample_1", "ptc_1"), ("sample_3", "ptc_4")]),
    );
    assert_eq!(result.level, Level::Error);
    let table = result.table.expect("mismatch table");
    assert_eq!(table.headers, vec!["Sample", "dbGaP_subject_id", "DB_subject_id"]);
    assert_eq!(table.rows, vec![vec!["sample_3", "ptc_4", "ptc_3"]]);

    let result = sample_participant_mismatch(
        &db,
        &samples(&[("sample_1", "ptc_1"), ("sample_3", "ptc_3")]),
    );
    assert_eq!(result.level, Level::Info);

    let result = sample_participant_mismatch(
        &db,
        &samples(&[("sample_4", "ptc_1"), ("sample_5", "ptc_3")]),
    );
    assert_eq!(result.message, "No overlap of samples found between DB and dbGaP");
}

#[test]
fn full_reconciliation_renders_markdown() {
    let dir = temp_dir("full");
    let db_path = dir.join("db.json");
    let registry_path = dir.join("registry.json");
    fs::write(
        &db_path,
        r#"{
  "submission_id": "sub-1",
  "study_accession": "phs000123",
  "study_version": "0",
  "participants": ["ptc_1", "ptc_2", "ptc_1"],
  "samples": {"sample_1": "ptc_1", "sample_2": "ptc_2"}
}"#,
    )
    .expect("write db");
    fs::write(
        &registry_path,
        r#"{
  "versions": "phs000123.v1.p1|phs000123.v3",
  "participants": {"ptc_1": 1, "ptc_2": 1},
  "samples": {"sample_1": "ptc_1", "sample_2": "ptc_2"}
}"#,
    )
    .expect("write registry");

    let db: DbSnapshot = load_snapshot(&db_path).expect("db snapshot");
    let registry: RegistrySnapshot = load_snapshot(&registry_path).expect("registry snapshot");
    let results = reconcile(&db, &registry);
    assert_eq!(results.len(), 6);
    assert!(results.iter().all(|result| result.level == Level::Info));

    let header = ReconcileHeader {
        generated_at: "2026-01-01T00:00:00Z".to_string(),
        submission_id: db.submission_id.clone(),
        study_accession: db.study_accession.clone(),
        study_version: Some(0),
        latest_registry_version: submval_reconcile::latest_version(
            registry.versions.as_deref().unwrap_or(""),
        ),
        participant_count: 2,
        sample_count: db.samples.len(),
    };
    let markdown = render_markdown(&header, &results);
    assert!(markdown.starts_with("# Metadata Validation Report - 2026-01-01T00:00:00Z\n"));
    assert!(markdown.contains("- **dbGaP version in DB**\n    - Not Found [WARNING:"));
    assert!(markdown.contains("- **Latest dbGaP version**\n    - 3\n"));
    assert!(markdown.contains("INFO: Samples' participant ids match between DB and dbGaP"));
}

#[test]
fn malformed_snapshot_is_rejected() {
    let dir = temp_dir("malformed");
    let path = dir.join("registry.json");
    fs::write(&path, r#"{"participants": ["ptc_1"]}"#).expect("write registry");

    let err = load_snapshot::<RegistrySnapshot>(&path).expect_err("participants must be a map");
    assert!(matches!(
        err,
        ReconcileError::InvalidSnapshot {
            kind: "registry",
            ..
        }
    ));
}
