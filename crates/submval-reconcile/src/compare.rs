use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::markdown::MarkdownTable;
use crate::snapshot::{DbSnapshot, RegistrySnapshot};

const PARTICIPANT_HEADERS: [&str; 1] = ["Participant ID"];
const SAMPLE_HEADERS: [&str; 2] = ["Sample", "Participant"];
const MISMATCH_HEADERS: [&str; 3] = ["Sample", "dbGaP_subject_id", "DB_subject_id"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one reconciliation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub check: &'static str,
    pub level: Level,
    pub message: String,
    pub table: Option<MarkdownTable>,
}

impl CheckResult {
    fn new(check: &'static str, level: Level, message: impl Into<String>) -> Self {
        Self {
            check,
            level,
            message: message.into(),
            table: None,
        }
    }

    fn with_table(mut self, table: MarkdownTable) -> Self {
        self.table = Some(table);
        self
    }

    /// `LEVEL: message`, followed by the offending ids when present.
    pub fn to_markdown(&self) -> String {
        match &self.table {
            Some(table) => format!("{}: {}\n{}", self.level, self.message, table.render()),
            None => format!("{}: {}", self.level, self.message),
        }
    }
}

/// Run every check in report order.
pub fn reconcile(db: &DbSnapshot, registry: &RegistrySnapshot) -> Vec<CheckResult> {
    let participants = distinct(&db.participants);
    let mut results = vec![
        participants_missing_from_registry(&participants, &registry.participants),
        registry_participants_missing_from_db(&participants, &registry.participants),
        participants_without_consent(&participants, &registry.participants),
    ];
    results.extend(samples_missing_from_registry(
        &db.samples,
        &registry.samples,
        &registry.participants,
    ));
    results.push(registry_samples_missing_from_db(
        &db.samples,
        &registry.samples,
    ));
    results.push(sample_participant_mismatch(&db.samples, &registry.samples));

    for result in &results {
        tracing::debug!(
            event = "reconcile_check",
            check = result.check,
            level = result.level.as_str(),
            rows = result.table.as_ref().map_or(0, MarkdownTable::len)
        );
    }
    results
}

/// Participants present in the database but never registered.
pub fn participants_missing_from_registry(
    db_participants: &[String],
    registry: &BTreeMap<String, i64>,
) -> CheckResult {
    const CHECK: &str = "participants_missing_from_registry";
    let missing = db_participants
        .iter()
        .filter(|id| !registry.contains_key(id.as_str()))
        .collect::<Vec<_>>();
    if missing.is_empty() {
        return CheckResult::new(CHECK, Level::Info, "All participants in DB found in dbGaP");
    }
    CheckResult::new(
        CHECK,
        Level::Error,
        format!(
            "Found {} participant(s) in DB but not in dbGaP.",
            missing.len()
        ),
    )
    .with_table(participant_table(missing))
}

/// Registered participants with a non-zero consent code that the database lacks.
pub fn registry_participants_missing_from_db(
    db_participants: &[String],
    registry: &BTreeMap<String, i64>,
) -> CheckResult {
    const CHECK: &str = "registry_participants_missing_from_db";
    let known = db_participants.iter().collect::<HashSet<_>>();
    let missing = registry
        .iter()
        .filter(|(id, consent)| **consent != 0 && !known.contains(id))
        .map(|(id, _)| id)
        .collect::<Vec<_>>();
    if missing.is_empty() {
        return CheckResult::new(
            CHECK,
            Level::Info,
            "ALL participants in dbGaP (consent non-0) were found in DB",
        );
    }
    CheckResult::new(
        CHECK,
        Level::Warning,
        format!(
            "Found {} participant(s) in dbGaP (consent non-0) but not in DB.",
            missing.len()
        ),
    )
    .with_table(participant_table(missing))
}

/// Participants known to both sides whose registered consent code is 0.
pub fn participants_without_consent(
    db_participants: &[String],
    registry: &BTreeMap<String, i64>,
) -> CheckResult {
    const CHECK: &str = "participants_without_consent";
    let shared = db_participants
        .iter()
        .filter_map(|id| registry.get(id.as_str()).map(|consent| (id, *consent)))
        .collect::<Vec<_>>();
    if shared.is_empty() {
        return CheckResult::new(
            CHECK,
            Level::Error,
            "No overlap of participants found between DB and dbGaP",
        );
    }
    let zero = shared
        .into_iter()
        .filter(|(_, consent)| *consent == 0)
        .map(|(id, _)| id)
        .collect::<Vec<_>>();
    if zero.is_empty() {
        return CheckResult::new(
            CHECK,
            Level::Info,
            "All participants in DB have consent code non-0",
        );
    }
    CheckResult::new(
        CHECK,
        Level::Error,
        format!(
            "Found {} participant(s) in DB with consent code of 0 in dbGaP.",
            zero.len()
        ),
    )
    .with_table(participant_table(zero))
}

/// Database samples the registry does not list, split by whether their
/// participant is registered. Yields one result per non-empty group.
pub fn samples_missing_from_registry(
    db_samples: &BTreeMap<String, String>,
    registry_samples: &BTreeMap<String, String>,
    registry_participants: &BTreeMap<String, i64>,
) -> Vec<CheckResult> {
    const CHECK: &str = "samples_missing_from_registry";
    let mut registered = MarkdownTable::new(&SAMPLE_HEADERS);
    let mut unregistered = MarkdownTable::new(&SAMPLE_HEADERS);
    for (sample, participant) in db_samples {
        if registry_samples.contains_key(sample) {
            continue;
        }
        let row = [sample.as_str(), participant.as_str()];
        if registry_participants.contains_key(participant) {
            registered.push_row(row);
        } else {
            unregistered.push_row(row);
        }
    }

    if registered.is_empty() && unregistered.is_empty() {
        return vec![CheckResult::new(
            CHECK,
            Level::Info,
            "Samples in DB passed validation",
        )];
    }

    let mut results = Vec::new();
    if !registered.is_empty() {
        results.push(
            CheckResult::new(
                CHECK,
                Level::Warning,
                format!(
                    "{} Sample(s) found in DB but not in dbGaP. However, they belong to participants registered in dbGaP.",
                    registered.len()
                ),
            )
            .with_table(registered),
        );
    }
    if !unregistered.is_empty() {
        results.push(
            CheckResult::new(
                CHECK,
                Level::Error,
                format!(
                    "{} Sample(s) found in DB but not in dbGaP. They belong to participants NOT registered in dbGaP.",
                    unregistered.len()
                ),
            )
            .with_table(unregistered),
        );
    }
    results
}

/// Registered samples absent from the database.
pub fn registry_samples_missing_from_db(
    db_samples: &BTreeMap<String, String>,
    registry_samples: &BTreeMap<String, String>,
) -> CheckResult {
    const CHECK: &str = "registry_samples_missing_from_db";
    let mut missing = MarkdownTable::new(&SAMPLE_HEADERS);
    for (sample, participant) in registry_samples {
        if !db_samples.contains_key(sample) {
            missing.push_row([sample.as_str(), participant.as_str()]);
        }
    }
    if missing.is_empty() {
        return CheckResult::new(CHECK, Level::Info, "Samples in dbGaP were all found in DB");
    }
    CheckResult::new(
        CHECK,
        Level::Warning,
        format!(
            "{} Sample(s) found in dbGaP but not found in DB.",
            missing.len()
        ),
    )
    .with_table(missing)
}

/// Samples on both sides that point at different participants.
pub fn sample_participant_mismatch(
    db_samples: &BTreeMap<String, String>,
    registry_samples: &BTreeMap<String, String>,
) -> CheckResult {
    const CHECK: &str = "sample_participant_mismatch";
    let mut overlap = false;
    let mut mismatched = MarkdownTable::new(&MISMATCH_HEADERS);
    for (sample, db_participant) in db_samples {
        let Some(registry_participant) = registry_samples.get(sample) else {
            continue;
        };
        overlap = true;
        if registry_participant != db_participant {
            mismatched.push_row([
                sample.as_str(),
                registry_participant.as_str(),
                db_participant.as_str(),
            ]);
        }
    }

    if !overlap {
        return CheckResult::new(
            CHECK,
            Level::Error,
            "No overlap of samples found between DB and dbGaP",
        );
    }
    if mismatched.is_empty() {
        return CheckResult::new(
            CHECK,
            Level::Info,
            "Samples' participant ids match between DB and dbGaP",
        );
    }
    CheckResult::new(
        CHECK,
        Level::Error,
        "Samples found associated with different participant ids between DB and dbGaP",
    )
    .with_table(mismatched)
}

fn participant_table<S: AsRef<str>>(ids: Vec<S>) -> MarkdownTable {
    let mut table = MarkdownTable::new(&PARTICIPANT_HEADERS);
    for id in ids {
        table.push_row([id.as_ref()]);
    }
    table
}

fn distinct(values: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .iter()
        .filter(|value| seen.insert(*value))
        .cloned()
        .collect()
}
