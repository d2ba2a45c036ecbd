use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use jsonschema::JSONSchema;
use schemars::JsonSchema;
use schemars::schema::RootSchema;
use schemars::schema_for;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ReconcileError, ReconcileResult, SnapshotIssue};

/// Study metadata as held by the operational database for one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DbSnapshot {
    pub submission_id: String,
    pub study_accession: String,
    /// Integer version recorded with the study; absent or `0` when unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_version: Option<String>,
    pub participants: Vec<String>,
    /// Sample id to participant id.
    #[serde(default)]
    pub samples: BTreeMap<String, String>,
}

/// Participants and samples registered for a study in the remote registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RegistrySnapshot {
    /// Version strings published for the study, e.g. `phs000123.v1.p1|phs000123.v3`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versions: Option<String>,
    /// Participant id to consent code.
    pub participants: BTreeMap<String, i64>,
    /// Sample id to participant id.
    #[serde(default)]
    pub samples: BTreeMap<String, String>,
}

/// A snapshot document that can be checked against its derived JSON Schema.
pub trait Snapshot: DeserializeOwned + JsonSchema {
    const KIND: &'static str;
}

impl Snapshot for DbSnapshot {
    const KIND: &'static str = "database";
}

impl Snapshot for RegistrySnapshot {
    const KIND: &'static str = "registry";
}

/// JSON Schema of a snapshot document.
pub fn snapshot_schema<T: Snapshot>() -> RootSchema {
    schema_for!(T)
}

/// Check a snapshot document against its JSON Schema, then decode it.
pub fn parse_snapshot<T: Snapshot>(json: &Value) -> ReconcileResult<T> {
    let schema = serde_json::to_value(snapshot_schema::<T>())?;
    let compiled =
        JSONSchema::compile(&schema).map_err(|err| ReconcileError::Schema(err.to_string()))?;

    if let Err(errors) = compiled.validate(json) {
        let issues = errors
            .map(|error| SnapshotIssue {
                path: normalized_json_pointer(&error.instance_path.to_string()),
                message: error.to_string(),
            })
            .collect::<Vec<_>>();
        return Err(ReconcileError::InvalidSnapshot {
            kind: T::KIND,
            issues,
        });
    }

    Ok(serde_json::from_value(json.clone())?)
}

/// Read and check a snapshot file.
pub fn load_snapshot<T: Snapshot>(path: &Path) -> ReconcileResult<T> {
    let raw = fs::read_to_string(path)?;
    let json: Value = serde_json::from_str(&raw)?;
    let snapshot = parse_snapshot::<T>(&json)?;
    tracing::info!(
        event = "snapshot_loaded",
        kind = T::KIND,
        path = %path.display()
    );
    Ok(snapshot)
}

fn normalized_json_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}
