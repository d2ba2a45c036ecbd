//! Reconciliation of study metadata held in the operational database against
//! the participant and sample registry.

pub mod accession;
pub mod compare;
pub mod errors;
pub mod markdown;
pub mod snapshot;

pub use accession::{latest_version, validate_accession, validate_version};
pub use compare::{CheckResult, Level, reconcile};
pub use errors::{ReconcileError, ReconcileResult, SnapshotIssue};
pub use markdown::{MarkdownTable, ReconcileHeader, render_markdown};
pub use snapshot::{
    DbSnapshot, RegistrySnapshot, Snapshot, load_snapshot, parse_snapshot, snapshot_schema,
};
