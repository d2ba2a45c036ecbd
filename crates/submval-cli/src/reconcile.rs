use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use submval_reconcile::{
    DbSnapshot, Level, ReconcileHeader, RegistrySnapshot, latest_version, load_snapshot,
    reconcile, render_markdown, validate_accession, validate_version,
};
use uuid::Uuid;

use crate::registry::{RunContext, RunOptions, init_run_logging, start_run, write_json, write_text};
use crate::{CliError, RunStatus};

const REPORT_FILE: &str = "reconcile_report.md";

#[derive(Args, Debug)]
pub struct ReconcileArgs {
    /// JSON snapshot of the study metadata held in the database.
    #[arg(long, value_name = "FILE")]
    pub db: PathBuf,
    /// JSON snapshot of the registry's participants and samples.
    #[arg(long, value_name = "FILE")]
    pub registry: PathBuf,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    pub run_dir: PathBuf,
    /// Additional path receiving a copy of the markdown report.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Exit with status 3 when any check reports ERROR.
    #[arg(long, default_value_t = false)]
    pub strict: bool,
}

pub fn run_reconcile(args: ReconcileArgs) -> Result<RunStatus, CliError> {
    let run_id = Uuid::new_v4().to_string();
    let started_at = Utc::now();
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at,
        run_dir: args.run_dir.clone(),
        options: RunOptions::Reconcile {
            db_snapshot: args.db.clone(),
            registry_snapshot: args.registry.clone(),
        },
    };
    let run_paths = start_run(&run_ctx)?;
    init_run_logging(&run_paths.logs_path)?;
    tracing::info!(event = "run_started", run_id = %run_id, command = "reconcile");

    let db: DbSnapshot = load_snapshot(&args.db)?;
    let registry: RegistrySnapshot = load_snapshot(&args.registry)?;
    validate_accession(&db.study_accession)?;
    let study_version = db
        .study_version
        .as_deref()
        .map(validate_version)
        .transpose()?;

    let results = reconcile(&db, &registry);
    let participant_count = db
        .participants
        .iter()
        .collect::<HashSet<_>>()
        .len();
    let header = ReconcileHeader {
        generated_at: started_at.format("%Y%m%d_T%H%M%S").to_string(),
        submission_id: db.submission_id.clone(),
        study_accession: db.study_accession.clone(),
        study_version,
        latest_registry_version: registry.versions.as_deref().and_then(latest_version),
        participant_count,
        sample_count: db.samples.len(),
    };
    let markdown = render_markdown(&header, &results);

    write_text(&run_paths.artifact(REPORT_FILE), &markdown)?;
    if let Some(out) = &args.out {
        write_text(out, &markdown)?;
    }

    let mut counts = BTreeMap::new();
    for result in &results {
        *counts.entry(result.level).or_insert(0usize) += 1;
    }
    write_json(&run_paths.summary_path, &counts)?;

    let errors = counts.get(&Level::Error).copied().unwrap_or(0);
    tracing::info!(
        event = "run_finished",
        checks = results.len(),
        errors = errors
    );

    if args.strict && errors > 0 {
        Ok(RunStatus::StrictFailure)
    } else {
        Ok(RunStatus::Clean)
    }
}
