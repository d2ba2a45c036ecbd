use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use clap::Args;
use submval_core::DEFAULT_DELIMITER;
use submval_eval::{
    ReportHeader, Severity, Summary, ValidateOptions, ValidationEngine, discover_submission,
    render_report,
};
use uuid::Uuid;

use crate::config::load_settings;
use crate::registry::{RunContext, RunOptions, init_run_logging, start_run, write_json, write_text};
use crate::schema::SchemaArgs;
use crate::{CliError, RunStatus};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Folder holding the submission's `.tsv`/`.txt` files.
    pub folder: PathBuf,
    #[command(flatten)]
    pub schema: SchemaArgs,
    /// TOML file with commons and validation settings.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Node type to leave out of validation; repeatable.
    #[arg(long = "exclude-node", value_name = "NODE_TYPE")]
    pub exclude_node: Vec<String>,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    pub run_dir: PathBuf,
    /// Additional directory receiving a copy of the report.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
    /// Exit with status 3 when any ERROR finding is recorded.
    #[arg(long, default_value_t = false)]
    pub strict: bool,
    /// Check files one at a time.
    #[arg(long, default_value_t = false)]
    pub sequential: bool,
}

pub fn run_validate(args: ValidateArgs) -> Result<RunStatus, CliError> {
    let settings = load_settings(args.config.as_deref())?;
    let delimiter = match &args.schema.commons {
        Some(commons) => settings.commons_config().delimiter(commons)?,
        None => DEFAULT_DELIMITER,
    };
    let parallel = !(args.sequential || settings.validate.sequential);
    let mut exclude_node_types = settings.validate.exclude_node_types.clone();
    for node in &args.exclude_node {
        if !exclude_node_types.contains(node) {
            exclude_node_types.push(node.clone());
        }
    }

    let run_id = Uuid::new_v4().to_string();
    let started_at = Utc::now();
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at,
        run_dir: args.run_dir.clone(),
        options: RunOptions::Validate {
            folder: args.folder.clone(),
            schema_dialect: schema_dialect_label(&args.schema).to_string(),
            schema_files: schema_file_labels(&args.schema),
            commons: args.schema.commons.clone(),
            delimiter,
            model_tag: args.schema.tag.clone(),
            exclude_node_types: exclude_node_types.clone(),
            strict: args.strict,
            parallel,
        },
    };
    let run_paths = start_run(&run_ctx)?;
    init_run_logging(&run_paths.logs_path)?;
    tracing::info!(event = "run_started", run_id = %run_id, command = "validate");
    let timer = Instant::now();

    let resolved = args.schema.resolve()?;
    let table = resolved.source.normalize()?;
    let fingerprint = table.fingerprint()?;
    tracing::info!(
        event = "schema_normalized",
        properties = table.len(),
        nodes = table.nodes().len(),
        fingerprint = %fingerprint
    );

    let submission = discover_submission(&args.folder, &exclude_node_types)?;
    let engine = ValidationEngine::new(ValidateOptions {
        delimiter,
        parallel,
    });
    let outcome = engine.run(&table, &submission);

    let file_name = report_file_name(&args.folder, started_at);
    let run_report = run_paths.artifact(&file_name);
    let published = args.out_dir.as_ref().map(|dir| dir.join(&file_name));
    let header = ReportHeader {
        report_path: published
            .as_ref()
            .unwrap_or(&run_report)
            .display()
            .to_string(),
        folder: args.folder.display().to_string(),
        schema_files: resolved
            .source
            .identifiers()
            .into_iter()
            .map(|(label, path)| (label.to_string(), path))
            .collect(),
        model_tag: resolved.tag.clone(),
    };
    let report = render_report(&header, &outcome);

    write_text(&run_report, &report)?;
    if let Some(path) = &published {
        write_text(path, &report)?;
    }
    tracing::info!(event = "report_written", path = %header.report_path);

    write_json(&run_paths.summary_path, &outcome.summary)?;
    tracing::info!(event = "summary_written", path = %run_paths.summary_path.display());

    let status = run_status(&outcome.summary, args.strict);
    tracing::info!(
        event = "run_finished",
        status = status.code(),
        errors = outcome.summary.count(Severity::Error),
        warnings = outcome.summary.count(Severity::Warning),
        duration_ms = timer.elapsed().as_millis() as u64
    );
    Ok(status)
}

/// `<folder name>_validation_report_<YYYYMMDD>.txt`
pub fn report_file_name(folder: &Path, date: DateTime<Utc>) -> String {
    let name = folder
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "submission".to_string());
    format!("{name}_validation_report_{}.txt", date.format("%Y%m%d"))
}

/// Structural problems outrank the strict ERROR check.
pub fn run_status(summary: &Summary, strict: bool) -> RunStatus {
    if summary.has_structural_problems() {
        RunStatus::Structural
    } else if strict && summary.count(Severity::Error) > 0 {
        RunStatus::StrictFailure
    } else {
        RunStatus::Clean
    }
}

fn schema_dialect_label(schema: &SchemaArgs) -> &'static str {
    if schema.dictionary.is_some() {
        "dictionary"
    } else {
        "mdf"
    }
}

fn schema_file_labels(schema: &SchemaArgs) -> Vec<String> {
    [&schema.model, &schema.props, &schema.dictionary, &schema.schema_root]
        .into_iter()
        .flatten()
        .map(|path| path.display().to_string())
        .collect()
}
