mod config;
mod normalize;
mod reconcile;
mod registry;
mod schema;
mod validate;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use submval_core::Error as CoreError;
use submval_eval::EvalError;
use submval_model::ModelError;
use submval_reconcile::ReconcileError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("schema error: {0}")]
    Model(#[from] ModelError),
    #[error("submission error: {0}")]
    Eval(#[from] EvalError),
    #[error("reconciliation error: {0}")]
    Reconcile(#[from] ReconcileError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// How a command that produced its output finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Clean,
    /// Files were rejected or node types collided.
    Structural,
    /// `--strict` was given and ERROR findings were recorded.
    StrictFailure,
}

impl RunStatus {
    pub fn code(self) -> u8 {
        match self {
            RunStatus::Clean => 0,
            RunStatus::Structural => 2,
            RunStatus::StrictFailure => 3,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "submval", version, about = "Submission validation against data models")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a folder of submission files and write a report.
    Validate(validate::ValidateArgs),
    /// Print the normalized property table of a schema.
    Normalize(normalize::NormalizeArgs),
    /// Compare database study metadata with the registry.
    Reconcile(reconcile::ReconcileArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Validate(args) => validate::run_validate(args),
        Command::Normalize(args) => normalize::run_normalize(args),
        Command::Reconcile(args) => reconcile::run_reconcile(args),
    };

    match result {
        Ok(status) => ExitCode::from(status.code()),
        Err(err) => {
            tracing::error!(event = "run_failed", error = %err);
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}
