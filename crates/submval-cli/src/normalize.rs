use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use submval_core::{PROPERTY_TABLE_VERSION, PropertyTable, table_json_schema};

use crate::registry::{init_stderr_logging, write_json};
use crate::schema::SchemaArgs;
use crate::{CliError, RunStatus};

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,
    /// Write the JSON Schema of the exported table instead of the table.
    #[arg(long, default_value_t = false)]
    pub json_schema: bool,
    /// Output file; stdout when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Exported property table with its provenance.
#[derive(Debug, Serialize)]
pub struct NormalizedExport<'a> {
    pub version: &'static str,
    pub dialect: &'static str,
    pub fingerprint: String,
    pub properties: &'a PropertyTable,
}

pub fn run_normalize(args: NormalizeArgs) -> Result<RunStatus, CliError> {
    init_stderr_logging()?;

    let document = if args.json_schema {
        serde_json::to_value(table_json_schema())?
    } else {
        let resolved = args.schema.resolve()?;
        let table = resolved.source.normalize()?;
        let export = NormalizedExport {
            version: PROPERTY_TABLE_VERSION,
            dialect: resolved.source.dialect_name(),
            fingerprint: table.fingerprint()?,
            properties: &table,
        };
        serde_json::to_value(&export)?
    };

    match &args.out {
        Some(path) => {
            write_json(path, &document)?;
            tracing::info!(event = "normalized_written", path = %path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&document)?),
    }
    Ok(RunStatus::Clean)
}
