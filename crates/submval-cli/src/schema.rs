use std::path::PathBuf;

use clap::Args;
use submval_model::{DirectoryFetcher, SchemaFetcher, SchemaSource};

use crate::CliError;

/// Where the data model comes from.
#[derive(Args, Debug, Clone)]
pub struct SchemaArgs {
    /// Model YAML file.
    #[arg(long, requires = "props", conflicts_with_all = ["dictionary", "schema_root"])]
    pub model: Option<PathBuf>,
    /// Model property YAML file.
    #[arg(long, requires = "model")]
    pub props: Option<PathBuf>,
    /// Tab-separated data dictionary.
    #[arg(long, conflicts_with = "schema_root")]
    pub dictionary: Option<PathBuf>,
    /// Local model mirror laid out as `<root>/<commons>/<tag>/`.
    #[arg(long, requires = "commons")]
    pub schema_root: Option<PathBuf>,
    /// Model tag inside the mirror; `latest` when omitted.
    #[arg(long, requires = "schema_root")]
    pub tag: Option<String>,
    /// Commons acronym (icdc, ccdi, cds, c3dc, or one from --config).
    #[arg(long)]
    pub commons: Option<String>,
}

/// A loaded schema plus the tag to print in the report.
pub struct ResolvedSchema {
    pub source: SchemaSource,
    pub tag: Option<String>,
}

impl SchemaArgs {
    pub fn resolve(&self) -> Result<ResolvedSchema, CliError> {
        let source = match (&self.model, &self.props, &self.dictionary, &self.schema_root) {
            (Some(model), Some(props), None, None) => SchemaSource::mdf(model, props)?,
            (None, None, Some(dictionary), None) => SchemaSource::dictionary(dictionary)?,
            (None, None, None, Some(root)) => {
                let commons = self.commons.as_deref().ok_or_else(|| {
                    CliError::InvalidConfig("--schema-root needs --commons".to_string())
                })?;
                let docs = DirectoryFetcher::new(root).fetch_schema(commons, self.tag.as_deref())?;
                SchemaSource::Mdf(docs)
            }
            _ => {
                return Err(CliError::InvalidConfig(
                    "give --model with --props, --dictionary, or --schema-root".to_string(),
                ));
            }
        };

        let tag = self.tag.clone().or_else(|| source.declared_version());
        tracing::info!(
            event = "schema_loaded",
            dialect = source.dialect_name(),
            tag = tag.as_deref().unwrap_or("")
        );
        Ok(ResolvedSchema { source, tag })
    }
}
