use std::path::{Path, PathBuf};

use crate::error::{ModelError, ModelResult};
use crate::mdf::MdfDocuments;

/// Tag used when no version is requested.
pub const LATEST_TAG: &str = "latest";

/// Collaborator that locates the two MDF documents for a commons and tag.
pub trait SchemaFetcher {
    fn fetch_schema(&self, commons: &str, tag: Option<&str>) -> ModelResult<MdfDocuments>;
}

/// Resolves schemas from a local mirror laid out as
/// `<root>/<commons>/<tag>/<commons>-model.yml` and
/// `<root>/<commons>/<tag>/<commons>-model-props.yml`.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Paths of the model and property documents for `commons` at `tag`.
    pub fn document_paths(&self, commons: &str, tag: Option<&str>) -> (PathBuf, PathBuf) {
        let commons = commons.to_lowercase();
        let dir = self
            .root
            .join(&commons)
            .join(tag.unwrap_or(LATEST_TAG));
        (
            dir.join(format!("{commons}-model.yml")),
            dir.join(format!("{commons}-model-props.yml")),
        )
    }
}

impl SchemaFetcher for DirectoryFetcher {
    fn fetch_schema(&self, commons: &str, tag: Option<&str>) -> ModelResult<MdfDocuments> {
        let (model_path, props_path) = self.document_paths(commons, tag);
        for path in [&model_path, &props_path] {
            if !path.is_file() {
                return Err(ModelError::NotFound(path.display().to_string()));
            }
        }
        tracing::info!(
            event = "schema_fetched",
            commons = %commons,
            tag = tag.unwrap_or(LATEST_TAG),
            model = %model_path.display()
        );
        MdfDocuments::from_paths(&model_path, &props_path)
    }
}
