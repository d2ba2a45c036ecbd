use std::path::Path;

use submval_core::PropertyTable;

use crate::adapter::{SchemaDialect, normalize};
use crate::dictionary::DataDictionary;
use crate::error::ModelResult;
use crate::mdf::MdfDocuments;

/// A loaded schema description in one of the supported dialects.
#[derive(Debug, Clone)]
pub enum SchemaSource {
    Mdf(MdfDocuments),
    Dictionary(DataDictionary),
}

impl SchemaSource {
    pub fn mdf(model_path: &Path, props_path: &Path) -> ModelResult<Self> {
        MdfDocuments::from_paths(model_path, props_path).map(SchemaSource::Mdf)
    }

    pub fn dictionary(path: &Path) -> ModelResult<Self> {
        DataDictionary::from_path(path).map(SchemaSource::Dictionary)
    }

    fn dialect(&self) -> &dyn SchemaDialect {
        match self {
            SchemaSource::Mdf(docs) => docs,
            SchemaSource::Dictionary(dictionary) => dictionary,
        }
    }

    pub fn dialect_name(&self) -> &'static str {
        self.dialect().dialect()
    }

    /// Label/value pairs naming the schema files, in report order.
    pub fn identifiers(&self) -> Vec<(&'static str, String)> {
        match self {
            SchemaSource::Mdf(docs) => vec![
                ("Model YAML file", docs.model_file().to_string()),
                ("Model property YAML file", docs.props_file().to_string()),
            ],
            SchemaSource::Dictionary(dictionary) => {
                vec![("Data dictionary file", dictionary.file().to_string())]
            }
        }
    }

    /// Version declared inside the schema documents, if any.
    pub fn declared_version(&self) -> Option<String> {
        match self {
            SchemaSource::Mdf(docs) => docs.version(),
            SchemaSource::Dictionary(_) => None,
        }
    }

    pub fn normalize(&self) -> ModelResult<PropertyTable> {
        normalize(self.dialect())
    }
}
