use thiserror::Error;

/// Errors raised while reading or normalizing a schema description.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Core(#[from] submval_core::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("schema not found: {0}")]
    NotFound(String),
}

pub type ModelResult<T> = std::result::Result<T, ModelError>;
