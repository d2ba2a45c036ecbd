use thiserror::Error;

/// Errors emitted while loading submissions or evaluating rules.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The file has no `type` column, so its node type is unknown.
    #[error("{file}: missing mandatory 'type' column")]
    MissingTypeColumn { file: String },
    /// The `type` column is empty or names more than one node type.
    #[error("{file}: 'type' column must hold exactly one node type, found [{found}]")]
    AmbiguousNodeType { file: String, found: String },
    /// Two files declare the same node type.
    #[error("node type '{node_type}' is declared by both {first} and {second}")]
    DuplicateNodeType {
        node_type: String,
        first: String,
        second: String,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl EvalError {
    /// Whether the error rejects a single file rather than the whole run.
    pub fn is_file_rejection(&self) -> bool {
        matches!(
            self,
            EvalError::MissingTypeColumn { .. }
                | EvalError::AmbiguousNodeType { .. }
                | EvalError::Csv(_)
        )
    }
}

pub type EvalResult<T> = std::result::Result<T, EvalError>;
