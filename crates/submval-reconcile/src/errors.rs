use thiserror::Error;

/// One JSON Schema violation found in a snapshot document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotIssue {
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for SnapshotIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("schema error: {0}")]
    Schema(String),
    #[error("{kind} snapshot is invalid: {}", render_issues(.issues))]
    InvalidSnapshot {
        kind: &'static str,
        issues: Vec<SnapshotIssue>,
    },
    #[error("study accession '{0}' does not match phsNNNNNN")]
    InvalidAccession(String),
    #[error("study version '{0}' is not an integer")]
    InvalidVersion(String),
}

fn render_issues(issues: &[SnapshotIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type ReconcileResult<T> = Result<T, ReconcileError>;
