use thiserror::Error;

/// Core error type shared across submval crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A property declares a type structure outside the known type kinds.
    #[error("schema format error at {node}.{property}: {message}")]
    SchemaFormat {
        node: String,
        property: String,
        message: String,
    },
    /// The same property is declared twice for one node.
    #[error("duplicate property: {node}.{property}")]
    DuplicateProperty { node: String, property: String },
    /// A canonical type string could not be parsed.
    #[error("unrecognized property type: {0}")]
    UnknownType(String),
    /// The schema document violates structural expectations.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// No commons features are configured for this acronym.
    #[error("unknown commons acronym: {0}")]
    UnknownCommons(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn schema_format(
        node: impl Into<String>,
        property: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::SchemaFormat {
            node: node.into(),
            property: property.into(),
            message: message.into(),
        }
    }
}

/// Convenience alias for results returned by submval crates.
pub type Result<T> = std::result::Result<T, Error>;
