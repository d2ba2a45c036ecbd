use submval_core::{PropertyTable, SchemaProperty};

use crate::error::ModelResult;

/// Trait implemented by schema dialects that can be normalized into
/// canonical properties.
pub trait SchemaDialect {
    /// Returns the dialect identifier (e.g. `mdf`).
    fn dialect(&self) -> &'static str;

    /// Produce one canonical property per `(node, property)` pair.
    fn properties(&self) -> ModelResult<Vec<SchemaProperty>>;
}

/// Normalize a dialect into a validated property table.
pub fn normalize(dialect: &dyn SchemaDialect) -> ModelResult<PropertyTable> {
    let properties = dialect.properties()?;
    tracing::debug!(
        event = "schema_normalized",
        dialect = dialect.dialect(),
        properties = properties.len()
    );
    Ok(PropertyTable::new(properties)?)
}
