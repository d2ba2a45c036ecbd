use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::property::SchemaProperty;

/// Validate internal consistency of a normalized property table.
///
/// This checks:
/// - node and property names are non-empty
/// - `(node, property)` pairs are unique
/// - allowed values are only present on enumerated types
pub fn validate_properties(properties: &[SchemaProperty]) -> Result<()> {
    let mut seen = BTreeSet::new();

    for prop in properties {
        if prop.node.trim().is_empty() || prop.property.trim().is_empty() {
            return Err(Error::InvalidSchema(format!(
                "empty node or property name: '{}.{}'",
                prop.node, prop.property
            )));
        }

        if !seen.insert((prop.node.as_str(), prop.property.as_str())) {
            return Err(Error::DuplicateProperty {
                node: prop.node.clone(),
                property: prop.property.clone(),
            });
        }

        if !prop.property_type.is_enum() && !prop.allowed_values.is_empty() {
            return Err(Error::InvalidSchema(format!(
                "allowed values declared on non-enumerated property {}.{} ({})",
                prop.node, prop.property, prop.property_type
            )));
        }
    }

    Ok(())
}
