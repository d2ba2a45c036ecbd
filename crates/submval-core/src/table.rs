use schemars::JsonSchema;
use schemars::schema::RootSchema;
use schemars::schema_for;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::property::SchemaProperty;
use crate::validation::validate_properties;

/// Flat, validated table of schema properties shared read-only by all rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct PropertyTable {
    properties: Vec<SchemaProperty>,
}

impl PropertyTable {
    pub fn new(properties: Vec<SchemaProperty>) -> Result<Self> {
        validate_properties(&properties)?;
        Ok(Self { properties })
    }

    pub fn properties(&self) -> &[SchemaProperty] {
        &self.properties
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Node names in order of first appearance.
    pub fn nodes(&self) -> Vec<&str> {
        let mut nodes: Vec<&str> = Vec::new();
        for prop in &self.properties {
            if !nodes.contains(&prop.node.as_str()) {
                nodes.push(&prop.node);
            }
        }
        nodes
    }

    pub fn has_node(&self, node: &str) -> bool {
        self.properties.iter().any(|prop| prop.node == node)
    }

    pub fn get(&self, node: &str, property: &str) -> Option<&SchemaProperty> {
        self.properties
            .iter()
            .find(|prop| prop.node == node && prop.property == property)
    }

    pub fn for_node<'a, 'n>(
        &'a self,
        node: &'n str,
    ) -> impl Iterator<Item = &'a SchemaProperty> + use<'a, 'n> {
        self.properties.iter().filter(move |prop| prop.node == node)
    }

    /// Properties with `required == true`.
    pub fn required_properties(&self, node: &str) -> Vec<&SchemaProperty> {
        self.for_node(node)
            .filter(|prop| prop.required.is_true())
            .collect()
    }

    pub fn enum_properties(&self, node: &str) -> Vec<&SchemaProperty> {
        self.for_node(node)
            .filter(|prop| prop.property_type.is_enum())
            .collect()
    }

    /// Single-valued `integer` and `number` properties.
    pub fn numeric_properties(&self, node: &str) -> Vec<&SchemaProperty> {
        self.for_node(node)
            .filter(|prop| prop.property_type.numeric_kind().is_some())
            .collect()
    }

    /// Properties with `is_key == true`.
    pub fn key_properties(&self, node: &str) -> Vec<&SchemaProperty> {
        self.for_node(node)
            .filter(|prop| prop.is_key.is_true())
            .collect()
    }

    /// SHA-256 over the canonical JSON encoding of the table.
    pub fn fingerprint(&self) -> Result<String> {
        let encoded = serde_json::to_vec(&self.properties)?;
        Ok(hex::encode(Sha256::digest(&encoded)))
    }
}

/// JSON Schema of an exported property table.
pub fn table_json_schema() -> RootSchema {
    schema_for!(PropertyTable)
}
