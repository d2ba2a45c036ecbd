//! Model Description Format: a node/property structure document plus a
//! property definitions document, both YAML.

mod mapper;

use std::collections::HashMap;
use std::path::Path;

use serde_yaml::{Mapping, Value};
use submval_core::{Error, SchemaProperty};

use crate::adapter::SchemaDialect;
use crate::error::ModelResult;

/// The two coupled MDF documents of one data model.
#[derive(Debug, Clone)]
pub struct MdfDocuments {
    model_file: String,
    props_file: String,
    model: Value,
    props: Value,
}

impl MdfDocuments {
    pub fn from_yaml(
        model_file: impl Into<String>,
        model_yaml: &str,
        props_file: impl Into<String>,
        props_yaml: &str,
    ) -> ModelResult<Self> {
        Ok(Self {
            model_file: model_file.into(),
            props_file: props_file.into(),
            model: serde_yaml::from_str(model_yaml)?,
            props: serde_yaml::from_str(props_yaml)?,
        })
    }

    pub fn from_paths(model_path: &Path, props_path: &Path) -> ModelResult<Self> {
        let model_yaml = std::fs::read_to_string(model_path)?;
        let props_yaml = std::fs::read_to_string(props_path)?;
        Self::from_yaml(
            model_path.display().to_string(),
            &model_yaml,
            props_path.display().to_string(),
            &props_yaml,
        )
    }

    pub fn model_file(&self) -> &str {
        &self.model_file
    }

    pub fn props_file(&self) -> &str {
        &self.props_file
    }

    /// `Version` declared by the model document, if any.
    pub fn version(&self) -> Option<String> {
        match self.model.get("Version")? {
            Value::String(version) => Some(version.clone()),
            Value::Number(version) => Some(version.to_string()),
            _ => None,
        }
    }

    fn nodes(&self) -> ModelResult<Vec<(String, Vec<String>)>> {
        let nodes = self
            .model
            .get("Nodes")
            .and_then(Value::as_mapping)
            .ok_or_else(|| {
                Error::InvalidSchema(format!("{}: missing Nodes section", self.model_file))
            })?;

        let mut out = Vec::with_capacity(nodes.len());
        for (name, body) in nodes {
            let Some(name) = name.as_str() else {
                return Err(Error::InvalidSchema(format!("non-string node name: {name:?}")).into());
            };
            let props = body
                .get("Props")
                .and_then(Value::as_sequence)
                .map(|props| {
                    props
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            out.push((name.to_string(), props));
        }
        Ok(out)
    }

    /// Property definitions from both documents; the property document wins.
    fn definitions(&self) -> HashMap<String, Mapping> {
        let mut definitions = HashMap::new();
        for doc in [&self.model, &self.props] {
            let Some(section) = doc.get("PropDefinitions").and_then(Value::as_mapping) else {
                continue;
            };
            for (name, def) in section {
                if let Some(name) = name.as_str() {
                    let def = def.as_mapping().cloned().unwrap_or_default();
                    definitions.insert(name.to_string(), def);
                }
            }
        }
        definitions
    }
}

impl SchemaDialect for MdfDocuments {
    fn dialect(&self) -> &'static str {
        "mdf"
    }

    fn properties(&self) -> ModelResult<Vec<SchemaProperty>> {
        let definitions = self.definitions();
        let mut properties = Vec::new();

        for (node, props) in self.nodes()? {
            for name in props {
                let prop = match definitions.get(&name) {
                    Some(def) => mapper::map_property(&node, &name, def)?,
                    None => {
                        tracing::warn!(
                            event = "property_undefined",
                            node = %node,
                            property = %name
                        );
                        mapper::undefined_property(&node, &name)
                    }
                };
                properties.push(prop);
            }
        }

        Ok(properties)
    }
}
