use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use submval_core::{CommonsConfig, CommonsFeatures};

use crate::CliError;

/// Contents of an optional `submval.toml`.
///
/// ```toml
/// [commons.cds]
/// delimiter = "|"
///
/// [validate]
/// exclude_node_types = ["program"]
/// sequential = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub commons: BTreeMap<String, CommonsFeatures>,
    #[serde(default)]
    pub validate: ValidateSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidateSettings {
    #[serde(default)]
    pub exclude_node_types: Vec<String>,
    #[serde(default)]
    pub sequential: bool,
}

impl Settings {
    /// Built-in commons table with the file's entries layered on top.
    pub fn commons_config(&self) -> CommonsConfig {
        CommonsConfig::default().merge(CommonsConfig {
            commons: self.commons.clone(),
        })
    }
}

pub fn load_settings(path: Option<&Path>) -> Result<Settings, CliError> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let content = std::fs::read_to_string(path)
        .map_err(|err| CliError::InvalidConfig(format!("{}: {err}", path.display())))?;
    toml::from_str(&content)
        .map_err(|err| CliError::InvalidConfig(format!("{}: {err}", path.display())))
}
