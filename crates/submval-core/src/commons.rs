use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Multi-value delimiter used when a commons is not configured explicitly.
pub const DEFAULT_DELIMITER: char = ';';

/// Features of one commons (data model ecosystem).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonsFeatures {
    /// Separator between tokens of a multi-valued cell.
    pub delimiter: char,
}

/// Per-commons configuration keyed by lowercase acronym.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonsConfig {
    #[serde(default)]
    pub commons: BTreeMap<String, CommonsFeatures>,
}

impl Default for CommonsConfig {
    fn default() -> Self {
        let commons = [("icdc", ';'), ("ccdi", ';'), ("cds", '|'), ("c3dc", ';')]
            .into_iter()
            .map(|(acronym, delimiter)| (acronym.to_string(), CommonsFeatures { delimiter }))
            .collect();
        Self { commons }
    }
}

impl CommonsConfig {
    /// Layer `overrides` on top of this configuration. Entries are matched by
    /// lowercase acronym; new acronyms are added.
    pub fn merge(mut self, overrides: CommonsConfig) -> Self {
        for (acronym, features) in overrides.commons {
            self.commons.insert(acronym.to_lowercase(), features);
        }
        self
    }

    pub fn features(&self, acronym: &str) -> Result<&CommonsFeatures> {
        self.commons
            .get(&acronym.to_lowercase())
            .ok_or_else(|| Error::UnknownCommons(acronym.to_string()))
    }

    pub fn delimiter(&self, acronym: &str) -> Result<char> {
        self.features(acronym).map(|features| features.delimiter)
    }

    pub fn acronyms(&self) -> impl Iterator<Item = &str> {
        self.commons.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_delimiters() {
        let config = CommonsConfig::default();
        assert_eq!(config.delimiter("icdc").unwrap(), ';');
        assert_eq!(config.delimiter("CDS").unwrap(), '|');
        assert!(matches!(
            config.delimiter("gdc"),
            Err(Error::UnknownCommons(_))
        ));
    }

    #[test]
    fn overrides_replace_and_extend() {
        let overrides: CommonsConfig = toml::from_str(
            r#"
            [commons.ccdi]
            delimiter = "|"

            [commons.Gdc]
            delimiter = ","
            "#,
        )
        .expect("parse commons config");

        let config = CommonsConfig::default().merge(overrides);
        assert_eq!(config.delimiter("ccdi").unwrap(), '|');
        assert_eq!(config.delimiter("gdc").unwrap(), ',');
        assert_eq!(config.delimiter("c3dc").unwrap(), ';');
    }
}
