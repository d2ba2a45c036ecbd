//! Tab-separated data dictionary: one row per node property, with the type
//! already spelled in canonical form.
//!
//! Expected headers (case-insensitive): `node`, `property`, `type`, and
//! optionally `description`, `required`, `key`, `allowed_values`, `cde`.
//! Allowed values are separated by `|`.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use submval_core::{Error, PropertyType, SchemaProperty, Tristate};

use crate::adapter::SchemaDialect;
use crate::error::ModelResult;

const VALUE_SEPARATOR: char = '|';

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct DictionaryRow {
    node: String,
    property: String,
    description: String,
    #[serde(rename = "type")]
    property_type: String,
    required: String,
    key: String,
    allowed_values: String,
    cde: String,
}

/// A parsed data dictionary file.
#[derive(Debug, Clone)]
pub struct DataDictionary {
    file: String,
    rows: Vec<DictionaryRow>,
}

impl DataDictionary {
    pub fn from_reader<R: Read>(file: impl Into<String>, reader: R) -> ModelResult<Self> {
        let file = file.into();
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()?
            .iter()
            .map(str::to_lowercase)
            .collect::<csv::StringRecord>();
        for required in ["node", "property", "type"] {
            if !headers.iter().any(|name| name == required) {
                return Err(Error::InvalidSchema(format!(
                    "{file}: missing dictionary column '{required}'"
                ))
                .into());
            }
        }
        reader.set_headers(headers);

        let mut rows = Vec::new();
        for result in reader.deserialize::<DictionaryRow>() {
            let row = result?;
            if row.node.is_empty() && row.property.is_empty() {
                continue;
            }
            rows.push(row);
        }

        Ok(Self { file, rows })
    }

    pub fn from_path(path: &Path) -> ModelResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(path.display().to_string(), file)
    }

    pub fn file(&self) -> &str {
        &self.file
    }
}

impl SchemaDialect for DataDictionary {
    fn dialect(&self) -> &'static str {
        "dictionary"
    }

    fn properties(&self) -> ModelResult<Vec<SchemaProperty>> {
        self.rows
            .iter()
            .map(|row| map_row(row).map_err(Into::into))
            .collect()
    }
}

fn map_row(row: &DictionaryRow) -> submval_core::Result<SchemaProperty> {
    let property_type: PropertyType = row.property_type.parse().map_err(|_| {
        Error::schema_format(
            &row.node,
            &row.property,
            format!("unknown type '{}'", row.property_type),
        )
    })?;

    let allowed_values = if property_type.is_enum() {
        row.allowed_values
            .split(VALUE_SEPARATOR)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        Vec::new()
    };

    Ok(SchemaProperty {
        node: row.node.clone(),
        property: row.property.clone(),
        description: row.description.clone(),
        property_type,
        allowed_values,
        required: required_flag(&row.required),
        is_key: bool_flag(&row.key),
        cde_code: (!row.cde.is_empty()).then(|| row.cde.clone()),
    })
}

fn required_flag(raw: &str) -> Tristate {
    match bool_flag(raw) {
        Tristate::Unknown => Tristate::from_requirement_label(raw),
        flag => flag,
    }
}

fn bool_flag(raw: &str) -> Tristate {
    match raw.to_lowercase().as_str() {
        "true" => Tristate::True,
        "false" => Tristate::False,
        _ => Tristate::Unknown,
    }
}
