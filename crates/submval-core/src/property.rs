use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::PropertyType;

/// Three-valued flag for schema attributes that some dialects omit.
///
/// `Unknown` is distinct from `False`: rules select on `True` only, so an
/// absent requirement signal never reads as an explicit "not required".
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Tristate {
    True,
    False,
    #[default]
    Unknown,
}

impl Tristate {
    pub fn is_true(self) -> bool {
        self == Tristate::True
    }

    /// Map a `Yes`/`No`/`Preferred` style label. Only `Yes` is a positive
    /// signal; every other label is `Unknown`.
    pub fn from_requirement_label(label: &str) -> Self {
        if label.trim() == "Yes" {
            Tristate::True
        } else {
            Tristate::Unknown
        }
    }
}

impl From<bool> for Tristate {
    fn from(value: bool) -> Self {
        if value { Tristate::True } else { Tristate::False }
    }
}

impl From<Option<bool>> for Tristate {
    fn from(value: Option<bool>) -> Self {
        value.map(Tristate::from).unwrap_or_default()
    }
}

/// Canonical description of one property of one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaProperty {
    /// Owning node type.
    pub node: String,
    /// Property name, expected as a column header in submitted files.
    pub property: String,
    pub description: String,
    /// Canonical type string, e.g. `array[string;enum]`.
    #[serde(rename = "type")]
    #[schemars(with = "String")]
    pub property_type: PropertyType,
    /// Vocabulary for enumerated types; empty otherwise.
    pub allowed_values: Vec<String>,
    pub required: Tristate,
    pub is_key: Tristate,
    /// Controlled-vocabulary code (caDSR) when the dialect provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cde_code: Option<String>,
}

impl SchemaProperty {
    /// Whether `value` is part of this property's vocabulary.
    pub fn allows(&self, value: &str) -> bool {
        self.allowed_values.iter().any(|allowed| allowed == value)
    }
}
