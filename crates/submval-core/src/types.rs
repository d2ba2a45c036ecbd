use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Scalar value kinds understood by the validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    String,
    Integer,
    Number,
    Datetime,
}

impl ScalarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Integer => "integer",
            ScalarKind::Number => "number",
            ScalarKind::Datetime => "datetime",
        }
    }

    /// Look up a scalar kind by its canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(ScalarKind::String),
            "integer" => Some(ScalarKind::Integer),
            "number" => Some(ScalarKind::Number),
            "datetime" => Some(ScalarKind::Datetime),
            _ => None,
        }
    }
}

/// Domain of a single value: a scalar, a strict vocabulary, or a vocabulary
/// that also admits free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Scalar(ScalarKind),
    Enum,
    SoftEnum,
}

impl ValueKind {
    /// Value kind for a finite vocabulary.
    pub fn value_set(strict: bool) -> Self {
        if strict {
            ValueKind::Enum
        } else {
            ValueKind::SoftEnum
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Scalar(kind) => kind.as_str(),
            ValueKind::Enum => "enum",
            ValueKind::SoftEnum => "string;enum",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "enum" => Some(ValueKind::Enum),
            "string;enum" => Some(ValueKind::SoftEnum),
            other => ScalarKind::from_name(other).map(ValueKind::Scalar),
        }
    }
}

/// Canonical property type.
///
/// Renders as one of `string`, `integer`, `number`, `datetime`, `enum`,
/// `string;enum` or `array[T]` where `T` is any of the former.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum PropertyType {
    Single(ValueKind),
    Array(ValueKind),
}

impl PropertyType {
    pub fn scalar(kind: ScalarKind) -> Self {
        PropertyType::Single(ValueKind::Scalar(kind))
    }

    pub fn string() -> Self {
        Self::scalar(ScalarKind::String)
    }

    pub fn value_kind(&self) -> ValueKind {
        match self {
            PropertyType::Single(kind) | PropertyType::Array(kind) => *kind,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, PropertyType::Array(_))
    }

    /// True for `enum`, `string;enum` and their array forms.
    pub fn is_enum(&self) -> bool {
        matches!(self.value_kind(), ValueKind::Enum | ValueKind::SoftEnum)
    }

    /// True when the vocabulary admits free text (`string;enum` and
    /// `array[string;enum]`).
    pub fn allows_free_text(&self) -> bool {
        self.value_kind() == ValueKind::SoftEnum
    }

    /// The numeric kind of a single-valued `integer` or `number` property.
    pub fn numeric_kind(&self) -> Option<ScalarKind> {
        match self {
            PropertyType::Single(ValueKind::Scalar(kind @ ScalarKind::Integer))
            | PropertyType::Single(ValueKind::Scalar(kind @ ScalarKind::Number)) => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyType::Single(kind) => f.write_str(kind.as_str()),
            PropertyType::Array(kind) => write!(f, "array[{}]", kind.as_str()),
        }
    }
}

impl FromStr for PropertyType {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let parsed = match trimmed
            .strip_prefix("array[")
            .and_then(|rest| rest.strip_suffix(']'))
        {
            Some(inner) => ValueKind::parse(inner.trim()).map(PropertyType::Array),
            None => ValueKind::parse(trimmed).map(PropertyType::Single),
        };
        parsed.ok_or_else(|| Error::UnknownType(raw.to_string()))
    }
}

impl From<PropertyType> for String {
    fn from(value: PropertyType) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for PropertyType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
