use serde_yaml::{Mapping, Value};
use submval_core::{
    Error, PropertyType, Result, ScalarKind, SchemaProperty, Tristate, ValueKind,
};

/// Property being mapped, used for error locations.
#[derive(Debug, Clone, Copy)]
struct Location<'a> {
    node: &'a str,
    property: &'a str,
}

impl Location<'_> {
    fn error(&self, message: impl Into<String>) -> Error {
        Error::schema_format(self.node, self.property, message)
    }
}

pub fn map_property(node: &str, property: &str, def: &Mapping) -> Result<SchemaProperty> {
    let at = Location { node, property };
    let (property_type, allowed_values) = resolve_type(at, def)?;

    Ok(SchemaProperty {
        node: node.to_string(),
        property: property.to_string(),
        description: def.get("Desc").and_then(scalar_text).unwrap_or_default(),
        property_type,
        allowed_values,
        required: required_flag(def.get("Req")),
        is_key: key_flag(def.get("Key")),
        cde_code: cde_code(def.get("Term")),
    })
}

/// Property listed under a node without a definition: an untyped string.
pub fn undefined_property(node: &str, property: &str) -> SchemaProperty {
    SchemaProperty {
        node: node.to_string(),
        property: property.to_string(),
        description: String::new(),
        property_type: PropertyType::string(),
        allowed_values: Vec::new(),
        required: Tristate::Unknown,
        is_key: Tristate::Unknown,
        cde_code: None,
    }
}

fn resolve_type(at: Location<'_>, def: &Mapping) -> Result<(PropertyType, Vec<String>)> {
    match def.get("Type") {
        None | Some(Value::Null) => match enum_values(at, def.get("Enum"))? {
            Some(values) => Ok((
                PropertyType::Single(ValueKind::value_set(strict_flag(None, def))),
                values,
            )),
            None => Ok((PropertyType::string(), Vec::new())),
        },
        Some(Value::String(name)) => {
            let kind = ScalarKind::from_name(name).unwrap_or_else(|| {
                tracing::warn!(
                    event = "type_unrecognized",
                    node = %at.node,
                    property = %at.property,
                    type_name = %name
                );
                ScalarKind::String
            });
            Ok((PropertyType::scalar(kind), Vec::new()))
        }
        // list-valued Type is a dialect quirk for variadic types
        Some(Value::Sequence(_)) => Ok((PropertyType::string(), Vec::new())),
        Some(Value::Mapping(type_map)) => resolve_structured(at, type_map, def),
        Some(other) => Err(at.error(format!("unsupported Type value: {other:?}"))),
    }
}

fn resolve_structured(
    at: Location<'_>,
    type_map: &Mapping,
    def: &Mapping,
) -> Result<(PropertyType, Vec<String>)> {
    let value_type = match type_map.get("value_type") {
        None | Some(Value::Null) => return Ok((PropertyType::string(), Vec::new())),
        Some(Value::String(value_type)) => value_type.as_str(),
        Some(other) => return Err(at.error(format!("unsupported value_type: {other:?}"))),
    };

    match value_type {
        "value_set" => {
            let values = vocabulary(at, type_map, def)?;
            let kind = ValueKind::value_set(strict_flag(Some(type_map), def));
            Ok((PropertyType::Single(kind), values))
        }
        "list" => {
            let (kind, values) = resolve_item(at, type_map, def)?;
            Ok((PropertyType::Array(kind), values))
        }
        other => ScalarKind::from_name(other)
            .map(|kind| (PropertyType::scalar(kind), Vec::new()))
            .ok_or_else(|| at.error(format!("unknown value_type '{other}'"))),
    }
}

fn resolve_item(
    at: Location<'_>,
    list_map: &Mapping,
    def: &Mapping,
) -> Result<(ValueKind, Vec<String>)> {
    let strict = strict_flag(Some(list_map), def);
    match list_map.get("item_type") {
        None | Some(Value::Null) => Ok((ValueKind::Scalar(ScalarKind::String), Vec::new())),
        Some(Value::String(name)) if name == "value_set" => {
            Ok((ValueKind::value_set(strict), vocabulary(at, list_map, def)?))
        }
        Some(Value::String(name)) => ScalarKind::from_name(name)
            .map(|kind| (ValueKind::Scalar(kind), Vec::new()))
            .ok_or_else(|| at.error(format!("unknown item_type '{name}'"))),
        // an inline list of terms is the item vocabulary
        Some(Value::Sequence(terms)) => Ok((ValueKind::value_set(strict), sequence_text(terms))),
        Some(Value::Mapping(item_map)) => match item_map.get("value_type") {
            None | Some(Value::Null) => Ok((ValueKind::Scalar(ScalarKind::String), Vec::new())),
            Some(Value::String(name)) if name == "value_set" => {
                let strict = strict_flag(Some(item_map), def) && strict;
                Ok((ValueKind::value_set(strict), vocabulary(at, item_map, def)?))
            }
            Some(Value::String(name)) => ScalarKind::from_name(name)
                .map(|kind| (ValueKind::Scalar(kind), Vec::new()))
                .ok_or_else(|| at.error(format!("unsupported item value_type '{name}'"))),
            Some(other) => Err(at.error(format!("unsupported item value_type: {other:?}"))),
        },
        Some(other) => Err(at.error(format!("unsupported item_type: {other:?}"))),
    }
}

/// Vocabulary of a value set: the type node's own `Enum`, else the
/// property's `Enum`.
fn vocabulary(at: Location<'_>, type_map: &Mapping, def: &Mapping) -> Result<Vec<String>> {
    if let Some(values) = enum_values(at, type_map.get("Enum"))? {
        return Ok(values);
    }
    Ok(enum_values(at, def.get("Enum"))?.unwrap_or_default())
}

fn enum_values(at: Location<'_>, value: Option<&Value>) -> Result<Option<Vec<String>>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Sequence(terms)) => Ok(Some(sequence_text(terms))),
        Some(other) => Err(at.error(format!("Enum must be a list, found {other:?}"))),
    }
}

/// `strict`/`Strict` on the type node wins over the property's `Strict`;
/// vocabularies are strict unless stated otherwise.
fn strict_flag(type_map: Option<&Mapping>, def: &Mapping) -> bool {
    type_map
        .and_then(|map| map.get("strict").or_else(|| map.get("Strict")))
        .and_then(Value::as_bool)
        .or_else(|| def.get("Strict").and_then(Value::as_bool))
        .unwrap_or(true)
}

fn required_flag(value: Option<&Value>) -> Tristate {
    match value {
        Some(Value::Bool(required)) => Tristate::from(*required),
        Some(Value::String(label)) => Tristate::from_requirement_label(label),
        _ => Tristate::Unknown,
    }
}

fn key_flag(value: Option<&Value>) -> Tristate {
    value
        .and_then(Value::as_bool)
        .map(Tristate::from)
        .unwrap_or_default()
}

fn cde_code(terms: Option<&Value>) -> Option<String> {
    terms?
        .as_sequence()?
        .iter()
        .filter(|term| term.get("Origin").and_then(Value::as_str) == Some("caDSR"))
        .filter_map(|term| term.get("Code").and_then(scalar_text))
        .last()
}

fn sequence_text(values: &[Value]) -> Vec<String> {
    values.iter().filter_map(scalar_text).collect()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).expect("parse definition")
    }

    fn type_of(yaml: &str) -> String {
        map_property("sample", "prop", &def(yaml))
            .expect("map property")
            .property_type
            .to_string()
    }

    #[test]
    fn enum_without_type_is_enum() {
        assert_eq!(type_of("Enum: [A, B]"), "enum");
        assert_eq!(type_of("Enum: [A, B]\nStrict: false"), "string;enum");
    }

    #[test]
    fn scalar_names_are_adopted() {
        assert_eq!(type_of("Type: integer"), "integer");
        assert_eq!(type_of("Type: datetime"), "datetime");
    }

    #[test]
    fn unrecognized_type_names_degrade_to_string() {
        assert_eq!(type_of("Type: boolean"), "string");
        assert_eq!(type_of("Type: url"), "string");
        assert_eq!(type_of("Type: TBD"), "string");
    }

    #[test]
    fn sequence_type_degrades_to_string() {
        assert_eq!(type_of("Type: [string, integer]"), "string");
    }

    #[test]
    fn structured_types() {
        assert_eq!(type_of("Type: {units: [days]}"), "string");
        assert_eq!(type_of("Type: {value_type: number, units: [days]}"), "number");
        assert_eq!(
            type_of("Type: {value_type: value_set, strict: false}\nEnum: [A]"),
            "string;enum"
        );
        assert_eq!(
            type_of("Type: {value_type: list, item_type: [A, B]}\nStrict: false"),
            "array[string;enum]"
        );
        assert_eq!(
            type_of("Type: {value_type: list, item_type: {value_type: value_set}}\nEnum: [A]"),
            "array[enum]"
        );
        assert_eq!(
            type_of("Type: {value_type: list, item_type: integer}"),
            "array[integer]"
        );
    }

    #[test]
    fn unknown_structure_is_a_format_error() {
        let err = map_property("sample", "prop", &def("Type: {value_type: tensor}"))
            .expect_err("unknown value_type");
        assert!(matches!(err, Error::SchemaFormat { .. }));
    }

    #[test]
    fn flags_and_codes() {
        let prop = map_property(
            "sample",
            "sample_id",
            &def(
                "Type: string\nReq: 'Yes'\nKey: true\nTerm:\n  - Origin: NCIt\n    Code: C1\n  - Origin: caDSR\n    Code: 6380049",
            ),
        )
        .expect("map property");
        assert_eq!(prop.required, Tristate::True);
        assert_eq!(prop.is_key, Tristate::True);
        assert_eq!(prop.cde_code.as_deref(), Some("6380049"));

        let prop = map_property("sample", "notes", &def("Type: string\nReq: Preferred"))
            .expect("map property");
        assert_eq!(prop.required, Tristate::Unknown);
        assert_eq!(prop.is_key, Tristate::Unknown);

        let prop =
            map_property("sample", "notes", &def("Type: string\nReq: false")).expect("map");
        assert_eq!(prop.required, Tristate::False);
    }
}
