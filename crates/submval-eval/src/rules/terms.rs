use submval_core::SchemaProperty;

use super::{Rule, RuleContext};
use crate::model::{FileSection, Finding, Severity, TableLayout};
use crate::table::{Column, RecordTable};

const SOFT_NOTE: &str = "free strings allowed";
const STRICT_NOTE: &str = "unrecognized value";

/// Values of enumerated properties belong to their vocabulary.
pub struct TermsAndValueSets;

impl Rule for TermsAndValueSets {
    fn id(&self) -> &'static str {
        "terms_and_value_sets"
    }

    fn title(&self) -> &'static str {
        "Terms and Value Sets Check"
    }

    fn description(&self) -> &'static str {
        "The following columns have controlled vocabulary on the 'Terms and Value Sets' page of the template file.\nIf the values present do not match, they will noted and in some cases the values will be replaced:\n----------\n"
    }

    fn layout(&self) -> TableLayout {
        TableLayout::values(45).property_width(20).node_width(20)
    }

    fn check_file(&self, ctx: &RuleContext<'_>, table: &RecordTable) -> FileSection {
        let node = table.node_type();
        let mut section = FileSection::new(table.file_name(), node);
        let enum_props = ctx.schema.enum_properties(node);
        if enum_props.is_empty() {
            return section;
        }

        for name in table.columns() {
            let Some(prop) = enum_props.iter().find(|prop| &prop.property == name) else {
                continue;
            };
            let Some(column) = table.column(name) else {
                continue;
            };
            section
                .findings
                .push(check_column(node, prop, column, ctx.delimiter));
        }

        section
    }
}

fn check_column(node: &str, prop: &SchemaProperty, column: Column<'_>, delimiter: char) -> Finding {
    let distinct = column.distinct();
    if distinct.is_empty() {
        return Finding::new(node, &prop.property, Severity::Empty);
    }

    let is_array = prop.property_type.is_array();
    let mut invalid: Vec<&str> = Vec::new();
    for value in distinct {
        let tokens: Vec<&str> = if is_array {
            value.split(delimiter).collect()
        } else {
            vec![value]
        };
        for token in tokens {
            if !prop.allows(token) && !invalid.contains(&token) {
                invalid.push(token);
            }
        }
    }

    if invalid.is_empty() {
        return Finding::new(node, &prop.property, Severity::Pass);
    }

    let detail = invalid
        .iter()
        .map(|token| format!("[{token}]"))
        .collect::<Vec<_>>()
        .join(",\n");
    let finding = if prop.property_type.allows_free_text() {
        Finding::new(node, &prop.property, Severity::Warning).with_note(SOFT_NOTE)
    } else {
        Finding::new(node, &prop.property, Severity::Error).with_note(STRICT_NOTE)
    };
    finding.with_detail(detail)
}
