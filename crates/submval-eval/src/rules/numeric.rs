use submval_core::ScalarKind;

use super::{Rule, RuleContext, join_rows};
use crate::model::{FileSection, Finding, Severity, TableLayout};
use crate::table::{RecordTable, display_row};

/// Values of `integer` and `number` properties parse as such.
pub struct NumericTypes;

impl Rule for NumericTypes {
    fn id(&self) -> &'static str {
        "numeric_types"
    }

    fn title(&self) -> &'static str {
        "Numeric and Integer Check"
    }

    fn description(&self) -> &'static str {
        "This section will display any values in properties that are expected to be either numeric or integer based on the Dictionary, but have values that are not:\n----------\n"
    }

    fn layout(&self) -> TableLayout {
        TableLayout::rows(30).property_width(25)
    }

    fn check_file(&self, ctx: &RuleContext<'_>, table: &RecordTable) -> FileSection {
        let node = table.node_type();
        let mut section = FileSection::new(table.file_name(), node);
        let numeric = ctx.schema.numeric_properties(node);

        for name in table.columns() {
            let Some(kind) = numeric
                .iter()
                .find(|prop| &prop.property == name)
                .and_then(|prop| prop.property_type.numeric_kind())
            else {
                continue;
            };
            let Some(column) = table.column(name) else {
                continue;
            };
            if column.is_blank() {
                section
                    .findings
                    .push(Finding::new(node, name, Severity::Empty));
                continue;
            }

            let bad_rows = column
                .values()
                .filter(|(_, value)| !parses_as(kind, value))
                .map(|(row, _)| display_row(row))
                .collect::<Vec<_>>();
            let finding = if bad_rows.is_empty() {
                Finding::new(node, name, Severity::Pass)
            } else {
                Finding::new(node, name, Severity::Error).with_detail(join_rows(&bad_rows))
            };
            section.findings.push(finding);
        }

        section
    }
}

/// Whether `value` is a valid literal of the numeric `kind`. Surrounding
/// whitespace is ignored.
pub(crate) fn parses_as(kind: ScalarKind, value: &str) -> bool {
    let value = value.trim();
    match kind {
        ScalarKind::Integer => is_integer(value),
        ScalarKind::Number => value.parse::<f64>().is_ok(),
        ScalarKind::String | ScalarKind::Datetime => true,
    }
}

fn is_integer(value: &str) -> bool {
    let digits = value
        .strip_prefix(['+', '-'])
        .unwrap_or(value);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
