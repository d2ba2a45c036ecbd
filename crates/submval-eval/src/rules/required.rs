use super::{Rule, RuleContext, bracket_list, join_rows};
use crate::model::{FileSection, Finding, Severity, TableLayout};
use crate::table::{RecordTable, display_row};

/// Every required property is present and populated on every row.
pub struct RequiredProperties;

impl Rule for RequiredProperties {
    fn id(&self) -> &'static str {
        "required_properties"
    }

    fn title(&self) -> &'static str {
        "Required Properties Check"
    }

    fn description(&self) -> &'static str {
        "This section is for required properties for all nodes that contain data.\nFor information on required properties per node, please see the 'Dictionary' page of the template file.\nFor each entry, it is expected that all required information has a value:\n----------\n"
    }

    fn layout(&self) -> TableLayout {
        TableLayout::rows(25)
    }

    fn check_file(&self, ctx: &RuleContext<'_>, table: &RecordTable) -> FileSection {
        let node = table.node_type();
        let mut section = FileSection::new(table.file_name(), node);

        if !ctx.schema.has_node(node) {
            section.notice(
                Severity::Warning,
                format!("node type [{node}] is not defined in the data model"),
            );
        }

        let required = ctx
            .schema
            .required_properties(node)
            .into_iter()
            .map(|prop| prop.property.as_str())
            .collect::<Vec<_>>();

        let absent = required
            .iter()
            .filter(|name| !table.has_column(name))
            .copied()
            .collect::<Vec<_>>();
        if !absent.is_empty() {
            section.notice(
                Severity::Error,
                format!(
                    "Required property {} not found in file",
                    bracket_list(&absent)
                ),
            );
        }

        for name in table.columns() {
            if !required.contains(&name.as_str()) {
                continue;
            }
            let Some(column) = table.column(name) else {
                continue;
            };
            // a column without rows has nothing missing and passes
            let missing = column
                .cells()
                .enumerate()
                .filter(|(_, cell)| cell.is_none())
                .map(|(row, _)| display_row(row))
                .collect::<Vec<_>>();

            let finding = if missing.is_empty() {
                Finding::new(node, name, Severity::Pass)
            } else {
                Finding::new(node, name, Severity::Error).with_detail(join_rows(&missing))
            };
            section.findings.push(finding);
        }

        section
    }
}
