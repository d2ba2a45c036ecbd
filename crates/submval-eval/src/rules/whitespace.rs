use super::{Rule, RuleContext, join_rows};
use crate::model::{FileSection, Finding, Severity, TableLayout};
use crate::table::{RecordTable, display_row};

/// Values carry no leading or trailing whitespace. Only offending columns
/// are reported; blank columns are skipped.
pub struct Whitespace;

impl Rule for Whitespace {
    fn id(&self) -> &'static str {
        "whitespace"
    }

    fn title(&self) -> &'static str {
        "Whitespace Check"
    }

    fn description(&self) -> &'static str {
        "This section checks for white space issues in all nonempty properties.\n----------\n"
    }

    fn layout(&self) -> TableLayout {
        TableLayout::rows(25)
    }

    fn check_file(&self, _ctx: &RuleContext<'_>, table: &RecordTable) -> FileSection {
        let node = table.node_type();
        let mut section = FileSection::new(table.file_name(), node);

        for name in table.columns() {
            let Some(column) = table.column(name) else {
                continue;
            };
            let padded = column
                .values()
                .filter(|(_, value)| value.trim() != *value)
                .map(|(row, _)| display_row(row))
                .collect::<Vec<_>>();
            if !padded.is_empty() {
                section.findings.push(
                    Finding::new(node, name, Severity::Error).with_detail(join_rows(&padded)),
                );
            }
        }

        section
    }
}
