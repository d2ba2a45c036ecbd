use std::collections::HashMap;

use super::{Rule, RuleContext};
use crate::model::{FileSection, Finding, Severity, TableLayout};
use crate::table::RecordTable;

/// Key properties hold no repeated values.
pub struct UniqueKeys;

impl Rule for UniqueKeys {
    fn id(&self) -> &'static str {
        "unique_keys"
    }

    fn title(&self) -> &'static str {
        "Unique Key Value Check"
    }

    fn description(&self) -> &'static str {
        "The following will check for multiples of key values, which are expected to be unique.\nIf there are any unexpected values, they will be reported below:\n----------\n"
    }

    fn layout(&self) -> TableLayout {
        TableLayout::values(30).property_width(25)
    }

    fn check_file(&self, ctx: &RuleContext<'_>, table: &RecordTable) -> FileSection {
        let node = table.node_type();
        let mut section = FileSection::new(table.file_name(), node);

        let keys = ctx.schema.key_properties(node);
        if keys.is_empty() {
            section.notice(
                Severity::Warning,
                format!("node {node} file contains no Key id property"),
            );
            return section;
        }

        for key in keys {
            let name = key.property.as_str();
            let Some(column) = table.column(name) else {
                section.findings.push(
                    Finding::new(node, name, Severity::Error).with_note("not found in file"),
                );
                continue;
            };
            if column.is_blank() {
                section
                    .findings
                    .push(Finding::new(node, name, Severity::Empty));
                continue;
            }

            let mut counts: HashMap<&str, usize> = HashMap::new();
            for (_, value) in column.values() {
                *counts.entry(value).or_insert(0) += 1;
            }
            let repeated = column
                .distinct()
                .into_iter()
                .filter(|value| counts.get(value).copied().unwrap_or(0) > 1)
                .collect::<Vec<_>>();

            let finding = if repeated.is_empty() {
                Finding::new(node, name, Severity::Pass)
            } else {
                Finding::new(node, name, Severity::Error).with_detail(repeated.join(","))
            };
            section.findings.push(finding);
        }

        section
    }
}
