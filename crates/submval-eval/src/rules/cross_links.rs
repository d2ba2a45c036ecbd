use super::{Rule, RuleContext, join_rows};
use crate::model::{FileSection, Finding, Severity, TableLayout};
use crate::table::{Column, RecordTable, display_row};

/// Separator between parent node and parent key in a linking column name.
const LINK_SEPARATOR: char = '.';

/// Linking columns (`<parent>.<key>`) point at existing parent rows.
pub struct CrossLinks;

impl Rule for CrossLinks {
    fn id(&self) -> &'static str {
        "cross_links"
    }

    fn title(&self) -> &'static str {
        "Cross Links Check"
    }

    fn description(&self) -> &'static str {
        "If there are unexpected or missing values in the linking values between nodes, they will be reported below:\n----------\n"
    }

    fn layout(&self) -> TableLayout {
        TableLayout::values(30).property_width(25)
    }

    fn blocked(&self, ctx: &RuleContext<'_>) -> Option<String> {
        ctx.duplicate_node_type().map(str::to_string)
    }

    fn check_file(&self, ctx: &RuleContext<'_>, table: &RecordTable) -> FileSection {
        let node = table.node_type();
        let mut section = FileSection::new(table.file_name(), node);

        let links = table
            .columns()
            .iter()
            .filter(|name| name.contains(LINK_SEPARATOR))
            .filter_map(|name| table.column(name).map(|column| (name.as_str(), column)))
            .collect::<Vec<_>>();
        if links.is_empty() {
            return section;
        }

        let populated = |row: usize| {
            links
                .iter()
                .filter(|(_, column)| column.get(row).is_some())
                .count()
        };
        let unlinked = (0..table.row_count())
            .filter(|&row| populated(row) == 0)
            .map(display_row)
            .collect::<Vec<_>>();
        if !unlinked.is_empty() {
            section.notice(
                Severity::Error,
                format!(
                    "The entry on row {} contains ZERO links. Every entry (except study node) should have one link to a parent node",
                    join_rows(&unlinked)
                ),
            );
        }
        if links.len() > 1 {
            let multiple = (0..table.row_count())
                .filter(|&row| populated(row) > 1)
                .map(display_row)
                .collect::<Vec<_>>();
            if !multiple.is_empty() {
                section.notice(
                    Severity::Warning,
                    format!(
                        "The entry on row {} contains multiple links. While multiple links can occur, they are often not needed or best practice.",
                        join_rows(&multiple)
                    ),
                );
            }
        }

        for (name, column) in links {
            let finding = check_link(ctx, &mut section, node, name, column);
            section.findings.push(finding);
        }

        section
    }
}

fn check_link(
    ctx: &RuleContext<'_>,
    section: &mut FileSection,
    node: &str,
    name: &str,
    column: Column<'_>,
) -> Finding {
    let values = column.distinct();
    if values.is_empty() {
        return Finding::new(node, name, Severity::Empty);
    }

    let (parent, key) = split_link(name);
    let parent = if parent.chars().any(char::is_whitespace) {
        section.notice(
            Severity::Warning,
            format!(
                "the linking property [{name}] has whitespace in its parent node name. Leading and trailing spaces were ignored"
            ),
        );
        parent.trim()
    } else {
        parent
    };

    let Some(parent_table) = ctx.table_for_node(parent) else {
        return Finding::new(node, name, Severity::Error)
            .with_note(format!("File for [{parent}] not found"));
    };
    let Some(parent_column) = parent_table.column(key) else {
        return Finding::new(node, name, Severity::Error)
            .with_note(format!("property [{key}] not found in parent file"));
    };

    let parent_values = parent_column.value_set();
    let unmatched = values
        .into_iter()
        .filter(|value| !parent_values.contains(*value))
        .collect::<Vec<_>>();
    if unmatched.is_empty() {
        Finding::new(node, name, Severity::Pass)
    } else {
        Finding::new(node, name, Severity::Error).with_detail(unmatched.join(","))
    }
}

/// Parent node and parent key of a linking column. Segments after the
/// second `.` are ignored, so `a.b.c` links to key `b` of node `a`.
fn split_link(name: &str) -> (&str, &str) {
    let mut parts = name.split(LINK_SEPARATOR);
    let parent = parts.next().unwrap_or(name);
    let key = parts.next().unwrap_or("");
    (parent, key)
}
