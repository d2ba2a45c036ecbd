//! The validation rules. Each rule reads the schema and the loaded tables
//! and produces one [`FileSection`] per file, in file order.

mod cross_links;
mod numeric;
mod required;
mod terms;
mod unique_key;
mod whitespace;

use std::collections::BTreeMap;

use rayon::prelude::*;
use submval_core::PropertyTable;

use crate::model::{FileSection, RuleReport, TableLayout};
use crate::table::{RecordTable, index_node_types};

pub use cross_links::CrossLinks;
pub use numeric::NumericTypes;
pub use required::RequiredProperties;
pub use terms::TermsAndValueSets;
pub use unique_key::UniqueKeys;
pub use whitespace::Whitespace;

/// Read-only inputs shared by every rule.
#[derive(Debug)]
pub struct RuleContext<'a> {
    pub schema: &'a PropertyTable,
    pub tables: &'a [RecordTable],
    /// Separator between tokens of multi-valued cells.
    pub delimiter: char,
    node_index: BTreeMap<&'a str, &'a RecordTable>,
    duplicate_node_type: Option<String>,
}

impl<'a> RuleContext<'a> {
    pub fn new(schema: &'a PropertyTable, tables: &'a [RecordTable], delimiter: char) -> Self {
        let (node_index, duplicate_node_type) = match index_node_types(tables) {
            Ok(index) => (index, None),
            Err(err) => (BTreeMap::new(), Some(err.to_string())),
        };
        Self {
            schema,
            tables,
            delimiter,
            node_index,
            duplicate_node_type,
        }
    }

    /// The file holding rows of `node`, when node types are unique.
    pub fn table_for_node(&self, node: &str) -> Option<&'a RecordTable> {
        self.node_index.get(node).copied()
    }

    /// Why node types cannot be mapped to files, if they cannot.
    pub fn duplicate_node_type(&self) -> Option<&str> {
        self.duplicate_node_type.as_deref()
    }
}

/// A single-pass check over the files of a submission.
pub trait Rule: Send + Sync {
    fn id(&self) -> &'static str;

    /// Section title shown in the report banner.
    fn title(&self) -> &'static str;

    /// Text printed under the banner.
    fn description(&self) -> &'static str;

    fn layout(&self) -> TableLayout;

    /// Reason the rule cannot run on this submission.
    fn blocked(&self, _ctx: &RuleContext<'_>) -> Option<String> {
        None
    }

    fn check_file(&self, ctx: &RuleContext<'_>, table: &RecordTable) -> FileSection;

    /// Run the rule over every file. Files may be checked in parallel;
    /// sections always come back in file order.
    fn evaluate(&self, ctx: &RuleContext<'_>, parallel: bool) -> RuleReport {
        let mut report = RuleReport {
            rule: self.id(),
            title: self.title(),
            description: self.description(),
            layout: self.layout(),
            sections: Vec::new(),
            aborted: None,
        };

        if let Some(reason) = self.blocked(ctx) {
            tracing::warn!(event = "rule_aborted", rule = self.id(), reason = %reason);
            report.aborted = Some(reason);
            return report;
        }

        report.sections = if parallel {
            ctx.tables
                .par_iter()
                .map(|table| self.check_file(ctx, table))
                .collect()
        } else {
            ctx.tables
                .iter()
                .map(|table| self.check_file(ctx, table))
                .collect()
        };
        report
    }
}

/// The six rules in report order.
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(RequiredProperties),
        Box::new(Whitespace),
        Box::new(TermsAndValueSets),
        Box::new(NumericTypes),
        Box::new(CrossLinks),
        Box::new(UniqueKeys),
    ]
}

/// Report line numbers joined with commas.
fn join_rows(rows: &[usize]) -> String {
    rows.iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Names rendered as `[a], [b]`.
fn bracket_list<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|name| format!("[{}]", name.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}
