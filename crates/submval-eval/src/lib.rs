//! Validation of tabular submissions against a normalized schema.
//!
//! Submission files are loaded into [`RecordTable`]s, checked by a fixed
//! sequence of rules and rendered into a plain-text report.

pub mod engine;
pub mod errors;
pub mod grid;
pub mod model;
pub mod report;
pub mod rules;
pub mod table;

pub use engine::{ValidateOptions, ValidationEngine};
pub use errors::{EvalError, EvalResult};
pub use model::{
    FileSection, Finding, Notice, RuleReport, RuleSummary, Severity, Summary, TableLayout,
    ValidationOutcome,
};
pub use report::{ReportHeader, render_report, render_rule, section_header};
pub use rules::{Rule, RuleContext, default_rules};
pub use table::{
    BLANK_MARKERS, Column, RecordTable, RejectedFile, Submission, discover_submission,
    index_node_types, load_table,
};
