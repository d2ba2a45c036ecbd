use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::table::RejectedFile;

/// Outcome label of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Pass,
    Info,
    Warning,
    Error,
    Empty,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Pass => "PASS",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Empty => "EMPTY",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a rule table: the result of checking one property of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub node: String,
    pub property: String,
    pub severity: Severity,
    /// Short qualifier shown under the severity, e.g. `unrecognized value`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Offending row numbers or values.
    pub detail: String,
}

impl Finding {
    pub fn new(node: &str, property: &str, severity: Severity) -> Self {
        Self {
            node: node.to_string(),
            property: property.to_string(),
            severity,
            note: None,
            detail: String::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    /// Text of the `check` column.
    pub fn check_label(&self) -> String {
        match &self.note {
            Some(note) => format!("{}\n{}", self.severity, note),
            None => self.severity.to_string(),
        }
    }
}

/// File-level message printed above a rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Output of one rule for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSection {
    pub file_name: String,
    pub node: String,
    pub notices: Vec<Notice>,
    pub findings: Vec<Finding>,
}

impl FileSection {
    pub fn new(file_name: &str, node: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            node: node.to_string(),
            notices: Vec::new(),
            findings: Vec::new(),
        }
    }

    pub fn notice(&mut self, severity: Severity, message: impl Into<String>) {
        self.notices.push(Notice::new(severity, message));
    }
}

/// Table shape of a rule section: the detail column header and the wrap
/// width of each wrapped column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub detail_header: &'static str,
    pub detail_width: usize,
    pub property_width: Option<usize>,
    pub node_width: Option<usize>,
}

impl TableLayout {
    /// Layout of rules reporting row numbers.
    pub const fn rows(width: usize) -> Self {
        Self {
            detail_header: "error row",
            detail_width: width,
            property_width: None,
            node_width: None,
        }
    }

    /// Layout of rules reporting offending values.
    pub const fn values(width: usize) -> Self {
        Self {
            detail_header: "error value",
            detail_width: width,
            property_width: None,
            node_width: None,
        }
    }

    pub const fn property_width(mut self, width: usize) -> Self {
        self.property_width = Some(width);
        self
    }

    pub const fn node_width(mut self, width: usize) -> Self {
        self.node_width = Some(width);
        self
    }
}

/// Output of one rule over every file of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleReport {
    pub rule: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub layout: TableLayout,
    pub sections: Vec<FileSection>,
    /// Set when the rule could not run at all.
    pub aborted: Option<String>,
}

impl RuleReport {
    /// Count findings and notices by severity.
    pub fn counts(&self) -> BTreeMap<Severity, usize> {
        let mut counts = BTreeMap::new();
        for section in &self.sections {
            let severities = section
                .notices
                .iter()
                .map(|notice| notice.severity)
                .chain(section.findings.iter().map(|finding| finding.severity));
            for severity in severities {
                *counts.entry(severity).or_insert(0) += 1;
            }
        }
        if self.aborted.is_some() {
            *counts.entry(Severity::Error).or_insert(0) += 1;
        }
        counts
    }
}

/// Finding counts of one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSummary {
    pub rule: String,
    pub counts: BTreeMap<Severity, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
}

/// Machine-readable digest of a validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub files_loaded: Vec<String>,
    pub rejected_files: Vec<RejectedFile>,
    pub excluded_files: Vec<String>,
    pub severity_counts: BTreeMap<Severity, usize>,
    pub rules: Vec<RuleSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_fingerprint: Option<String>,
}

impl Summary {
    pub fn count(&self, severity: Severity) -> usize {
        self.severity_counts.get(&severity).copied().unwrap_or(0)
    }

    /// Files were rejected or a rule could not run.
    pub fn has_structural_problems(&self) -> bool {
        !self.rejected_files.is_empty() || self.rules.iter().any(|rule| rule.aborted.is_some())
    }
}

/// Everything a validation run produced.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub reports: Vec<RuleReport>,
    pub summary: Summary,
}
