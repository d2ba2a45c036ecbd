use crate::grid::{rounded_grid, wrap};
use crate::model::{FileSection, RuleReport, TableLayout, ValidationOutcome};

const REPORT_TITLE: &str = "Validation Report";
const LIST_INDENT: &str = "        - ";

/// Identifying information printed at the top of a report.
#[derive(Debug, Clone, Default)]
pub struct ReportHeader {
    pub report_path: String,
    pub folder: String,
    /// `(label, path)` pairs naming the schema files.
    pub schema_files: Vec<(String, String)>,
    pub model_tag: Option<String>,
}

/// Boxed banner for a report section.
///
/// ```text
/// #############
/// #           #
/// #   title   #
/// #           #
/// #############
/// ```
pub fn section_header(title: &str) -> String {
    banner(title, 3)
}

fn banner(title: &str, padding: usize) -> String {
    let inner = title.chars().count() + 2 * padding;
    let edge = "#".repeat(inner + 2);
    let blank = format!("#{}#", " ".repeat(inner));
    let pad = " ".repeat(padding);
    [
        edge.clone(),
        blank.clone(),
        format!("#{pad}{title}{pad}#"),
        blank,
        edge,
    ]
    .join("\n")
}

/// Render the report preamble followed by every rule section, in rule order.
pub fn render_report(header: &ReportHeader, outcome: &ValidationOutcome) -> String {
    let mut lines = Vec::new();

    lines.push(banner(REPORT_TITLE, 1));
    lines.push(String::new());
    lines.push("Validation report filename:".to_string());
    lines.push(format!("{LIST_INDENT}{}", header.report_path));
    lines.push("Submission file folder for validation: ".to_string());
    lines.push(format!("{LIST_INDENT}{}", header.folder));
    for (label, path) in &header.schema_files {
        lines.push(format!("{label}: "));
        lines.push(format!("{LIST_INDENT}{path}"));
    }
    if let Some(tag) = &header.model_tag {
        lines.push("Model tag:".to_string());
        lines.push(format!("{LIST_INDENT}{tag}"));
    }
    lines.push(String::new());

    let summary = &outcome.summary;
    lines.push("Files loaded for validation:".to_string());
    for file in &summary.files_loaded {
        lines.push(format!("{LIST_INDENT}{file}"));
    }
    if !summary.rejected_files.is_empty() {
        lines.push("Files rejected before validation:".to_string());
        for rejected in &summary.rejected_files {
            lines.push(format!(
                "{LIST_INDENT}{}: {}",
                rejected.file_name, rejected.reason
            ));
        }
    }
    if !summary.excluded_files.is_empty() {
        lines.push("Files excluded by node type:".to_string());
        for file in &summary.excluded_files {
            lines.push(format!("{LIST_INDENT}{file}"));
        }
    }
    lines.push(String::new());

    let sections = outcome
        .reports
        .iter()
        .map(render_rule)
        .collect::<Vec<_>>();
    lines.push(sections.join("\n\n"));

    lines.join("\n")
}

/// Render one rule: banner, description, then one block per file.
pub fn render_rule(report: &RuleReport) -> String {
    let mut out = section_header(report.title);
    out.push('\n');
    out.push_str(report.description);

    if let Some(reason) = &report.aborted {
        out.push_str(&format!("\n\tERROR: {reason}\n"));
        return out;
    }

    for section in &report.sections {
        out.push_str(&render_section(section, &report.layout));
    }
    out
}

fn render_section(section: &FileSection, layout: &TableLayout) -> String {
    let mut out = format!("\n\t{}\n\t----------\n", section.node);
    for notice in &section.notices {
        out.push_str(&format!("\t{notice}\n"));
    }
    if section.findings.is_empty() {
        return out;
    }

    let rows = section
        .findings
        .iter()
        .map(|finding| {
            vec![
                wrap_optional(&finding.node, layout.node_width),
                wrap_optional(&finding.property, layout.property_width),
                finding.check_label(),
                wrap(&finding.detail, layout.detail_width),
            ]
        })
        .collect::<Vec<_>>();
    let grid = rounded_grid(&["node", "property", "check", layout.detail_header], &rows);
    out.push('\t');
    out.push_str(&grid.replace('\n', "\n\t"));
    out.push('\n');
    out
}

fn wrap_optional(text: &str, width: Option<usize>) -> String {
    match width {
        Some(width) => wrap(text, width),
        None => text.to_string(),
    }
}
