use crate::compare::CheckResult;

/// A small table rendered in markdown pipe style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl MarkdownTable {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|header| header.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Left-aligned pipe table with every column padded to its widest cell.
    pub fn render(&self) -> String {
        let widths = self
            .headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect::<Vec<_>>();

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(pipe_line(&self.headers, &widths));
        let rule = widths
            .iter()
            .map(|width| format!(":{}", "-".repeat(width + 1)))
            .collect::<Vec<_>>();
        lines.push(format!("|{}|", rule.join("|")));
        for row in &self.rows {
            lines.push(pipe_line(row, &widths));
        }
        lines.join("\n")
    }
}

fn pipe_line(cells: &[String], widths: &[usize]) -> String {
    let padded = widths
        .iter()
        .enumerate()
        .map(|(idx, width)| {
            let cell = cells.get(idx).map(String::as_str).unwrap_or("");
            let fill = width.saturating_sub(cell.chars().count());
            format!(" {cell}{} ", " ".repeat(fill))
        })
        .collect::<Vec<_>>();
    format!("|{}|", padded.join("|"))
}

/// Submission details printed above the reconciliation results.
#[derive(Debug, Clone, Default)]
pub struct ReconcileHeader {
    pub generated_at: String,
    pub submission_id: String,
    pub study_accession: String,
    /// `None` when the database holds no usable version.
    pub study_version: Option<u32>,
    pub latest_registry_version: Option<String>,
    pub participant_count: usize,
    pub sample_count: usize,
}

const VERSION_NOT_FOUND: &str =
    "Not Found [WARNING: Validation was performed using LATEST version found dbGaP API]";

/// Render every check result after a submission information block.
pub fn render_markdown(header: &ReconcileHeader, results: &[CheckResult]) -> String {
    let version = match header.study_version {
        Some(version) if version > 0 => version.to_string(),
        _ => VERSION_NOT_FOUND.to_string(),
    };

    let mut out = format!(
        "# Metadata Validation Report - {}\n## Submission Information\n\n",
        header.generated_at
    );
    let mut item = |label: &str, value: &str| {
        out.push_str(&format!("- **{label}**\n    - {value}\n\n"));
    };
    item("Submission ID", &header.submission_id);
    item("dbGaP accession in DB", &header.study_accession);
    item("dbGaP version in DB", &version);
    if let Some(latest) = &header.latest_registry_version {
        item("Latest dbGaP version", latest);
    }
    item("Participant count in DB", &header.participant_count.to_string());
    item("Sample count in DB", &header.sample_count.to_string());

    out.push_str("## Validation Report\n\n");
    for result in results {
        out.push_str(&result.to_markdown());
        out.push_str("\n\n");
    }
    out
}
