use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::errors::{EvalError, EvalResult};

/// Column declaring the node type of every row in a submission file.
pub const TYPE_COLUMN: &str = "type";

/// Cell values read as "no value".
pub const BLANK_MARKERS: [&str; 5] = ["", "NA", "na", "N/A", "n/a"];

/// Offset from a zero-based row index to the line shown in reports
/// (header line plus one-based numbering).
pub const ROW_OFFSET: usize = 2;

const SUBMISSION_EXTENSIONS: [&str; 2] = ["tsv", "txt"];

/// Report line number of a zero-based row index.
pub fn display_row(index: usize) -> usize {
    index + ROW_OFFSET
}

/// Map a raw cell to `None` when it is a blank marker.
pub fn normalize_cell(raw: &str) -> Option<String> {
    if BLANK_MARKERS.contains(&raw) {
        None
    } else {
        Some(raw.to_string())
    }
}

/// One submitted file, loaded and tagged with its node type.
#[derive(Debug, Clone)]
pub struct RecordTable {
    file_name: String,
    path: PathBuf,
    node_type: String,
    columns: Vec<String>,
    column_lookup: HashMap<String, usize>,
    rows: Vec<Vec<Option<String>>>,
}

impl RecordTable {
    /// Parse tab-separated text. `file_name` labels the table in errors and
    /// reports.
    pub fn from_reader<R: Read>(file_name: impl Into<String>, reader: R) -> EvalResult<Self> {
        let file_name = file_name.into();
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        let columns = reader
            .headers()?
            .iter()
            .map(|header| header.to_string())
            .collect::<Vec<_>>();
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row = (0..columns.len())
                .map(|idx| record.get(idx).and_then(normalize_cell))
                .collect::<Vec<_>>();
            rows.push(row);
        }

        let type_idx = columns
            .iter()
            .position(|name| name == TYPE_COLUMN)
            .ok_or_else(|| EvalError::MissingTypeColumn {
                file: file_name.clone(),
            })?;
        let node_type = single_node_type(&file_name, &rows, type_idx)?;
        Self::from_rows(file_name, node_type, columns, rows)
    }

    /// Build a table from in-memory rows declaring `node_type`. Every
    /// non-blank `type` cell must name that node type; a table without rows
    /// is allowed.
    pub fn from_rows(
        file_name: impl Into<String>,
        node_type: impl Into<String>,
        columns: Vec<String>,
        mut rows: Vec<Vec<Option<String>>>,
    ) -> EvalResult<Self> {
        let file_name = file_name.into();
        let node_type = node_type.into();

        let mut column_lookup = HashMap::new();
        for (idx, name) in columns.iter().enumerate() {
            column_lookup.entry(name.clone()).or_insert(idx);
        }
        let type_idx = column_lookup
            .get(TYPE_COLUMN)
            .copied()
            .ok_or_else(|| EvalError::MissingTypeColumn {
                file: file_name.clone(),
            })?;

        for row in &mut rows {
            row.resize(columns.len(), None);
        }
        let foreign = rows
            .iter()
            .filter_map(|row| row[type_idx].as_deref())
            .find(|value| *value != node_type);
        if let Some(foreign) = foreign {
            return Err(EvalError::AmbiguousNodeType {
                found: format!("{node_type}, {foreign}"),
                file: file_name,
            });
        }

        Ok(Self {
            file_name,
            path: PathBuf::new(),
            node_type,
            columns,
            column_lookup,
            rows,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    /// Column headers in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_lookup.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<Column<'_>> {
        self.column_lookup
            .get(name)
            .map(|&index| Column { table: self, index })
    }

    /// Cell at `row` in the column at position `index`.
    fn cell(&self, row: usize, index: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(index))
            .and_then(|cell| cell.as_deref())
    }
}

/// Read-only view over one column of a [`RecordTable`].
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    table: &'a RecordTable,
    index: usize,
}

impl<'a> Column<'a> {
    /// Cells in row order; `None` marks a blank.
    pub fn cells(self) -> impl Iterator<Item = Option<&'a str>> + 'a {
        let table = self.table;
        let index = self.index;
        (0..table.row_count()).map(move |row| table.cell(row, index))
    }

    /// Cell at zero-based `row`.
    pub fn get(self, row: usize) -> Option<&'a str> {
        self.table.cell(row, self.index)
    }

    /// Non-blank cells with their zero-based row index.
    pub fn values(self) -> impl Iterator<Item = (usize, &'a str)> + 'a {
        self.cells()
            .enumerate()
            .filter_map(|(row, cell)| cell.map(|value| (row, value)))
    }

    pub fn is_blank(self) -> bool {
        self.values().next().is_none()
    }

    /// Distinct non-blank values in order of first appearance.
    pub fn distinct(self) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        self.values()
            .map(|(_, value)| value)
            .filter(|value| seen.insert(*value))
            .collect()
    }

    /// Set of non-blank values, for membership lookups.
    pub fn value_set(self) -> HashSet<&'a str> {
        self.values().map(|(_, value)| value).collect()
    }
}

fn single_node_type(
    file_name: &str,
    rows: &[Vec<Option<String>>],
    type_idx: usize,
) -> EvalResult<String> {
    let mut found: Vec<&str> = Vec::new();
    for row in rows {
        if let Some(Some(value)) = row.get(type_idx) {
            if !found.contains(&value.as_str()) {
                found.push(value);
            }
        }
    }
    match found.as_slice() {
        [single] => Ok(single.to_string()),
        _ => Err(EvalError::AmbiguousNodeType {
            file: file_name.to_string(),
            found: found.join(", "),
        }),
    }
}

/// Load one submission file from disk.
pub fn load_table(path: &Path) -> EvalResult<RecordTable> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let file = std::fs::File::open(path)?;
    let mut table = RecordTable::from_reader(file_name, file)?;
    table.path = path.to_path_buf();
    tracing::debug!(
        event = "table_loaded",
        file = %table.file_name,
        node_type = %table.node_type,
        rows = table.row_count()
    );
    Ok(table)
}

/// A file that could not be validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedFile {
    pub file_name: String,
    pub reason: String,
}

/// Files of one submission folder, split into loaded, rejected and
/// excluded files.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub folder: PathBuf,
    pub tables: Vec<RecordTable>,
    pub rejected: Vec<RejectedFile>,
    pub excluded: Vec<String>,
}

impl Submission {
    pub fn from_tables(folder: impl Into<PathBuf>, tables: Vec<RecordTable>) -> Self {
        Self {
            folder: folder.into(),
            tables,
            ..Self::default()
        }
    }
}

/// Load every `*.tsv`/`*.txt` file of `folder` in file name order.
///
/// Files with a missing or ambiguous `type` column are recorded as rejected
/// and the remaining files still load. Tables whose node type is listed in
/// `exclude_node_types` are dropped.
pub fn discover_submission(folder: &Path, exclude_node_types: &[String]) -> EvalResult<Submission> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        let is_submission = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SUBMISSION_EXTENSIONS.contains(&ext.to_lowercase().as_str()));
        if path.is_file() && is_submission {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut submission = Submission {
        folder: folder.to_path_buf(),
        ..Submission::default()
    };
    for path in paths {
        match load_table(&path) {
            Ok(table) if exclude_node_types.iter().any(|node| node == table.node_type()) => {
                tracing::info!(
                    event = "file_excluded",
                    file = %table.file_name(),
                    node_type = %table.node_type()
                );
                submission.excluded.push(table.file_name().to_string());
            }
            Ok(table) => submission.tables.push(table),
            Err(err) if err.is_file_rejection() => {
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_default();
                tracing::warn!(event = "file_rejected", file = %file_name, error = %err);
                submission.rejected.push(RejectedFile {
                    file_name,
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    Ok(submission)
}

/// Map node type to table. Fails when two tables declare the same type.
pub fn index_node_types(tables: &[RecordTable]) -> EvalResult<BTreeMap<&str, &RecordTable>> {
    let mut index: BTreeMap<&str, &RecordTable> = BTreeMap::new();
    for table in tables {
        if let Some(first) = index.insert(table.node_type(), table) {
            return Err(EvalError::DuplicateNodeType {
                node_type: table.node_type().to_string(),
                first: first.file_name().to_string(),
                second: table.file_name().to_string(),
            });
        }
    }
    Ok(index)
}
