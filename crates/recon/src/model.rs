use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Normalized in-memory table: one header row plus data rows.
///
/// Rows produced by the parser are always exactly as wide as the widest row
/// (and, with [`crate::HeaderPadding::Pad`], as wide as the headers). Cells are
/// never absent; missing data is the empty string. A row index is only
/// meaningful within one instance and changes whenever rows are filtered or
/// merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableModel {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableModel {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Build a table from string literals. Mostly useful in tests.
    pub fn from_strs(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    /// Same headers, no rows.
    pub fn with_headers_of(other: &TableModel) -> Self {
        Self {
            headers: other.headers.clone(),
            rows: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when there are neither headers nor rows.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }

    /// First column whose header equals `name` exactly.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at (row, col), or "" when the row is narrower than `col`.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(|s| s.as_str())
            .unwrap_or("")
    }
}

/// A row is structurally blank when every cell is the empty string.
pub fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|c| c.is_empty())
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// How one target row was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "pass", rename_all = "snake_case")]
pub enum RowOutcome {
    /// Matched on every key in the first pass.
    Strict { source_row: usize },
    /// Matched in the second pass with the trailing key ignored.
    Relaxed { source_row: usize },
    Unmatched,
}

impl RowOutcome {
    pub fn source_row(&self) -> Option<usize> {
        match self {
            Self::Strict { source_row } | Self::Relaxed { source_row } => Some(*source_row),
            Self::Unmatched => None,
        }
    }

    pub fn is_matched(&self) -> bool {
        !matches!(self, Self::Unmatched)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub target_rows: usize,
    pub source_rows: usize,
    pub strict: usize,
    pub relaxed: usize,
    pub unmatched: usize,
    /// Source rows never consumed by any target row.
    pub unused_source: usize,
}

impl ReconSummary {
    pub fn matched(&self) -> usize {
        self.strict + self.relaxed
    }
}

/// Reconciler output: the enriched table plus per-row provenance.
#[derive(Debug, Clone, Serialize)]
pub struct Reconciliation {
    pub table: TableModel,
    pub outcomes: Vec<RowOutcome>,
    pub summary: ReconSummary,
}

// ---------------------------------------------------------------------------
// Accumulation
// ---------------------------------------------------------------------------

/// Result of merging one upload into the master dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    pub appended: usize,
    /// Incoming rows suppressed because an identical row already existed.
    pub duplicates: usize,
}
