//! Domain models shared by every stage of the pipeline.
//!
//! - [`Conventions`] - sentinel tokens and workload-type identifiers
//! - [`FileTable`] - one parsed result file
//! - [`Matrix`] / [`Row`] - the merged, keyed value grid
//! - [`Table`] - a matrix plus its per-column [`Align`]ment
//! - [`ColumnProvenance`] - which file each merged column came from

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

// =============================================================================
// Conventions
// =============================================================================

/// Tokens and identifiers that give meaning to raw cell values.
///
/// Passed explicitly to every component that needs them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Conventions {
    /// Missing measurement.
    pub no_data: String,
    /// Error markers. Rows holding one are dropped at parse time by default.
    pub error_markers: Vec<String>,
    /// Workload-type identifiers, in reporting order.
    pub workload_types: Vec<String>,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            no_data: "NoData".to_string(),
            error_markers: vec!["N/A".to_string(), "RM".to_string()],
            workload_types: ["h", "m", "l", "s", "a"].iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Conventions {
    /// Parse conventions from a JSON string. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Whether the value is the no-data sentinel or an error marker.
    pub fn is_sentinel(&self, value: &str) -> bool {
        value == self.no_data || self.is_error(value)
    }

    /// Whether the value is an error marker.
    pub fn is_error(&self, value: &str) -> bool {
        self.error_markers.iter().any(|m| m == value)
    }

    /// The workload type embedded in a row key as `-<type>-`.
    ///
    /// When several match, the one listed last wins.
    pub fn workload_type_of(&self, key: &str) -> Option<&str> {
        self.workload_types
            .iter()
            .filter(|t| key.contains(&format!("-{t}-")))
            .last()
            .map(String::as_str)
    }
}

// =============================================================================
// Parsed files
// =============================================================================

/// One parsed result file. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct FileTable {
    /// Header tokens, possibly without a label for the key column.
    pub header: Vec<String>,
    /// Data rows; every row has `column_count` fields, key first.
    pub rows: Vec<Vec<String>>,
    /// Fields per row, key included.
    pub column_count: usize,
    /// File name the table was read from.
    pub source_name: String,
}

impl FileTable {
    /// Number of value columns (key excluded).
    pub fn value_count(&self) -> usize {
        self.column_count.saturating_sub(1)
    }

    /// Header labels of the value columns only.
    pub fn value_headers(&self) -> &[String] {
        if self.header.len() == self.column_count && !self.header.is_empty() {
            &self.header[1..]
        } else {
            &self.header
        }
    }
}

/// Maps each merged value column (0-based) to the file it came from.
pub type ColumnProvenance = Vec<String>;

// =============================================================================
// Matrix
// =============================================================================

/// A keyed row of the merged matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub key: String,
    pub values: Vec<String>,
}

impl Row {
    pub fn new(key: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }

    /// Cell by full-row index: 0 is the key, 1.. are values.
    pub fn cell(&self, index: usize) -> Option<&str> {
        if index == 0 {
            Some(&self.key)
        } else {
            self.values.get(index - 1).map(String::as_str)
        }
    }

    /// Number of cells including the key.
    pub fn width(&self) -> usize {
        self.values.len() + 1
    }
}

/// Header plus keyed rows. `header[0]` labels the key column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Matrix {
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

impl Matrix {
    /// Build a matrix, dropping any row whose width disagrees with the header.
    pub fn new(header: Vec<String>, rows: Vec<Row>) -> Self {
        let width = header.len();
        let rows = rows.into_iter().filter(|r| r.width() == width).collect();
        Self { header, rows }
    }

    /// Number of value columns.
    pub fn value_width(&self) -> usize {
        self.header.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The header and rows as one grid of strings, header first.
    pub fn to_grid(&self) -> Vec<Vec<String>> {
        let mut grid = Vec::with_capacity(self.rows.len() + 1);
        grid.push(self.header.clone());
        for row in &self.rows {
            let mut line = Vec::with_capacity(row.width());
            line.push(row.key.clone());
            line.extend(row.values.iter().cloned());
            grid.push(line);
        }
        grid
    }
}

// =============================================================================
// Justification
// =============================================================================

/// Column alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Right,
}

/// One [`Align`] per column.
pub type Justification = Vec<Align>;

/// Key column left, everything else right.
pub fn default_justification(width: usize) -> Justification {
    (0..width)
        .map(|i| if i == 0 { Align::Left } else { Align::Right })
        .collect()
}

/// A matrix travelling through the pipeline with its justification.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub matrix: Matrix,
    pub justify: Justification,
}

impl Table {
    /// Wrap a matrix with the default justification.
    pub fn new(matrix: Matrix) -> Self {
        let justify = default_justification(matrix.header.len());
        Self { matrix, justify }
    }
}

// =============================================================================
// Value helpers
// =============================================================================

/// Parse a cell as a number.
pub fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}

/// Render a number with a fixed number of decimals.
pub fn number_to_string(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

/// Whether `value` renders as zero at the given precision.
pub fn rounds_to_zero(value: f64, decimals: usize) -> bool {
    number_to_string(value.abs(), decimals) == number_to_string(0.0, decimals)
}

/// Row key ordering: integer keys numerically and first, the rest lexicographically.
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
