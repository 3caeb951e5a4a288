//! Error types for the merge-and-transform pipeline.
//!
//! One enum per stage of the data flow:
//!
//! - [`ParseError`] - reading and tokenizing result files
//! - [`MergeError`] - combining parsed files into one matrix
//! - [`TransformError`] - analytic stages applied to the merged matrix
//! - [`FormatError`] - rendering the final matrix
//! - [`ConfigError`] - loading run configuration
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Every lower-level error converts into [`PipelineError`] via `From`,
//! so `?` works across stage boundaries.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Parse Errors
// =============================================================================

/// Errors while reading a result file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Failed to read file.
    #[error("Cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No header line.
    #[error("File '{0}' is empty")]
    EmptyFile(String),

    /// The separator is not a valid regular expression.
    #[error("Invalid separator pattern: {0}")]
    InvalidSeparator(#[from] regex::Error),

    /// Header length is neither the row width nor one less.
    #[error("Unknown header format in '{source_name}': header has {header_len} columns, data rows have {row_len} fields")]
    UnknownHeaderFormat {
        source_name: String,
        header_len: usize,
        row_len: usize,
    },
}

// =============================================================================
// Merge Errors
// =============================================================================

/// Errors while merging parsed files.
#[derive(Debug, Error)]
pub enum MergeError {
    /// A padded row does not match the running header width.
    #[error("Merged row '{key}' has {len} values after '{source_name}', expected {expected}")]
    NotRectangular {
        key: String,
        source_name: String,
        len: usize,
        expected: usize,
    },
}

// =============================================================================
// Transform Errors
// =============================================================================

/// Errors raised by transform stages.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Column subset spec is not a comma separated list of integers.
    #[error("Print spec parse error for string {0}")]
    InvalidPrintSpec(String),

    /// Rename list length does not match.
    #[error("New {what} names must match the existing count: expected {expected}, got {got}")]
    RenameMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// Column index outside the matrix.
    #[error("Column {column} does not exist, must be in the range from 1 to {max}")]
    ColumnOutOfRange { column: usize, max: usize },

    /// Row index outside the matrix.
    #[error("Row {row} does not exist, must be in the range from 1 to {max}")]
    RowOutOfRange { row: usize, max: usize },

    /// Normalization target is not `max`, `column` or `column,row`.
    #[error("Cannot parse normalize to specification {0}")]
    InvalidNormalizeTarget(String),

    /// Reference cell holds a sentinel or a non-number.
    #[error("Value {value} is invalid. Cannot normalize to column {column}{}", .row.map(|r| format!(" and row {r}")).unwrap_or_default())]
    InvalidReference {
        value: String,
        column: usize,
        row: Option<usize>,
    },

    /// A cell to be normalized is not a number.
    #[error("Normalization failed on line {row}, column {column}: cannot convert '{value}'")]
    NormalizeFailed {
        row: usize,
        column: usize,
        value: String,
    },

    /// Row filter is not a valid regular expression.
    #[error("Invalid filter pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Split needs every row key to carry a workload type.
    #[error("Row '{0}' does not contain a workload type")]
    UntypedRow(String),
}

// =============================================================================
// Format Errors
// =============================================================================

/// Errors while rendering output.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Nothing to print.
    #[error("Output matrix is empty, nothing to print")]
    EmptyMatrix,

    /// Justification vector does not match a row.
    #[error("Justification has {expected} entries but row '{key}' has {got} columns")]
    JustificationMismatch {
        key: String,
        expected: usize,
        got: usize,
    },

    /// Writing the output failed.
    #[error("Cannot write output: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Conventions file could not be read.
    #[error("Cannot read conventions file: {0}")]
    Io(#[from] std::io::Error),

    /// Conventions file is not valid JSON.
    #[error("Invalid conventions file: {0}")]
    Json(#[from] serde_json::Error),

    /// Conventions need at least one workload type.
    #[error("Conventions must list at least one workload type")]
    NoWorkloadTypes,
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level errors returned by [`crate::transform::pipeline::run`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Parse error.
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// Merge error.
    #[error("{0}")]
    Merge(#[from] MergeError),

    /// Transform error.
    #[error("{0}")]
    Transform(#[from] TransformError),

    /// Format error.
    #[error("{0}")]
    Format(#[from] FormatError),

    /// Config error.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// No input files.
    #[error("No input files given")]
    NoInput,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for merging.
pub type MergeResult<T> = Result<T, MergeError>;

/// Result type for transform stages.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for rendering.
pub type FormatResult<T> = Result<T, FormatError>;

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for the whole pipeline.
pub type PipelineResult<T> = Result<T, PipelineError>;
