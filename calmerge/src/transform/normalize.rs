//! Normalization of row values against a reference.
//!
//! The reference is a column shared by all rows, one fixed cell, or each
//! row's own maximum. Both numerator and reference rounding to zero gives
//! 1.0; a zero reference with a non-zero numerator gives `inf`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TransformError, TransformResult};
use crate::models::{number_to_string, parse_number, rounds_to_zero, Conventions, Matrix, Row, Table};

/// What each row is divided by. Indices are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NormalizeTarget {
    /// The row's largest numeric value.
    Max,
    /// The same column in every row.
    Column { column: usize },
    /// One fixed cell.
    Cell { column: usize, row: usize },
}

impl FromStr for NormalizeTarget {
    type Err = TransformError;

    /// Parses `max`, `<column>` or `<column>,<row>`.
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let invalid = || TransformError::InvalidNormalizeTarget(spec.to_string());

        if spec.trim() == "max" {
            return Ok(NormalizeTarget::Max);
        }

        let parts: Vec<&str> = spec.split(',').map(str::trim).collect();
        let column = parts[0].parse::<usize>().map_err(|_| invalid())?;
        match parts.len() {
            1 => Ok(NormalizeTarget::Column { column }),
            2 => {
                let row = parts[1].parse::<usize>().map_err(|_| invalid())?;
                Ok(NormalizeTarget::Cell { column, row })
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for NormalizeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeTarget::Max => write!(f, "max"),
            NormalizeTarget::Column { column } => write!(f, "{column}"),
            NormalizeTarget::Cell { column, row } => write!(f, "{column},{row}"),
        }
    }
}

/// Read a reference cell, rejecting sentinels and non-numbers.
fn read_reference(value: &str, column: usize, row: Option<usize>, conventions: &Conventions) -> TransformResult<f64> {
    let invalid = || TransformError::InvalidReference {
        value: value.to_string(),
        column,
        row,
    };
    if conventions.is_sentinel(value) {
        return Err(invalid());
    }
    parse_number(value).ok_or_else(invalid)
}

fn check_column(column: usize, matrix: &Matrix) -> TransformResult<()> {
    let max = matrix.value_width();
    if column == 0 || column > max {
        return Err(TransformError::ColumnOutOfRange { column, max });
    }
    Ok(())
}

/// Divide one value by the reference, rendering at `decimals`.
fn ratio(value: f64, reference: f64, decimals: usize) -> String {
    if rounds_to_zero(reference, decimals) && rounds_to_zero(value, decimals) {
        number_to_string(1.0, decimals)
    } else if reference == 0.0 {
        "inf".to_string()
    } else {
        number_to_string(value / reference, decimals)
    }
}

fn normalize_row(
    row: Row,
    line: usize,
    reference: f64,
    decimals: usize,
    conventions: &Conventions,
) -> TransformResult<Row> {
    let values = row
        .values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            if conventions.is_sentinel(&value) {
                return Ok(value);
            }
            let v = parse_number(&value).ok_or_else(|| TransformError::NormalizeFailed {
                row: line,
                column: i + 1,
                value: value.clone(),
            })?;
            Ok(ratio(v, reference, decimals))
        })
        .collect::<TransformResult<Vec<String>>>()?;

    Ok(Row::new(row.key, values))
}

/// Normalize every row of the table against `target`.
pub fn normalize(
    table: Table,
    target: NormalizeTarget,
    decimals: usize,
    conventions: &Conventions,
) -> TransformResult<Table> {
    let Table { matrix, justify } = table;

    let fixed = match target {
        NormalizeTarget::Cell { column, row } => {
            check_column(column, &matrix)?;
            let max = matrix.rows.len();
            let cell = row
                .checked_sub(1)
                .and_then(|r| matrix.rows.get(r))
                .ok_or(TransformError::RowOutOfRange { row, max })?;
            Some(read_reference(&cell.values[column - 1], column, Some(row), conventions)?)
        }
        NormalizeTarget::Column { column } => {
            check_column(column, &matrix)?;
            None
        }
        NormalizeTarget::Max => None,
    };

    let Matrix { header, rows } = matrix;
    let mut normalized = Vec::with_capacity(rows.len());

    for (i, row) in rows.into_iter().enumerate() {
        let reference = match target {
            NormalizeTarget::Cell { .. } => fixed,
            NormalizeTarget::Column { column } => {
                Some(read_reference(&row.values[column - 1], column, None, conventions)?)
            }
            NormalizeTarget::Max => row
                .values
                .iter()
                .filter(|v| !conventions.is_sentinel(v))
                .filter_map(|v| parse_number(v))
                .reduce(f64::max),
        };

        match reference {
            Some(r) => normalized.push(normalize_row(row, i + 1, r, decimals, conventions)?),
            None => normalized.push(row),
        }
    }

    Ok(Table {
        matrix: Matrix {
            header,
            rows: normalized,
        },
        justify,
    })
}
