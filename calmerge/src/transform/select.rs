//! Column subsets, row filtering and renaming.

use regex::Regex;
use tracing::info;

use crate::error::{TransformError, TransformResult};
use crate::models::{compare_keys, default_justification, Matrix, Row, Table};

/// Keep only the given 1-based value columns, in the given order.
pub fn select_columns(table: Table, columns: &[usize]) -> TransformResult<Table> {
    let max = table.matrix.value_width();
    if let Some(&bad) = columns.iter().find(|&&c| c == 0 || c > max) {
        return Err(TransformError::ColumnOutOfRange { column: bad, max });
    }

    let pick = |cells: &[String]| -> Vec<String> { columns.iter().map(|&c| cells[c - 1].clone()).collect() };

    let Matrix { header, rows } = table.matrix;
    let mut new_header = vec![header[0].clone()];
    new_header.extend(pick(&header[1..]));

    let rows = rows
        .into_iter()
        .map(|row| {
            let values = pick(&row.values);
            Row::new(row.key, values)
        })
        .collect();

    let matrix = Matrix::new(new_header, rows);
    let justify = default_justification(matrix.header.len());
    Ok(Table { matrix, justify })
}

/// Keep rows whose key matches `pattern`.
///
/// Rows are re-sorted by key unless `preserve_order` is set.
pub fn filter_rows(table: Table, pattern: &str, preserve_order: bool) -> TransformResult<Table> {
    let re = Regex::new(pattern)?;
    let Table { matrix, justify } = table;

    let mut rows: Vec<Row> = matrix.rows.into_iter().filter(|r| re.is_match(&r.key)).collect();
    if !preserve_order {
        rows.sort_by(|a, b| compare_keys(&a.key, &b.key));
    }

    Ok(Table {
        matrix: Matrix {
            header: matrix.header,
            rows,
        },
        justify,
    })
}

/// Replace the value column headers.
pub fn rename_columns(table: Table, names: &[String]) -> TransformResult<Table> {
    let Table { mut matrix, justify } = table;

    if names.len() != matrix.value_width() {
        return Err(TransformError::RenameMismatch {
            what: "column",
            expected: matrix.value_width(),
            got: names.len(),
        });
    }

    for (old, new) in matrix.header[1..].iter_mut().zip(names) {
        info!("Renaming column {} to {}", old, new);
        *old = new.clone();
    }

    Ok(Table { matrix, justify })
}

/// Replace the row keys, in row order.
pub fn rename_rows(table: Table, names: &[String]) -> TransformResult<Table> {
    let Table { mut matrix, justify } = table;

    if names.len() != matrix.rows.len() {
        return Err(TransformError::RenameMismatch {
            what: "row",
            expected: matrix.rows.len(),
            got: names.len(),
        });
    }

    for (row, new) in matrix.rows.iter_mut().zip(names) {
        info!("Renaming row {} to {}", row.key, new);
        row.key = new.clone();
    }

    Ok(Table { matrix, justify })
}
