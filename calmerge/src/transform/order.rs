//! Column-wise and row-wise sorting.

use std::cmp::Ordering;

use crate::error::{TransformError, TransformResult};
use crate::models::{number_to_string, parse_number, Matrix, Row, Table};

/// Sort each column independently in ascending order.
///
/// Rows lose their identity: keys become 1-based ranks. Numbers are
/// re-rendered at `decimals`; non-numeric cells follow them unchanged.
pub fn sort_columns(table: Table, decimals: usize) -> Table {
    let Table { matrix, justify } = table;
    let width = matrix.value_width();
    let height = matrix.rows.len();

    let columns: Vec<Vec<String>> = (0..width)
        .map(|c| {
            let mut numbers = Vec::new();
            let mut others = Vec::new();
            for row in &matrix.rows {
                let cell = &row.values[c];
                match parse_number(cell) {
                    Some(v) => numbers.push(v),
                    None => others.push(cell.clone()),
                }
            }
            numbers.sort_by(f64::total_cmp);
            numbers
                .into_iter()
                .map(|v| number_to_string(v, decimals))
                .chain(others)
                .collect()
        })
        .collect();

    let rows = (0..height)
        .map(|r| {
            let values = columns.iter().map(|col| col[r].clone()).collect();
            Row::new((r + 1).to_string(), values)
        })
        .collect();

    Table {
        matrix: Matrix {
            header: matrix.header,
            rows,
        },
        justify,
    }
}

/// Reorder rows by the 1-based value column `column`, largest first.
///
/// The sort is stable and non-numeric cells go last.
pub fn sort_after_column(table: Table, column: usize) -> TransformResult<Table> {
    let Table { mut matrix, justify } = table;
    let max = matrix.value_width();
    if column == 0 || column > max {
        return Err(TransformError::ColumnOutOfRange { column, max });
    }

    matrix.rows.sort_by(|a, b| {
        let x = parse_number(&a.values[column - 1]);
        let y = parse_number(&b.values[column - 1]);
        match (x, y) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });

    Ok(Table { matrix, justify })
}
