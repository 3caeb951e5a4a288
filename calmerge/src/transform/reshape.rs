//! Reshaping stages: split by workload type and transpose.

use crate::error::{TransformError, TransformResult};
use crate::models::{default_justification, Conventions, Matrix, Row, Table};

/// Lay the rows of each workload type side by side.
///
/// Each type gets its own block of columns, labelled `<type>-<header>`.
/// Rows are re-keyed 0, 1, ... and shorter blocks are padded with the
/// no-data sentinel.
pub fn split_workload_types(table: Table, conventions: &Conventions) -> TransformResult<Table> {
    let Matrix { header, rows } = table.matrix;
    let types = &conventions.workload_types;
    let width = header.len().saturating_sub(1);

    let mut blocks: Vec<Vec<Vec<String>>> = vec![Vec::new(); types.len()];
    for row in rows {
        let t = conventions
            .workload_type_of(&row.key)
            .ok_or_else(|| TransformError::UntypedRow(row.key.clone()))?;
        let slot = types.iter().position(|x| x == t).unwrap_or_default();
        blocks[slot].push(row.values);
    }

    let mut new_header = vec![String::new()];
    for t in types {
        new_header.extend(header[1..].iter().map(|h| format!("{t}-{h}")));
    }

    let height = blocks.iter().map(Vec::len).max().unwrap_or(0);
    let padding = vec![conventions.no_data.clone(); width];

    let rows = (0..height)
        .map(|line| {
            let values = blocks
                .iter()
                .flat_map(|block| block.get(line).unwrap_or(&padding).iter().cloned())
                .collect();
            Row::new(line.to_string(), values)
        })
        .collect();

    let matrix = Matrix::new(new_header, rows);
    let justify = default_justification(matrix.header.len());
    Ok(Table { matrix, justify })
}

/// Transpose the table; the header becomes the first column.
///
/// Justification resets to the default for the new width.
pub fn invert(table: Table) -> Table {
    let grid = table.matrix.to_grid();
    let width = grid.first().map_or(0, Vec::len);

    let mut transposed = (0..width).map(|c| grid.iter().map(move |line| line[c].clone()));
    let header: Vec<String> = transposed.next().map(|h| h.collect()).unwrap_or_default();
    let rows = transposed
        .map(|mut cells| {
            let key = cells.next().unwrap_or_default();
            Row::new(key, cells.collect())
        })
        .collect();

    let matrix = Matrix::new(header, rows);
    let justify = default_justification(matrix.header.len());
    Table { matrix, justify }
}
