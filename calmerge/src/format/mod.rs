//! Rendering of the final table.
//!
//! Text output is produced in two passes: widths are measured on the plain
//! cell text, then cells are padded and, optionally, colored. Styling never
//! affects alignment.

use crossterm::style::Stylize;

use crate::error::{FormatError, FormatResult};
use crate::models::{parse_number, Align, ColumnProvenance, Matrix, Table};

/// Spaces added to the widest cell of each column.
pub const COLUMN_PADDING: usize = 2;

const REPORT_ID_WIDTH: usize = 7;
const REPORT_NAME_WIDTH: usize = 45;

/// How a numeric cell compares to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Favorable,
    Unfavorable,
}

/// Tone of a cell, or `None` for non-numbers and exactly 1.0.
pub fn tone(value: &str) -> Option<Tone> {
    let v = parse_number(value)?;
    if v > 1.0 {
        Some(Tone::Favorable)
    } else if v < 1.0 {
        Some(Tone::Unfavorable)
    } else {
        None
    }
}

/// Renders a [`Table`] as aligned text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Formatter {
    /// Color value cells relative to 1.0.
    pub color: bool,
}

impl Formatter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Display width of each column: the longest plain cell plus padding.
    pub fn column_widths(table: &Table) -> Vec<usize> {
        let mut widths = vec![0; table.matrix.header.len()];
        for line in table.matrix.to_grid() {
            for (w, cell) in widths.iter_mut().zip(&line) {
                *w = (*w).max(cell.chars().count());
            }
        }
        widths.iter().map(|w| w + COLUMN_PADDING).collect()
    }

    /// Render the table, one line per row with the header first.
    pub fn render(&self, table: &Table) -> FormatResult<String> {
        if table.matrix.is_empty() {
            return Err(FormatError::EmptyMatrix);
        }

        let grid = table.matrix.to_grid();
        for line in &grid {
            if line.len() != table.justify.len() {
                return Err(FormatError::JustificationMismatch {
                    key: line[0].clone(),
                    expected: table.justify.len(),
                    got: line.len(),
                });
            }
        }

        let widths = Self::column_widths(table);
        let mut out = String::new();

        for (r, line) in grid.iter().enumerate() {
            let mut text = String::new();
            for (c, cell) in line.iter().enumerate() {
                let fill = " ".repeat(widths[c].saturating_sub(cell.chars().count()));
                let styled = if self.color && r > 0 && c > 0 {
                    paint(cell)
                } else {
                    cell.clone()
                };
                let align = if c == 0 { Align::Left } else { table.justify[c] };
                match align {
                    Align::Left => {
                        text.push_str(&styled);
                        text.push_str(&fill);
                    }
                    Align::Right => {
                        text.push_str(&fill);
                        text.push_str(&styled);
                    }
                }
            }
            out.push_str(text.trim_end());
            out.push('\n');
        }

        Ok(out)
    }
}

fn paint(cell: &str) -> String {
    match tone(cell) {
        Some(Tone::Favorable) => cell.green().to_string(),
        Some(Tone::Unfavorable) => cell.red().to_string(),
        None => cell.to_string(),
    }
}

/// The matrix as pretty-printed JSON.
pub fn render_json(matrix: &Matrix) -> FormatResult<String> {
    if matrix.is_empty() {
        return Err(FormatError::EmptyMatrix);
    }
    Ok(serde_json::to_string_pretty(matrix)?)
}

/// Lists every value column with its 1-based ID and originating file.
pub fn column_report(matrix: &Matrix, provenance: &ColumnProvenance) -> String {
    let mut out = String::from("\nColumn ID to column name mapping\n\n");
    out.push_str(&format!(
        "{:<id$}{:<name$}{}\n",
        "ColID",
        "Column name",
        "Filename",
        id = REPORT_ID_WIDTH,
        name = REPORT_NAME_WIDTH
    ));

    for (i, name) in matrix.header.iter().skip(1).enumerate() {
        let file = provenance.get(i).map(String::as_str).unwrap_or_default();
        let line = format!(
            "{:<id$}{:<name$}{}",
            i + 1,
            name,
            file,
            id = REPORT_ID_WIDTH,
            name = REPORT_NAME_WIDTH
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
