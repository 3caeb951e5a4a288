//! Column averages and the minimum-value histogram.

use tracing::warn;

use crate::models::{number_to_string, parse_number, Conventions, Matrix, Row, Table};

/// Row key of the [`average`] result.
pub const AVERAGE_KEY: &str = "average";

/// Row key of the [`min_histogram`] result.
pub const HISTOGRAM_KEY: &str = "minimum";

/// Per-column sums over `rows`, divided by the number of rows.
///
/// Non-numeric cells are skipped with a warning but the row still counts.
/// Returns `None` when there are no rows.
fn column_means<'a>(rows: impl Iterator<Item = &'a Row>, width: usize) -> Option<Vec<f64>> {
    let mut sums = vec![0.0; width];
    let mut count = 0usize;

    for row in rows {
        for (sum, value) in sums.iter_mut().zip(&row.values) {
            match parse_number(value) {
                Some(v) => *sum += v,
                None => warn!("Cannot convert '{}' to float, skipping it in row {}", value, row.key),
            }
        }
        count += 1;
    }

    if count == 0 {
        return None;
    }
    Some(sums.into_iter().map(|s| s / count as f64).collect())
}

/// Average every column into a single row keyed [`AVERAGE_KEY`].
pub fn average(table: Table, decimals: usize, conventions: &Conventions) -> Table {
    let Table { matrix, justify } = table;
    let width = matrix.value_width();

    let values = match column_means(matrix.rows.iter(), width) {
        Some(means) => means.into_iter().map(|m| number_to_string(m, decimals)).collect(),
        None => vec![conventions.no_data.clone(); width],
    };

    Table {
        matrix: Matrix {
            header: matrix.header,
            rows: vec![Row::new(AVERAGE_KEY, values)],
        },
        justify,
    }
}

/// Average per workload type, one row per identifier in list order.
///
/// A type with no matching rows yields a row of no-data sentinels.
pub fn typed_average(table: Table, decimals: usize, conventions: &Conventions) -> Table {
    let Table { matrix, justify } = table;
    let width = matrix.value_width();

    let rows = conventions
        .workload_types
        .iter()
        .map(|t| {
            let marker = format!("-{t}-");
            let matching = matrix.rows.iter().filter(|r| r.key.contains(&marker));
            let values = match column_means(matching, width) {
                Some(means) => means.into_iter().map(|m| number_to_string(m, decimals)).collect(),
                None => vec![conventions.no_data.clone(); width],
            };
            Row::new(t.clone(), values)
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

/// Count, per column, the rows in which it holds the minimum value.
///
/// Ties go to the first column. The single result row is keyed
/// [`HISTOGRAM_KEY`] and each cell reads `<percent>  % (<count>)`.
pub fn min_histogram(table: Table) -> Table {
    let Table { matrix, justify } = table;
    let width = matrix.value_width();
    let mut counts = vec![0usize; width];

    for row in &matrix.rows {
        let mut best: Option<(usize, f64)> = None;
        for (i, value) in row.values.iter().enumerate() {
            if let Some(v) = parse_number(value) {
                if best.map_or(true, |(_, b)| v < b) {
                    best = Some((i, v));
                }
            }
        }
        match best {
            Some((i, _)) => counts[i] += 1,
            None => warn!("Row {} has no numeric values, skipping it", row.key),
        }
    }

    let total: usize = counts.iter().sum();
    let values = counts
        .iter()
        .map(|&c| {
            let share = if total == 0 {
                0.0
            } else {
                c as f64 / total as f64 * 100.0
            };
            format!("{share:.1}  % ({c})")
        })
        .collect();

    Table {
        matrix: Matrix {
            header: matrix.header,
            rows: vec![Row::new(HISTOGRAM_KEY, values)],
        },
        justify,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(header: &[&str], rows: Vec<(&str, Vec<&str>)>) -> Table {
        Table::new(Matrix::new(
            header.iter().map(|s| s.to_string()).collect(),
            rows.into_iter()
                .map(|(k, v)| Row::new(k, v.into_iter().map(String::from).collect()))
                .collect(),
        ))
    }

    #[test]
    fn test_average() {
        let t = table(&["", "A", "B"], vec![("fair01", vec!["1", "2"]), ("fair02", vec!["3", "4"])]);
        let out = average(t, 2, &Conventions::default());

        assert_eq!(out.matrix.header, vec!["", "A", "B"]);
        assert_eq!(out.matrix.rows, vec![Row::new("average", vec!["2.00".into(), "3.00".into()])]);
        assert_eq!(out.justify.len(), 3);
    }

    #[test]
    fn test_average_skips_non_numeric_cell() {
        let t = table(&["", "A", "B"], vec![("a", vec!["1", "NoData"]), ("b", vec!["3", "4"])]);
        let out = average(t, 1, &Conventions::default());
        // the row still counts towards the divisor
        assert_eq!(out.matrix.rows[0].values, vec!["2.0", "2.0"]);
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_average_warns_on_non_numeric_cell() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let t = table(&["", "A"], vec![("a", vec!["oops"]), ("b", vec!["3"])]);
        tracing::subscriber::with_default(subscriber, || average(t, 1, &Conventions::default()));

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("WARN"), "logs were {logs}");
        assert!(logs.contains("Cannot convert 'oops' to float, skipping it in row a"));
    }

    #[test]
    fn test_average_of_nothing() {
        let t = table(&["", "A"], vec![]);
        let out = average(t, 2, &Conventions::default());
        assert_eq!(out.matrix.rows[0].values, vec!["NoData"]);
    }

    #[test]
    fn test_typed_average() {
        let t = table(&["", "X"], vec![("1-t-h-3", vec!["4"]), ("1-t-m-2", vec!["6"]), ("2-t-h-1", vec!["8"])]);
        let out = typed_average(t, 2, &Conventions::default());

        let keys: Vec<&str> = out.matrix.rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["h", "m", "l", "s", "a"]);
        assert_eq!(out.matrix.rows[0].values, vec!["6.00"]);
        assert_eq!(out.matrix.rows[1].values, vec!["6.00"]);
        assert_eq!(out.matrix.rows[2].values, vec!["NoData"]);
        assert_eq!(out.matrix.rows[4].values, vec!["NoData"]);
    }

    #[test]
    fn test_min_histogram() {
        let t = table(
            &["", "A", "B", "C"],
            vec![("r1", vec!["1", "2", "3"]), ("r2", vec!["5", "4", "4"]), ("r3", vec!["0", "9", "9"])],
        );
        let out = min_histogram(t);

        assert_eq!(out.matrix.rows.len(), 1);
        assert_eq!(out.matrix.rows[0].key, "minimum");
        assert_eq!(
            out.matrix.rows[0].values,
            vec!["66.7  % (2)", "33.3  % (1)", "0.0  % (0)"]
        );
    }

    #[test]
    fn test_min_histogram_ignores_sentinels() {
        let t = table(&["", "A", "B"], vec![("r1", vec!["NoData", "2"]), ("r2", vec!["NoData", "NoData"])]);
        let out = min_histogram(t);
        assert_eq!(out.matrix.rows[0].values, vec!["0.0  % (0)", "100.0  % (1)"]);
    }
}
