//! Combine parsed result files into one keyed matrix.
//!
//! ```text
//! run1.txt          run2.txt               merged
//! ┌────────────┐    ┌────────────┐         ┌─────────────────────┐
//! │    A  B    │    │    C       │         │        A  B  C      │
//! │ k1 1  2    │ +  │ k1 5       │   →     │ k1     1  2  5      │
//! │ k2 3  4    │    │ k3 6       │         └─────────────────────┘
//! └────────────┘    └────────────┘          k2, k3 incomplete: dropped
//! ```
//!
//! In pure mode rows are matched by position instead and gaps are padded
//! with the no-data sentinel, so nothing is dropped.

pub mod workload;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MergeError, MergeResult};
use crate::models::{compare_keys, ColumnProvenance, Conventions, FileTable, Matrix, Row};

pub use workload::{KeyMatcher, Normalize, WorkloadKeyExtractor};

/// How rows from different files are matched up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeMode {
    /// Match rows by the workload identity derived from their key.
    #[default]
    Identity,
    /// Match rows by their 1-based position within each file.
    Pure,
}

/// Merge settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    pub mode: MergeMode,
    /// Keep first-seen row order instead of sorting by key.
    pub preserve_row_order: bool,
}

/// The merged matrix plus bookkeeping.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub matrix: Matrix,
    /// Originating file of each value column.
    pub provenance: ColumnProvenance,
    /// Rows excluded because they did not appear in every file.
    pub dropped_rows: usize,
}

/// Accumulates value lists per row identity, in first-seen order.
struct Accumulator {
    values: HashMap<String, Vec<String>>,
    order: Vec<String>,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            values: HashMap::new(),
            order: Vec::new(),
        }
    }

    fn entry(&mut self, key: String, prefix: &[String]) -> &mut Vec<String> {
        if !self.values.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.values.entry(key).or_insert_with(|| prefix.to_vec())
    }
}

/// Merge parsed files, in input order, into one matrix.
pub fn merge(
    files: &[FileTable],
    options: &MergeOptions,
    conventions: &Conventions,
) -> MergeResult<MergeOutcome> {
    let extractor = WorkloadKeyExtractor::new(conventions);

    let mut header = vec![String::new()];
    let mut provenance = ColumnProvenance::new();
    let mut acc = Accumulator::new();
    let mut pad_prefix: Vec<String> = Vec::new();
    let mut expected = 0;

    for file in files {
        expected += file.value_count();

        for h in file.value_headers() {
            header.push(h.clone());
            provenance.push(file.source_name.clone());
        }

        for (position, row) in file.rows.iter().enumerate() {
            let key = match options.mode {
                MergeMode::Pure => (position + 1).to_string(),
                MergeMode::Identity => extractor.extract(&row[0]),
            };
            acc.entry(key, &pad_prefix).extend(row[1..].iter().cloned());
        }

        if options.mode == MergeMode::Pure {
            let running = header.len() - 1;
            pad_prefix.resize(running, conventions.no_data.clone());

            for (key, values) in acc.values.iter_mut() {
                if values.len() < running {
                    values.resize(running, conventions.no_data.clone());
                }
                if values.len() != running {
                    return Err(MergeError::NotRectangular {
                        key: key.clone(),
                        source_name: file.source_name.clone(),
                        len: values.len(),
                        expected: running,
                    });
                }
            }
        }
    }

    let mut keys = acc.order.clone();
    if !options.preserve_row_order {
        keys.sort_by(|a, b| compare_keys(a, b));
    }

    let mut rows = Vec::with_capacity(keys.len());
    let mut dropped_rows = 0;
    for key in keys {
        let values = acc.values.remove(&key).unwrap_or_default();
        if values.len() == expected {
            rows.push(Row::new(key, values));
        } else {
            dropped_rows += 1;
        }
    }

    debug!(
        files = files.len(),
        columns = expected,
        rows = rows.len(),
        dropped_rows,
        "merged result files"
    );

    Ok(MergeOutcome {
        matrix: Matrix::new(header, rows),
        provenance,
        dropped_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_str, ParseOptions};
    use proptest::prelude::*;

    fn table(content: &str, name: &str) -> FileTable {
        parse_str(content, name, &ParseOptions::default(), &Conventions::default()).unwrap()
    }

    fn identity() -> MergeOptions {
        MergeOptions::default()
    }

    fn pure() -> MergeOptions {
        MergeOptions {
            mode: MergeMode::Pure,
            preserve_row_order: false,
        }
    }

    #[test]
    fn test_identity_merge_disjoint_headers() {
        let a = table("A B\nk1 1 2\nk2 3 4", "a.txt");
        let b = table("C\nk1 5\nk3 6", "b.txt");

        let out = merge(&[a, b], &identity(), &Conventions::default()).unwrap();

        assert_eq!(out.matrix.header, vec!["", "A", "B", "C"]);
        assert_eq!(out.matrix.rows, vec![Row::new("k1", vec!["1".into(), "2".into(), "5".into()])]);
        assert_eq!(out.dropped_rows, 2);
        assert_eq!(out.provenance, vec!["a.txt", "a.txt", "b.txt"]);
    }

    #[test]
    fn test_identity_merge_coalesces_workloads() {
        let a = table("A\nold-4-t-h-3-v1 1\nold-4-t-m-12-v1 2", "a");
        let b = table("B\n4-t-h-03 10\n4-t-m-12 20", "b");

        let out = merge(&[a, b], &identity(), &Conventions::default()).unwrap();

        let keys: Vec<&str> = out.matrix.rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["4-t-h-03", "4-t-m-12"]);
        assert_eq!(out.matrix.rows[0].values, vec!["1", "10"]);
    }

    #[test]
    fn test_labelled_key_column_stripped() {
        let a = table("workload A\nk 1", "a");
        let out = merge(&[a], &identity(), &Conventions::default()).unwrap();
        assert_eq!(out.matrix.header, vec!["", "A"]);
    }

    #[test]
    fn test_row_order() {
        let a = table("A\nzeta 1\nalpha 2\n10 3\n9 4", "a");

        let sorted = merge(&[a.clone()], &identity(), &Conventions::default()).unwrap();
        let keys: Vec<&str> = sorted.matrix.rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["9", "10", "alpha", "zeta"]);

        let options = MergeOptions {
            preserve_row_order: true,
            ..identity()
        };
        let kept = merge(&[a], &options, &Conventions::default()).unwrap();
        let keys: Vec<&str> = kept.matrix.rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "10", "9"]);
    }

    #[test]
    fn test_duplicate_key_dropped() {
        let a = table("A\nfair01-x 1\nfair01-y 2\nfair02 3", "a");
        let out = merge(&[a], &identity(), &Conventions::default()).unwrap();
        assert_eq!(out.matrix.rows.len(), 1);
        assert_eq!(out.matrix.rows[0].key, "fair02");
        assert_eq!(out.dropped_rows, 1);
    }

    #[test]
    fn test_pure_merge_pads() {
        let a = table("A\nx 1\ny 2", "a");
        let b = table("B\np 3\nq 4\nr 5", "b");
        let c = table("C\nm 6", "c");

        let out = merge(&[a, b, c], &pure(), &Conventions::default()).unwrap();

        assert_eq!(out.matrix.rows.len(), 3);
        assert_eq!(out.matrix.rows[0].values, vec!["1", "3", "6"]);
        assert_eq!(out.matrix.rows[1].values, vec!["2", "4", "NoData"]);
        assert_eq!(out.matrix.rows[2].values, vec!["NoData", "5", "NoData"]);
        assert_eq!(out.dropped_rows, 0);
    }

    #[test]
    fn test_pure_merge_ignores_content() {
        let a = table("A\nfair01 1", "a");
        let b = table("B\nfair02 2", "b");
        let out = merge(&[a, b], &pure(), &Conventions::default()).unwrap();
        assert_eq!(out.matrix.rows, vec![Row::new("1", vec!["1".into(), "2".into()])]);
    }

    fn file_strategy() -> impl Strategy<Value = (usize, usize)> {
        (1usize..4, 0usize..6)
    }

    proptest! {
        #[test]
        fn prop_pure_merge_never_drops(shapes in proptest::collection::vec(file_strategy(), 1..5)) {
            let mut files = Vec::new();
            for (i, (cols, rows)) in shapes.iter().enumerate() {
                let header: Vec<String> = (0..*cols).map(|c| format!("f{i}c{c}")).collect();
                let mut content = header.join(" ");
                for r in 0..*rows {
                    content.push('\n');
                    content.push_str(&format!("row{r}"));
                    for c in 0..*cols {
                        content.push_str(&format!(" {}", r * 10 + c));
                    }
                }
                files.push(table(&content, &format!("f{i}")));
            }

            let total: usize = shapes.iter().map(|(c, _)| c).sum();
            let longest = shapes.iter().map(|(_, r)| *r).max().unwrap_or(0);

            let out = merge(&files, &pure(), &Conventions::default()).unwrap();

            prop_assert_eq!(out.matrix.rows.len(), longest);
            prop_assert_eq!(out.dropped_rows, 0);
            for row in &out.matrix.rows {
                prop_assert_eq!(row.values.len(), total);
            }
        }
    }
}
