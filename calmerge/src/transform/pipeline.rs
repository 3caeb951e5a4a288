//! High-level pipeline API: parse, merge and transform result files.
//!
//! Stages run in a fixed order regardless of how options are given:
//!
//! ```text
//! select → filter → split → rename cols → rename rows → average
//!   → typed average → sort cols → min-histogram → normalize
//!   → sort after column → invert
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use calmerge::{run, RunOptions};
//!
//! let output = run(&["a.txt", "b.txt"], &RunOptions::default())?;
//! println!("{} rows", output.table.matrix.rows.len());
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::normalize::NormalizeTarget;
use super::operations::{Stage, StageContext};
use crate::config::RunOptions;
use crate::error::{PipelineError, PipelineResult, TransformResult};
use crate::merge::{merge, MergeOutcome};
use crate::models::{ColumnProvenance, Table};
use crate::parser::{parse_files, ParseOptions};

/// Which transform stages to run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// 1-based value columns to keep, in output order
    pub columns: Option<Vec<usize>>,

    /// Keep only rows whose key matches this regex
    pub filter_pattern: Option<String>,

    pub split_workload_types: bool,

    /// New value column headers
    pub column_names: Option<Vec<String>>,

    /// New row keys
    pub row_names: Option<Vec<String>>,

    pub average: bool,
    pub typed_average: bool,
    pub sort_columns: bool,
    pub min_histogram: bool,

    pub normalize_to: Option<NormalizeTarget>,

    /// 1-based value column to sort rows by
    pub sort_after_column: Option<usize>,

    pub invert: bool,
}

/// An ordered list of stages plus the settings they share
#[derive(Debug, Clone)]
pub struct Pipeline {
    stages: Vec<Stage>,
    ctx: StageContext,
}

impl Pipeline {
    /// Build the stage list for `options` in the fixed stage order
    pub fn from_options(options: &PipelineOptions, ctx: StageContext) -> Self {
        let mut stages = Vec::new();

        if let Some(columns) = &options.columns {
            stages.push(Stage::SelectColumns {
                columns: columns.clone(),
            });
        }
        if let Some(pattern) = &options.filter_pattern {
            stages.push(Stage::FilterRows {
                pattern: pattern.clone(),
            });
        }
        if options.split_workload_types {
            stages.push(Stage::SplitWorkloadTypes);
        }
        if let Some(names) = &options.column_names {
            stages.push(Stage::RenameColumns { names: names.clone() });
        }
        if let Some(names) = &options.row_names {
            stages.push(Stage::RenameRows { names: names.clone() });
        }
        if options.average {
            stages.push(Stage::Average);
        }
        if options.typed_average {
            stages.push(Stage::TypedAverage);
        }
        if options.sort_columns {
            stages.push(Stage::SortColumns);
        }
        if options.min_histogram {
            stages.push(Stage::MinHistogram);
        }
        if let Some(target) = options.normalize_to {
            stages.push(Stage::Normalize { target });
        }
        if let Some(column) = options.sort_after_column {
            stages.push(Stage::SortAfterColumn { column });
        }
        if options.invert {
            stages.push(Stage::Invert);
        }

        Self { stages, ctx }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Thread the table through every stage in order
    pub fn run(&self, table: Table) -> TransformResult<Table> {
        self.stages.iter().try_fold(table, |table, stage| {
            debug!(
                "Stage {}: {} rows x {} columns in",
                stage.name(),
                table.matrix.rows.len(),
                table.matrix.header.len()
            );
            stage.apply(table, &self.ctx)
        })
    }
}

/// Result of a complete run
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Final table, ready for formatting
    pub table: Table,

    /// Originating file of each merged column
    pub provenance: ColumnProvenance,

    /// Rows excluded by the identity merge
    pub dropped_rows: usize,
}

/// Parse and merge the input files without transforming them.
pub fn merge_inputs<P: AsRef<Path>>(paths: &[P], options: &RunOptions) -> PipelineResult<MergeOutcome> {
    if paths.is_empty() {
        return Err(PipelineError::NoInput);
    }

    let mut parse_options = ParseOptions::new(&options.separator)?;
    parse_options.keep_error_rows = options.keep_error_rows;
    parse_options.quiet = options.quiet;

    let files = parse_files(paths, &options.column_prefixes, &parse_options, &options.conventions)?;
    Ok(merge(&files, &options.merge, &options.conventions)?)
}

/// Parse, merge and transform the input files.
pub fn run<P: AsRef<Path>>(paths: &[P], options: &RunOptions) -> PipelineResult<RunOutput> {
    let MergeOutcome {
        matrix,
        provenance,
        dropped_rows,
    } = merge_inputs(paths, options)?;

    debug!(
        "Merged {} files into {} rows x {} columns",
        paths.len(),
        matrix.rows.len(),
        matrix.value_width()
    );

    let ctx = StageContext {
        conventions: options.conventions.clone(),
        decimals: options.decimals,
        preserve_row_order: options.merge.preserve_row_order,
    };
    let pipeline = Pipeline::from_options(&options.pipeline, ctx);
    let table = pipeline.run(Table::new(matrix))?;

    Ok(RunOutput {
        table,
        provenance,
        dropped_rows,
    })
}
