//! Pipeline stages.
//!
//! Each [`Stage`] takes ownership of a [`Table`] and returns a new one.
//! Stages are serializable so a pipeline can be logged or stored as JSON.

use serde::{Deserialize, Serialize};

use super::normalize::NormalizeTarget;
use super::{aggregate, normalize, order, reshape, select};
use crate::error::TransformResult;
use crate::models::{Conventions, Table};

/// All available transform stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stage {
    /// Keep and reorder 1-based value columns
    SelectColumns { columns: Vec<usize> },

    /// Keep rows whose key matches a regex
    FilterRows { pattern: String },

    /// One block of columns per workload type
    SplitWorkloadTypes,

    /// Replace value column headers
    RenameColumns { names: Vec<String> },

    /// Replace row keys
    RenameRows { names: Vec<String> },

    /// Single row of column means
    Average,

    /// One row of column means per workload type
    TypedAverage,

    /// Sort every column independently
    SortColumns,

    /// Share of rows in which each column holds the minimum
    MinHistogram,

    /// Divide values by a reference
    Normalize { target: NormalizeTarget },

    /// Order rows by one column, largest first
    SortAfterColumn { column: usize },

    /// Transpose
    Invert,
}

/// Settings shared by every stage of one run.
#[derive(Debug, Clone, Default)]
pub struct StageContext {
    pub conventions: Conventions,
    pub decimals: usize,
    pub preserve_row_order: bool,
}

impl Stage {
    /// Apply this stage to a table
    pub fn apply(&self, table: Table, ctx: &StageContext) -> TransformResult<Table> {
        match self {
            Stage::SelectColumns { columns } => select::select_columns(table, columns),
            Stage::FilterRows { pattern } => select::filter_rows(table, pattern, ctx.preserve_row_order),
            Stage::SplitWorkloadTypes => reshape::split_workload_types(table, &ctx.conventions),
            Stage::RenameColumns { names } => select::rename_columns(table, names),
            Stage::RenameRows { names } => select::rename_rows(table, names),
            Stage::Average => Ok(aggregate::average(table, ctx.decimals, &ctx.conventions)),
            Stage::TypedAverage => Ok(aggregate::typed_average(table, ctx.decimals, &ctx.conventions)),
            Stage::SortColumns => Ok(order::sort_columns(table, ctx.decimals)),
            Stage::MinHistogram => Ok(aggregate::min_histogram(table)),
            Stage::Normalize { target } => normalize::normalize(table, *target, ctx.decimals, &ctx.conventions),
            Stage::SortAfterColumn { column } => order::sort_after_column(table, *column),
            Stage::Invert => Ok(reshape::invert(table)),
        }
    }

    /// Short name used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            Stage::SelectColumns { .. } => "select_columns",
            Stage::FilterRows { .. } => "filter_rows",
            Stage::SplitWorkloadTypes => "split_workload_types",
            Stage::RenameColumns { .. } => "rename_columns",
            Stage::RenameRows { .. } => "rename_rows",
            Stage::Average => "average",
            Stage::TypedAverage => "typed_average",
            Stage::SortColumns => "sort_columns",
            Stage::MinHistogram => "min_histogram",
            Stage::Normalize { .. } => "normalize",
            Stage::SortAfterColumn { .. } => "sort_after_column",
            Stage::Invert => "invert",
        }
    }
}
