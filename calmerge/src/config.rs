//! Run configuration.
//!
//! [`RunOptions`] carries everything the library needs for one run. The
//! helpers here turn the comma-separated command line values into typed
//! options and load [`Conventions`] from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult, TransformError, TransformResult};
use crate::merge::MergeOptions;
use crate::models::Conventions;
use crate::parser::DEFAULT_SEPARATOR;
use crate::transform::PipelineOptions;

/// Default number of decimals in rendered values.
pub const DEFAULT_DECIMALS: usize = 2;

/// Options for one parse, merge and transform run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    /// Column separator regex
    pub separator: String,

    /// Decimals used when rendering computed values
    pub decimals: usize,

    /// Header prefix per input file, by position
    pub column_prefixes: Vec<String>,

    /// Keep rows holding an error marker
    pub keep_error_rows: bool,

    /// Suppress warnings
    pub quiet: bool,

    pub merge: MergeOptions,

    pub pipeline: PipelineOptions,

    pub conventions: Conventions,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            decimals: DEFAULT_DECIMALS,
            column_prefixes: Vec::new(),
            keep_error_rows: false,
            quiet: false,
            merge: MergeOptions::default(),
            pipeline: PipelineOptions::default(),
            conventions: Conventions::default(),
        }
    }
}

impl RunOptions {
    /// Values are colored only when they are ratios.
    pub fn colored_output(&self, no_color: bool) -> bool {
        self.pipeline.normalize_to.is_some() && !no_color
    }
}

/// Split a comma-separated list, trimming each item.
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',').map(|s| s.trim().to_string()).collect()
}

/// Parse a comma-separated list of 1-based column IDs, e.g. `2,3,1`.
pub fn parse_print_spec(spec: &str) -> TransformResult<Vec<usize>> {
    spec.split(',')
        .map(|v| {
            v.trim()
                .parse::<usize>()
                .map_err(|_| TransformError::InvalidPrintSpec(spec.to_string()))
        })
        .collect()
}

/// Load conventions from a JSON file. Missing fields keep their defaults.
pub fn load_conventions<P: AsRef<Path>>(path: P) -> ConfigResult<Conventions> {
    let content = std::fs::read_to_string(path)?;
    let conventions = Conventions::from_json(&content)?;
    if conventions.workload_types.is_empty() {
        return Err(ConfigError::NoWorkloadTypes);
    }
    Ok(conventions)
}
