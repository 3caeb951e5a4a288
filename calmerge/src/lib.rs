//! # Calmerge - benchmark result merging and analysis
//!
//! Calmerge reads per-run benchmark result tables, merges them into one
//! matrix keyed by workload identity and runs a fixed-order pipeline of
//! analytical transforms before printing an aligned text table.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Result files│────▶│   Parser    │────▶│   Merger    │────▶│  Pipeline   │
//! │ (regex sep) │     │ (auto-enc)  │     │ (wl. keys)  │     │  (stages)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └──────┬──────┘
//!                                                                    │
//!                                                             ┌──────▼──────┐
//!                                                             │  Formatter  │
//!                                                             │ (text/json) │
//!                                                             └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use calmerge::{run, Formatter, RunOptions};
//!
//! let output = run(&["run1.txt", "run2.txt"], &RunOptions::default())?;
//! print!("{}", Formatter::new(false).render(&output.table)?);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Tables, matrices and sentinel conventions
//! - [`parser`] - Result file parsing with encoding detection
//! - [`merge`] - Workload keys and multi-file merging
//! - [`transform`] - Stages and the pipeline
//! - [`format`] - Aligned text, JSON and the column report
//! - [`config`] - Run options and conventions loading
//! - [`logs`] - Log output setup

// Core modules
pub mod error;
pub mod models;

// Input
pub mod parser;
pub mod merge;

// Transformation
pub mod transform;

// Output
pub mod format;

// Configuration
pub mod config;
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError,
    FormatError,
    MergeError,
    ParseError,
    PipelineError,
    PipelineResult,
    TransformError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    Align,
    ColumnProvenance,
    Conventions,
    FileTable,
    Matrix,
    Row,
    Table,
};

// =============================================================================
// Re-exports - Parsing and merging
// =============================================================================

pub use parser::{parse_file, parse_files, parse_str, ParseOptions};
pub use merge::{merge, MergeMode, MergeOptions, MergeOutcome, WorkloadKeyExtractor};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::{
    merge_inputs,
    run,
    NormalizeTarget,
    Pipeline,
    PipelineOptions,
    RunOutput,
    Stage,
    StageContext,
};

// =============================================================================
// Re-exports - Output and configuration
// =============================================================================

pub use format::{column_report, render_json, Formatter};
pub use config::{load_conventions, parse_print_spec, split_list, RunOptions};
