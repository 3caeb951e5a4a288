//! Transformation module.
//!
//! Stages that reshape and analyse the merged table:
//! - Select: column subsets, row filter, renaming
//! - Aggregate: averages and the minimum histogram
//! - Order: column and row sorting
//! - Normalize: ratios against a reference
//! - Reshape: workload-type split and inversion
//! - Operations: the serializable [`Stage`] enum
//! - Pipeline: fixed-order stage assembly and end-to-end runs

pub mod aggregate;
pub mod normalize;
pub mod operations;
pub mod order;
pub mod pipeline;
pub mod reshape;
pub mod select;

pub use normalize::NormalizeTarget;
pub use operations::{Stage, StageContext};
pub use pipeline::{merge_inputs, run, Pipeline, PipelineOptions, RunOutput};
