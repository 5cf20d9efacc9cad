//! Pipelines.
//!
//! [feature::FeaturePipeline] is the batch orchestrator, built from [Extract] and [Save] stages.
//! [ngram_job::NgramJob] wires it to SQLite tables,
//! and implements the light [pipeline::Pipeline] trait.
pub mod feature;
pub mod ngram_job;
#[allow(clippy::module_inception)]
pub mod pipeline;
mod stages;

pub use feature::{BatchSource, FeaturePipeline, PipelineSettings, RunSummary};
pub use ngram_job::NgramJob;
pub use pipeline::Pipeline;
pub use stages::{Extract, FnExtract, FnSave, Save};
