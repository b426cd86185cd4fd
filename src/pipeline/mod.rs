//! Per-input repackaging pipeline: scan, extract, select, normalize, name,
//! merge.

pub mod executor;

pub use executor::{Collaborators, PipelineExecutor, ProcessReport};
