//! trackforge - Matroska repackaging tool
//!
//! This library crate exposes the pipeline stages for the binary and for
//! integration testing.

pub mod config;
pub mod inputs;
pub mod normalize;
pub mod pipeline;
pub mod selection;

pub use normalize::normalize_codecs;
pub use pipeline::{Collaborators, PipelineExecutor, ProcessReport};
pub use selection::{select_tracks, Selection, SelectionPolicy};
