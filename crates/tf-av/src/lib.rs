//! # tf-av
//!
//! External tool plumbing for the trackforge pipeline.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find and cache paths to
//!   mkvmerge, mkvextract and ffmpeg.
//! - **Command execution** ([`ToolCommand`]) -- blocking builder that
//!   captures output and exit code as a [`ToolOutput`].
//! - **Workspace management** ([`Workspace`]) -- scoped extraction directory
//!   that deletes every registered intermediate file when dropped.
//! - **Collaborator traits** ([`Inspector`], [`Extractor`], [`Transcoder`],
//!   [`Multiplexer`]) with implementations backed by the real tools.
//! - **Orchestration** -- [`scan`], [`extract_all`], [`transcode`] and
//!   [`merge`] map raw tool results into [`tf_core::Error`].

pub mod command;
pub mod extract;
pub mod inspect;
pub mod merge;
pub mod tools;
pub mod transcode;
pub mod workspace;

// ---- Re-exports for convenience ----

pub use command::{ToolCommand, ToolOutput};
pub use extract::{extract_all, sort_tracks, ExtractItem, Extractor};
pub use inspect::{scan, Inspector};
pub use merge::{merge, merge_args, MergeOutcome, Multiplexer};
pub use tools::{Ffmpeg, Mkvextract, Mkvmerge, ToolConfig, ToolInfo, ToolRegistry};
pub use transcode::{transcode, ConvertOptions, InputFile, StreamEncoder, Transcoder};
pub use workspace::Workspace;
