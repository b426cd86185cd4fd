//! # tf-naming
//!
//! Derives the canonical output file name for a repackaged container.
//!
//! - [`parse_source_name`] recovers show, season, episode, year and extension
//!   from the input file name.
//! - [`track_tags`] describes a selected track (`1080p`, `HEVC`,
//!   `Japanese (ja)`, ...).
//! - [`OutputName::file_name`] renders everything as
//!   `Show (Year) - s01e02 - Title [Origin][Video][Audio...][Authors].ext`.

mod name;
mod parse;
mod tags;

pub use name::OutputName;
pub use parse::{parse_source_name, ParsedName};
pub use tags::{resolution_tag, track_tags, RESOLUTIONS};
