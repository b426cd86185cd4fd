//! tf-core: shared types, errors, locale handling, and configuration.
//!
//! This crate is the foundational dependency for all other tf-* crates,
//! providing the unified error type, the IETF language tag wrapper used
//! for every language comparison, the container identity model produced by
//! inspection, and the application configuration types.

pub mod config;
pub mod error;
pub mod locale;
pub mod media;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use locale::LocaleInfo;
pub use media::*;
