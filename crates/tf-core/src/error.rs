//! Unified error type for trackforge.
//!
//! All crates funnel their failures into [`Error`]. The variants follow the
//! lifecycle of a single input: usage problems stop the whole run, while
//! scan, extraction and merge failures abort only the input being processed.
//! Transcode failures are soft and are normally logged by the caller instead
//! of being propagated.

use std::path::PathBuf;

/// Unified error type covering all failure modes in trackforge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The command line or input pattern was unusable.
    #[error("Usage error: {0}")]
    Usage(String),

    /// A language tag could not be parsed.
    #[error("Invalid language tag {tag:?}: {message}")]
    InvalidTag {
        /// The offending input text.
        tag: String,
        /// Parser message.
        message: String,
    },

    /// The container could not be inspected.
    #[error("Scan error [{}]: {message}", path.display())]
    Scan {
        /// The container that was being inspected.
        path: PathBuf,
        /// Human-readable error description.
        message: String,
    },

    /// A track, timestamp map, chapter list or attachment could not be extracted.
    #[error("Extraction error [{item}]: {message}")]
    Extraction {
        /// The item being extracted (e.g. "track 2", "chapters").
        item: String,
        /// Human-readable error description.
        message: String,
    },

    /// A transcode request was rejected or failed.
    #[error("Transcode error: {0}")]
    Transcode(String),

    /// The multiplexer failed to produce the output container.
    #[error("Merge error: {0}")]
    Merge(String),

    /// An external tool could not be located or spawned.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// Configuration failed validation.
    #[error("Config error: {0}")]
    Config(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Process exit code to use when this error ends the run.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Usage(_) | Error::Config(_) => 2,
            _ => 1,
        }
    }

    /// Whether this error stops a whole batch instead of a single input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Usage(_) | Error::Config(_))
    }

    /// Convenience constructor for [`Error::InvalidTag`].
    pub fn invalid_tag(tag: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidTag {
            tag: tag.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Scan`].
    pub fn scan(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Scan {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Extraction`].
    pub fn extraction(item: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Extraction {
            item: item.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
