//! Container inspection via `mkvmerge -J`.

use std::path::Path;

use tf_core::{Error, Identity, Result};

use crate::command::ToolOutput;
use crate::tools::Mkvmerge;

/// Produces the identification document for a container.
pub trait Inspector {
    /// Run the identification and return the raw result.
    ///
    /// `Err` is reserved for failing to run the tool at all.
    fn identify(&self, source: &Path) -> Result<ToolOutput>;
}

impl Inspector for Mkvmerge {
    fn identify(&self, source: &Path) -> Result<ToolOutput> {
        let mut cmd = self.command();
        cmd.arg("-J").arg(source.to_string_lossy());
        cmd.run()
    }
}

/// Inspect `source` and parse the result into an [`Identity`].
///
/// # Errors
///
/// Returns [`Error::Scan`] if the tool cannot run, exits non-zero, or prints
/// a document that does not parse.
pub fn scan(inspector: &dyn Inspector, source: &Path) -> Result<Identity> {
    let output = inspector
        .identify(source)
        .map_err(|e| Error::scan(source, e.to_string()))?;

    if !output.success() {
        return Err(Error::scan(
            source,
            format!(
                "identification exited with {}: {}",
                output.code_display(),
                output.diagnostics()
            ),
        ));
    }

    let identity = Identity::from_json(&output.stdout)
        .map_err(|e| Error::scan(source, format!("malformed identification output: {e}")))?;

    tracing::info!(
        tracks = identity.tracks.len(),
        attachments = identity.attachments.len(),
        chapters = identity.has_chapters(),
        "scanned container"
    );
    Ok(identity)
}
