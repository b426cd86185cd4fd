//! Input argument expansion.

use std::path::PathBuf;

use tf_core::{Error, Result};

/// Whether `input` contains glob metacharacters.
pub fn is_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

/// Turn the positional argument into the list of files to process.
///
/// An existing file is always taken literally, even when its name contains
/// glob metacharacters (`Show - 05 [1080p].mkv`). Otherwise a pattern must be
/// valid and match at least one file; matches come back in lexical order.
pub fn expand_inputs(input: &str) -> Result<Vec<PathBuf>> {
    let literal = PathBuf::from(input);
    if literal.is_file() {
        return Ok(vec![literal]);
    }
    if !is_pattern(input) {
        return Err(Error::Usage(format!("input file does not exist: {input}")));
    }

    let entries = glob::glob(input)
        .map_err(|e| Error::Usage(format!("invalid pattern {input:?}: {e}")))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("skipping unreadable match: {e}");
                None
            }
        })
        .filter(|p| p.is_file())
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(Error::Usage(format!("no files match pattern: {input}")));
    }
    Ok(files)
}
