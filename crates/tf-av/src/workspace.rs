//! Scoped extraction directory.
//!
//! A [`Workspace`] owns every intermediate file produced while processing one
//! input. Files are registered before the tool that writes them runs, so a
//! failure halfway through still leaves nothing behind once the workspace is
//! dropped.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

#[derive(Debug)]
enum Root {
    /// Fresh directory, removed entirely on drop.
    Temp(TempDir),
    /// Caller-supplied directory; only registered files are removed.
    Existing(PathBuf),
}

/// Directory for intermediate files with guaranteed cleanup.
///
/// # Example
///
/// ```no_run
/// use tf_av::Workspace;
///
/// let mut workspace = Workspace::temporary().unwrap();
/// let payload = workspace.track(workspace.file("track_0.h264"));
/// // ... write `payload` ...
/// drop(workspace); // `payload` and the directory are gone
/// ```
#[derive(Debug)]
pub struct Workspace {
    root: Root,
    files: Vec<PathBuf>,
}

impl Workspace {
    /// Create a workspace in a fresh temporary directory.
    pub fn temporary() -> tf_core::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("trackforge_")
            .tempdir()
            .map_err(|e| {
                tf_core::Error::extraction("workspace", format!("failed to create temp dir: {e}"))
            })?;
        tracing::debug!("created workspace {}", dir.path().display());
        Ok(Self {
            root: Root::Temp(dir),
            files: Vec::new(),
        })
    }

    /// Use an existing directory. The directory itself is never removed.
    ///
    /// # Errors
    ///
    /// Returns [`tf_core::Error::Extraction`] if `dir` is not a directory.
    pub fn in_dir(dir: &Path) -> tf_core::Result<Self> {
        if !dir.is_dir() {
            return Err(tf_core::Error::extraction(
                "workspace",
                format!("output directory does not exist: {}", dir.display()),
            ));
        }
        Ok(Self {
            root: Root::Existing(dir.to_path_buf()),
            files: Vec::new(),
        })
    }

    /// [`Workspace::in_dir`] when a directory is supplied, else
    /// [`Workspace::temporary`].
    pub fn new(dir: Option<&Path>) -> tf_core::Result<Self> {
        match dir {
            Some(dir) => Self::in_dir(dir),
            None => Self::temporary(),
        }
    }

    /// The workspace directory.
    pub fn dir(&self) -> &Path {
        match &self.root {
            Root::Temp(dir) => dir.path(),
            Root::Existing(dir) => dir,
        }
    }

    /// Path for a named file inside the workspace (not registered).
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir().join(name)
    }

    /// Register a path for deletion on drop and hand it back.
    pub fn track(&mut self, path: impl Into<PathBuf>) -> PathBuf {
        let path = path.into();
        if !self.files.contains(&path) {
            self.files.push(path.clone());
        }
        path
    }

    /// Paths registered so far, in registration order.
    pub fn tracked(&self) -> &[PathBuf] {
        &self.files
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        for path in self.files.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::trace!("removed {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!("failed to remove {}: {e}", path.display()),
            }
        }
        if let Root::Temp(dir) = &self.root {
            tracing::debug!("removing workspace {}", dir.path().display());
        }
    }
}
