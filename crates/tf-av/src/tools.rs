//! External tool detection and management.
//!
//! The [`ToolRegistry`] discovers and caches the locations of the external CLI
//! tools (mkvmerge, mkvextract, ffmpeg). The thin [`Mkvmerge`], [`Mkvextract`]
//! and [`Ffmpeg`] handles are built from it and implement the collaborator
//! traits in the sibling modules.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::command::ToolCommand;

/// Known tool names that the registry manages.
const KNOWN_TOOLS: &[&str] = &["mkvmerge", "mkvextract", "ffmpeg"];

/// A resolved external tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Tool name (e.g. "mkvmerge").
    pub name: String,
    /// Resolved path to the executable.
    pub path: PathBuf,
}

/// Availability information for a tool, returned by [`ToolRegistry::check_all`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub available: bool,
    /// First line of the tool's version output, if available.
    pub version: Option<String>,
    pub path: Option<PathBuf>,
}

/// Registry holding discovered tool locations.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolConfig>,
}

impl ToolRegistry {
    /// Discover tools by searching `PATH` (or using overrides from config).
    ///
    /// A configured path is used when it exists; otherwise [`which::which`]
    /// looks the tool up in `PATH`. Tools that are not found are omitted.
    pub fn discover(tools_config: &tf_core::config::ToolsConfig) -> Self {
        let mut tools = HashMap::new();

        for &name in KNOWN_TOOLS {
            let custom_path = match name {
                "mkvmerge" => tools_config.mkvmerge_path.as_deref(),
                "mkvextract" => tools_config.mkvextract_path.as_deref(),
                "ffmpeg" => tools_config.ffmpeg_path.as_deref(),
                _ => None,
            };

            let resolved = match custom_path {
                Some(p) if p.exists() => Some(p.to_path_buf()),
                Some(p) => {
                    tracing::warn!(
                        "configured {name} path {} does not exist, searching PATH",
                        p.display()
                    );
                    which::which(name).ok()
                }
                None => which::which(name).ok(),
            };

            match resolved {
                Some(path) => {
                    tracing::debug!("found {name} at {}", path.display());
                    tools.insert(
                        name.to_string(),
                        ToolConfig {
                            name: name.to_string(),
                            path,
                        },
                    );
                }
                None => tracing::debug!("{name} not found"),
            }
        }

        Self { tools }
    }

    /// Register a tool at an explicit path, replacing any discovered entry.
    pub fn with_tool(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.tools.insert(
            name.to_string(),
            ToolConfig {
                name: name.to_string(),
                path: path.into(),
            },
        );
        self
    }

    /// Return the [`ToolConfig`] for the given tool, or an
    /// [`tf_core::Error::Tool`] if it was not found during discovery.
    pub fn require(&self, name: &str) -> tf_core::Result<&ToolConfig> {
        self.tools.get(name).ok_or_else(|| {
            tf_core::Error::tool(name, format!("{name} not found; is it installed and in PATH?"))
        })
    }

    /// Fail with the first missing tool, if any.
    pub fn require_all(&self) -> tf_core::Result<()> {
        for &name in KNOWN_TOOLS {
            self.require(name)?;
        }
        Ok(())
    }

    /// Check all known tools and return availability information.
    pub fn check_all(&self) -> Vec<ToolInfo> {
        KNOWN_TOOLS
            .iter()
            .map(|&name| match self.tools.get(name) {
                Some(cfg) => ToolInfo {
                    name: name.to_string(),
                    available: true,
                    version: detect_version(name, &cfg.path),
                    path: Some(cfg.path.clone()),
                },
                None => ToolInfo {
                    name: name.to_string(),
                    available: false,
                    version: None,
                    path: None,
                },
            })
            .collect()
    }
}

/// Run `<tool> --version` (`-version` for ffmpeg) and return the first line.
fn detect_version(name: &str, path: &Path) -> Option<String> {
    let version_arg = match name {
        "ffmpeg" => "-version",
        _ => "--version",
    };

    let output = ToolCommand::new(path.to_path_buf())
        .arg(version_arg)
        .execute()
        .ok()?;

    output.stdout.lines().next().map(|s| s.to_string())
}

macro_rules! tool_handle {
    ($(#[$meta:meta])* $ty:ident, $name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $ty {
            path: PathBuf,
        }

        impl $ty {
            pub fn new(path: impl Into<PathBuf>) -> Self {
                Self { path: path.into() }
            }

            /// Resolve the executable from the registry.
            pub fn from_registry(registry: &ToolRegistry) -> tf_core::Result<Self> {
                Ok(Self::new(registry.require($name)?.path.clone()))
            }

            pub(crate) fn command(&self) -> ToolCommand {
                ToolCommand::new(self.path.clone())
            }
        }
    };
}

tool_handle!(
    /// `mkvmerge`, used for identification and multiplexing.
    Mkvmerge,
    "mkvmerge"
);
tool_handle!(
    /// `mkvextract`, used for per-item extraction.
    Mkvextract,
    "mkvextract"
);
tool_handle!(
    /// `ffmpeg`, used for audio transcoding.
    Ffmpeg,
    "ffmpeg"
);
