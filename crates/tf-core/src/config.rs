//! Application configuration types.
//!
//! Every section carries serde defaults, so an empty file (or no file at all)
//! yields a usable [`Config`]. Parsing the file format is left to the binary.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Error, LocaleInfo, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub selection: SelectionConfig,
    pub naming: NamingConfig,
    pub normalize: NormalizeConfig,
    pub tools: ToolsConfig,
    /// Existing directory to extract into instead of a fresh temp directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_dir: Option<PathBuf>,
}

impl Config {
    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.selection.audio_languages.is_empty() {
            return Err(Error::Config(
                "selection.audio_languages must list at least one language".into(),
            ));
        }
        if self.normalize.encoder.trim().is_empty() {
            return Err(Error::Config("normalize.encoder must not be empty".into()));
        }
        if let Some(dir) = &self.work_dir {
            if !dir.is_dir() {
                tracing::warn!("work_dir does not exist: {}", dir.display());
            }
        }
        Ok(())
    }
}

/// Language policy for track selection and flagging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Native production language; matching video/audio get the original flag.
    pub original_language: LocaleInfo,
    /// Audio languages that survive selection.
    pub audio_languages: Vec<LocaleInfo>,
    /// Preferred audience language driving default flags.
    pub main_language: LocaleInfo,
    /// Sync offsets applied to retained audio tracks by language.
    pub delays: Vec<DelayRule>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        let tag = |s: &str| LocaleInfo::parse(s).unwrap_or_default();
        Self {
            original_language: tag("ja"),
            audio_languages: ["ja", "es", "es-ES", "gl", "gl-ES"]
                .into_iter()
                .map(tag)
                .collect(),
            main_language: tag("gl"),
            delays: Vec::new(),
        }
    }
}

/// A fixed sync offset for every retained audio track in a language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayRule {
    pub language: LocaleInfo,
    pub ms: i64,
}

/// Static parts of the output file name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Release origin tag (e.g. `WEBDL`, `BDRip`).
    pub origin: Option<String>,
    /// Author/group credits appended as the last bracket group.
    pub authors: Vec<String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            origin: Some("WEBDL".to_string()),
            authors: Vec::new(),
        }
    }
}

/// Audio codec normalization settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Codec id markers that trigger a transcode.
    pub undesired: Vec<String>,
    /// ffmpeg encoder name for the replacement stream.
    pub encoder: String,
    /// Matroska codec id written back on success.
    pub codec_id: String,
    /// Human-readable codec name written back on success.
    pub codec: String,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            undesired: vec!["FLAC".to_string()],
            encoder: "eac3".to_string(),
            codec_id: "A_EAC3".to_string(),
            codec: "E-AC-3".to_string(),
        }
    }
}

/// Overrides for external tool locations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub mkvmerge_path: Option<PathBuf>,
    pub mkvextract_path: Option<PathBuf>,
    pub ffmpeg_path: Option<PathBuf>,
}
