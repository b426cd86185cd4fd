//! Container identity model.
//!
//! These types mirror the JSON document printed by `mkvmerge -J` and carry
//! the per-track state that flows through extraction, selection and merge.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::LocaleInfo;

/// Elementary stream type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackType {
    Video,
    Audio,
    Subtitles,
    #[serde(other)]
    Other,
}

impl TrackType {
    /// Rank used by the track ordering rule.
    pub fn order(self) -> u8 {
        match self {
            TrackType::Video => 0,
            TrackType::Audio => 1,
            TrackType::Subtitles => 2,
            TrackType::Other => 3,
        }
    }
}

impl std::fmt::Display for TrackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackType::Video => write!(f, "video"),
            TrackType::Audio => write!(f, "audio"),
            TrackType::Subtitles => write!(f, "subtitles"),
            TrackType::Other => write!(f, "other"),
        }
    }
}

/// Codec id substring to payload file extension. First match wins.
const CODEC_EXTENSIONS: &[(&str, &str)] = &[
    ("V_MPEG4/ISO/AVC", "h264"),
    ("V_MPEGH/ISO/HEVC", "hevc"),
    ("A_AAC", "aac"),
    ("A_AC3", "ac3"),
    ("A_EAC3", "eac3"),
    ("A_DTS", "dts"),
    ("A_FLAC", "flac"),
    ("S_TEXT/UTF8", "srt"),
];

/// Track names that carry a language the structured tag gets wrong.
const LANGUAGE_MISLABELS: &[(&str, &str)] = &[
    ("European Spanish", "es-ES"),
    ("Brazilian Portuguese", "pt-BR"),
    ("Arabic (Saudi Arabia)", "ar-SA"),
    ("Chinese (Taiwan)", "zh-TW"),
    ("Chinese (Simplified)", "zh-CN"),
    ("Chinese (Mainland China)", "zh-CN"),
];

/// Raw bytes serialized as a lowercase hex string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HexBytes(pub Vec<u8>);

impl<'de> Deserialize<'de> for HexBytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        hex::decode(&text)
            .map(HexBytes)
            .map_err(serde::de::Error::custom)
    }
}

impl Serialize for HexBytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&hex::encode(&self.0))
    }
}

/// Per-track properties as reported by the inspector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackProperties {
    pub uid: Option<u64>,
    pub codec_id: String,
    pub codec_private_data: HexBytes,
    pub codec_private_length: u64,
    pub default_duration: Option<u64>,
    pub default_track: bool,
    pub enabled_track: bool,
    pub forced_track: bool,
    pub flag_original: bool,
    /// Legacy ISO 639-2 code (e.g. `jpn`).
    pub language: Option<String>,
    #[serde(deserialize_with = "lenient_locale")]
    pub language_ietf: LocaleInfo,
    pub number: Option<u32>,
    pub packetizer: Option<String>,
    pub track_name: String,
    pub num_index_entries: Option<u64>,

    // Video
    pub display_dimensions: Option<String>,
    pub display_unit: Option<u32>,
    pub pixel_dimensions: Option<String>,

    // Audio
    pub audio_channels: Option<u32>,
    pub audio_sampling_frequency: Option<u32>,

    // Subtitles
    pub encoding: Option<String>,
    pub text_subtitles: Option<bool>,
}

/// Unparseable or missing tags become `und` instead of failing the scan.
fn lenient_locale<'de, D>(deserializer: D) -> Result<LocaleInfo, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(text) = Option::<String>::deserialize(deserializer)? else {
        return Ok(LocaleInfo::default());
    };
    match LocaleInfo::parse(&text) {
        Ok(locale) => Ok(locale),
        Err(e) => {
            tracing::warn!("treating track language as undetermined: {e}");
            Ok(LocaleInfo::default())
        }
    }
}

impl TrackProperties {
    /// Suggested payload file extension for this track's codec.
    pub fn file_extension(&self) -> &'static str {
        CODEC_EXTENSIONS
            .iter()
            .find(|(marker, _)| self.codec_id.contains(marker))
            .map(|(_, ext)| *ext)
            .unwrap_or("bin")
    }

    /// Frame height in pixels from the display dimensions (`WxH`),
    /// falling back to the pixel dimensions.
    pub fn height(&self) -> Option<u32> {
        self.display_dimensions
            .as_deref()
            .and_then(parse_height)
            .or_else(|| self.pixel_dimensions.as_deref().and_then(parse_height))
    }
}

fn parse_height(dimensions: &str) -> Option<u32> {
    let (_, height) = dimensions.split_once('x')?;
    height.trim().parse().ok()
}

/// A single elementary stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: u32,
    #[serde(rename = "type")]
    pub track_type: TrackType,
    #[serde(default)]
    pub codec: String,
    #[serde(default)]
    pub properties: TrackProperties,
}

impl Track {
    pub fn is_video(&self) -> bool {
        self.track_type == TrackType::Video
    }

    pub fn is_audio(&self) -> bool {
        self.track_type == TrackType::Audio
    }

    pub fn is_subtitles(&self) -> bool {
        self.track_type == TrackType::Subtitles
    }

    /// Shorthand for the track's IETF language.
    pub fn language(&self) -> &LocaleInfo {
        &self.properties.language_ietf
    }
}

/// Chapter edition summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    #[serde(default)]
    pub num_entries: u32,
}

/// A file attached to the container (fonts, cover art).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attachment {
    pub id: u32,
    pub content_type: String,
    pub description: String,
    pub file_name: String,
    pub size: u64,
}

/// Container-level properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerProperties {
    pub container_type: Option<u32>,
    pub date_utc: Option<DateTime<Utc>>,
    pub duration: Option<u64>,
    pub is_providing_timestamps: bool,
    pub muxing_application: Option<String>,
    pub segment_uid: Option<String>,
    pub writing_application: Option<String>,
    pub timestamp_scale: Option<u64>,
}

/// Container summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Container {
    pub properties: ContainerProperties,
    pub recognized: bool,
    pub supported: bool,
    #[serde(rename = "type")]
    pub container_type: Option<String>,
}

/// Immutable snapshot of a scanned container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Identity {
    pub attachments: Vec<Attachment>,
    pub chapters: Vec<Chapter>,
    pub container: Container,
    pub tracks: Vec<Track>,
}

impl Identity {
    /// Parse an `mkvmerge -J` document and apply [`Identity::patch`].
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut identity: Identity = serde_json::from_str(json)?;
        identity.patch();
        Ok(identity)
    }

    /// Correct language tags for tracks whose name spells out a locale the
    /// structured tag does not carry.
    pub fn patch(&mut self) {
        for track in &mut self.tracks {
            let Some(tag) = LANGUAGE_MISLABELS
                .iter()
                .find(|(needle, _)| track.properties.track_name.contains(needle))
                .and_then(|(_, tag)| LocaleInfo::parse(tag).ok())
            else {
                continue;
            };
            tracing::debug!(
                track = track.id,
                from = %track.properties.language_ietf,
                to = %tag,
                "correcting mislabeled track language"
            );
            track.properties.language_ietf = tag;
        }
    }

    /// Whether any chapter edition has entries.
    pub fn has_chapters(&self) -> bool {
        self.chapters.iter().any(|c| c.num_entries > 0)
    }
}

/// Edits applied to a track at merge time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackOperations {
    /// Sync offset in milliseconds.
    pub delay_ms: i64,
}

/// A track whose payload has been written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedTrack {
    pub info: Track,
    pub operations: TrackOperations,
    pub file_path: PathBuf,
    pub time_map_path: Option<PathBuf>,
}

/// An attachment whose payload has been written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedAttachment {
    pub info: Attachment,
    pub file_path: PathBuf,
}

/// State between extraction and merge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedContainer {
    pub tracks: Vec<ExtractedTrack>,
    pub attachments: Vec<ExtractedAttachment>,
    pub chapters: Option<PathBuf>,
}
