//! Replacement of disfavored audio codecs.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tf_av::{transcode, ConvertOptions, Transcoder, Workspace};
use tf_core::config::NormalizeConfig;
use tf_core::ExtractedTrack;

fn target_path(payload: &Path, encoder: &str) -> PathBuf {
    let mut target = OsString::from(payload.as_os_str());
    target.push(".");
    target.push(encoder);
    PathBuf::from(target)
}

fn is_undesired(track: &ExtractedTrack, settings: &NormalizeConfig) -> bool {
    track.info.is_audio()
        && settings
            .undesired
            .iter()
            .any(|marker| track.info.properties.codec_id.contains(marker.as_str()))
}

/// Transcode every audio track whose codec id contains an undesired marker.
///
/// A converted track points at `<payload>.<encoder>` and carries the target
/// codec. A failed conversion is logged and the track is returned untouched;
/// this step never fails.
pub fn normalize_codecs(
    tracks: Vec<ExtractedTrack>,
    transcoder: &dyn Transcoder,
    settings: &NormalizeConfig,
    workspace: &mut Workspace,
) -> Vec<ExtractedTrack> {
    tracks
        .into_iter()
        .map(|mut track| {
            if !is_undesired(&track, settings) {
                return track;
            }

            let target = workspace.track(target_path(&track.file_path, &settings.encoder));
            tracing::info!(
                track = track.info.id,
                language = %track.info.language(),
                "converting {} audio to {}",
                track.info.properties.codec_id,
                settings.encoder
            );

            let options =
                ConvertOptions::single_audio(&track.file_path, &target, &settings.encoder);
            match transcode(transcoder, &options) {
                Ok(()) => {
                    track.file_path = target;
                    track.info.properties.codec_id = settings.codec_id.clone();
                    track.info.codec = settings.codec.clone();
                }
                Err(e) => {
                    tracing::warn!(
                        track = track.info.id,
                        "audio conversion failed, keeping original: {e}"
                    );
                }
            }
            track
        })
        .collect()
}
