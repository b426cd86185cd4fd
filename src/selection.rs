//! Track selection and flag assignment.
//!
//! [`select_tracks`] consumes the sorted extraction result and decides, in a
//! single pass, which tracks survive and how their default/original flags and
//! sync offsets are set. Languages are compared by exact tag equality, so an
//! allow-list entry `es` does not admit an `es-ES` track.
//!
//! Audio defaults go to the first track in the main language. Subtitle
//! defaults depend on whether such an audio track exists: without one, the
//! first main-language subtitle becomes default; with one, only a forced
//! main-language subtitle (a signs track) does.

use tf_core::config::SelectionConfig;
use tf_core::{ExtractedTrack, TrackType};

/// Language policy driving [`select_tracks`].
pub type SelectionPolicy = SelectionConfig;

/// Result of a selection pass. Both lists keep the input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub selected: Vec<ExtractedTrack>,
    pub dropped: Vec<ExtractedTrack>,
}

/// Filter and flag `tracks`, which must already be in merge order.
pub fn select_tracks(tracks: Vec<ExtractedTrack>, policy: &SelectionPolicy) -> Selection {
    let mut selection = Selection::default();
    let mut main_audio_seen = false;
    let mut subtitle_default_set = false;

    for mut track in tracks {
        let lang = track.info.properties.language_ietf.clone();
        let props = &mut track.info.properties;
        props.track_name.clear();

        match track.info.track_type {
            TrackType::Video => {
                if lang == policy.original_language {
                    props.flag_original = true;
                }
            }
            TrackType::Audio => {
                if lang == policy.original_language {
                    props.flag_original = true;
                }

                if !main_audio_seen && lang == policy.main_language {
                    props.default_track = true;
                    main_audio_seen = true;
                } else {
                    props.default_track = false;
                }

                if !policy.audio_languages.contains(&lang) {
                    tracing::debug!(
                        track = track.info.id,
                        language = %lang,
                        "dropping audio track"
                    );
                    selection.dropped.push(track);
                    continue;
                }

                if let Some(rule) = policy.delays.iter().find(|r| r.language == lang) {
                    track.operations.delay_ms = rule.ms;
                }
            }
            TrackType::Subtitles => {
                if subtitle_default_set || lang != policy.main_language {
                    props.default_track = false;
                } else {
                    props.default_track = !main_audio_seen || props.forced_track;
                    subtitle_default_set = props.default_track;
                }
            }
            TrackType::Other => {}
        }

        selection.selected.push(track);
    }

    tracing::info!(
        selected = selection.selected.len(),
        dropped = selection.dropped.len(),
        "track selection complete"
    );
    selection
}
