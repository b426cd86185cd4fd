use tf_core::{Track, TrackType};

/// Standard resolution buckets, ascending.
pub const RESOLUTIONS: [u32; 8] = [240, 360, 480, 720, 1080, 1440, 2160, 4320];

/// The largest standard resolution not above `height`, as `<N>p`.
///
/// Heights below the smallest bucket get no tag.
pub fn resolution_tag(height: u32) -> Option<String> {
    RESOLUTIONS
        .iter()
        .rev()
        .find(|&&bucket| bucket <= height)
        .map(|bucket| format!("{bucket}p"))
}

/// Descriptive tags for a selected track, in rendering order.
///
/// - audio/subtitles with a known language: `"<English name> (<tag>)"`
/// - video: resolution bucket from the frame height
/// - any track with a codec id: the uppercased payload extension
pub fn track_tags(track: &Track) -> Vec<String> {
    let mut tags = Vec::new();
    let props = &track.properties;

    match track.track_type {
        TrackType::Audio | TrackType::Subtitles if !props.language_ietf.is_undetermined() => {
            tags.push(format!(
                "{} ({})",
                props.language_ietf.english_name(),
                props.language_ietf
            ));
        }
        TrackType::Video => {
            if let Some(tag) = props.height().and_then(resolution_tag) {
                tags.push(tag);
            }
        }
        _ => {}
    }

    if !props.codec_id.is_empty() {
        tags.push(props.file_extension().to_uppercase());
    }
    tags
}
