//! Remultiplexing the selected tracks into the output container.

use std::path::Path;

use tf_core::{Error, ExtractedContainer, Result};

use crate::command::ToolOutput;
use crate::tools::Mkvmerge;

/// How a successful merge finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    Clean,
    /// The multiplexer exited with 1; the output exists but it had complaints.
    Warnings(String),
}

/// Builds the output container from a directive list.
pub trait Multiplexer {
    /// Run the multiplexer with `args` and return the raw result.
    ///
    /// `Err` is reserved for failing to run the tool at all.
    fn multiplex(&self, args: &[String]) -> Result<ToolOutput>;
}

impl Multiplexer for Mkvmerge {
    fn multiplex(&self, args: &[String]) -> Result<ToolOutput> {
        let mut cmd = self.command();
        cmd.args(args.iter().cloned());
        cmd.run()
    }
}

fn flag(value: bool) -> String {
    format!("0:{}", if value { "yes" } else { "no" })
}

/// The mkvmerge directive list for `container`.
///
/// Every track is its own input file, so track options always address id 0.
pub fn merge_args(output: &Path, container: &ExtractedContainer) -> Vec<String> {
    let mut args = vec!["-o".to_string(), output.display().to_string()];

    for track in &container.tracks {
        let props = &track.info.properties;

        args.push("--track-name".into());
        args.push(format!("0:{}", props.track_name.trim_matches(' ')));

        if let Some(map) = &track.time_map_path {
            args.push("--timestamps".into());
            args.push(format!("0:{}", map.display()));
        }

        if !props.language_ietf.is_undetermined() {
            args.push("--language".into());
            args.push(format!("0:{}", props.language_ietf));
        }

        args.push("--default-track-flag".into());
        args.push(flag(props.default_track));
        args.push("--forced-display-flag".into());
        args.push(flag(props.forced_track));
        args.push("--original-flag".into());
        args.push(flag(props.flag_original));

        if track.operations.delay_ms != 0 {
            args.push("--sync".into());
            args.push(format!("0:{}", track.operations.delay_ms));
        }

        args.push(track.file_path.display().to_string());
    }

    if let Some(chapters) = &container.chapters {
        args.push("--chapters".into());
        args.push(chapters.display().to_string());
    }

    for attachment in &container.attachments {
        let info = &attachment.info;
        if !info.description.is_empty() {
            args.push("--attachment-description".into());
            args.push(info.description.clone());
        }
        if !info.content_type.is_empty() {
            args.push("--attachment-mime-type".into());
            args.push(info.content_type.clone());
        }
        if !info.file_name.is_empty() {
            args.push("--attachment-name".into());
            args.push(info.file_name.clone());
        }
        args.push("--attach-file".into());
        args.push(attachment.file_path.display().to_string());
    }

    args
}

fn verify_payloads(container: &ExtractedContainer) -> Result<()> {
    let tracks = container
        .tracks
        .iter()
        .flat_map(|t| std::iter::once(&t.file_path).chain(t.time_map_path.iter()));
    let attachments = container.attachments.iter().map(|a| &a.file_path);

    for path in tracks.chain(container.chapters.iter()).chain(attachments) {
        if !path.is_file() {
            return Err(Error::Merge(format!(
                "payload does not exist: {}",
                path.display()
            )));
        }
    }
    Ok(())
}

/// Write `container` to `output`.
///
/// # Errors
///
/// Returns [`Error::Merge`] if a payload is missing (the multiplexer is not
/// invoked), the tool cannot run, or it exits with anything other than 0 or 1.
pub fn merge(
    multiplexer: &dyn Multiplexer,
    output: &Path,
    container: &ExtractedContainer,
) -> Result<MergeOutcome> {
    verify_payloads(container)?;

    let args = merge_args(output, container);
    tracing::trace!("merge arguments: {args:?}");

    let result = multiplexer
        .multiplex(&args)
        .map_err(|e| Error::Merge(e.to_string()))?;

    match result.code {
        Some(0) => Ok(MergeOutcome::Clean),
        Some(1) => {
            let warnings = result.diagnostics().to_string();
            tracing::warn!("multiplexer finished with warnings: {warnings}");
            Ok(MergeOutcome::Warnings(warnings))
        }
        _ => {
            tracing::error!("{}", result.diagnostics());
            Err(Error::Merge(format!(
                "multiplexer exited with {}: {}",
                result.code_display(),
                result.diagnostics()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use std::path::PathBuf;

    use assert_matches::assert_matches;
    use tf_core::{
        Attachment, ExtractedAttachment, ExtractedTrack, LocaleInfo, Track, TrackOperations,
        TrackProperties, TrackType,
    };

    struct Recording {
        code: Option<i32>,
        args: RefCell<Option<Vec<String>>>,
    }

    impl Recording {
        fn exiting(code: i32) -> Self {
            Self {
                code: Some(code),
                args: RefCell::new(None),
            }
        }
    }

    impl Multiplexer for Recording {
        fn multiplex(&self, args: &[String]) -> Result<ToolOutput> {
            *self.args.borrow_mut() = Some(args.to_vec());
            Ok(ToolOutput {
                code: self.code,
                stdout: "Warning: chapter timestamps out of range\n".into(),
                stderr: String::new(),
            })
        }
    }

    fn extracted(id: u32, track_type: TrackType, lang: &str, path: PathBuf) -> ExtractedTrack {
        ExtractedTrack {
            info: Track {
                id,
                track_type,
                codec: String::new(),
                properties: TrackProperties {
                    language_ietf: LocaleInfo::parse(lang).unwrap(),
                    ..TrackProperties::default()
                },
            },
            operations: TrackOperations::default(),
            file_path: path,
            time_map_path: None,
        }
    }

    fn sample(dir: &Path) -> ExtractedContainer {
        let mut video = extracted(0, TrackType::Video, "ja", dir.join("track_0.h264"));
        video.time_map_path = Some(dir.join("track_0_timemap.txt"));
        video.info.properties.flag_original = true;

        let mut audio = extracted(1, TrackType::Audio, "es-ES", dir.join("track_1.aac"));
        audio.info.properties.default_track = true;
        audio.info.properties.track_name = "  Castellano ".into();
        audio.operations.delay_ms = -250;

        let mut subs = extracted(2, TrackType::Subtitles, "und", dir.join("track_2.srt"));
        subs.info.properties.forced_track = true;

        ExtractedContainer {
            tracks: vec![video, audio, subs],
            attachments: vec![ExtractedAttachment {
                info: Attachment {
                    id: 1,
                    content_type: "font/ttf".into(),
                    description: String::new(),
                    file_name: "Arial.ttf".into(),
                    size: 4,
                },
                file_path: dir.join("attachment_1_Arial.ttf"),
            }],
            chapters: Some(dir.join("chapters.xml")),
        }
    }

    fn write_payloads(container: &ExtractedContainer) {
        for t in &container.tracks {
            fs::write(&t.file_path, b"x").unwrap();
            if let Some(map) = &t.time_map_path {
                fs::write(map, b"# timestamp format v2").unwrap();
            }
        }
        for a in &container.attachments {
            fs::write(&a.file_path, b"font").unwrap();
        }
        if let Some(ch) = &container.chapters {
            fs::write(ch, b"<Chapters/>").unwrap();
        }
    }

    #[test]
    fn argument_layout() {
        let dir = Path::new("/w");
        let args = merge_args(Path::new("/out/Show.mkv"), &sample(dir));
        #[rustfmt::skip]
        let expected: Vec<&str> = vec![
            "-o", "/out/Show.mkv",
            "--track-name", "0:",
            "--timestamps", "0:/w/track_0_timemap.txt",
            "--language", "0:ja",
            "--default-track-flag", "0:no",
            "--forced-display-flag", "0:no",
            "--original-flag", "0:yes",
            "/w/track_0.h264",
            "--track-name", "0:Castellano",
            "--language", "0:es-ES",
            "--default-track-flag", "0:yes",
            "--forced-display-flag", "0:no",
            "--original-flag", "0:no",
            "--sync", "0:-250",
            "/w/track_1.aac",
            "--track-name", "0:",
            "--default-track-flag", "0:no",
            "--forced-display-flag", "0:yes",
            "--original-flag", "0:no",
            "/w/track_2.srt",
            "--chapters", "/w/chapters.xml",
            "--attachment-mime-type", "font/ttf",
            "--attachment-name", "Arial.ttf",
            "--attach-file", "/w/attachment_1_Arial.ttf",
        ];
        assert_eq!(args, expected);
    }

    #[test]
    fn clean_and_warning_exits() {
        let dir = tempfile::tempdir().unwrap();
        let container = sample(dir.path());
        write_payloads(&container);
        let out = dir.path().join("out.mkv");

        let clean = Recording::exiting(0);
        assert_eq!(merge(&clean, &out, &container).unwrap(), MergeOutcome::Clean);
        assert_eq!(
            clean.args.borrow().as_ref().unwrap(),
            &merge_args(&out, &container)
        );

        let warn = Recording::exiting(1);
        assert_matches!(
            merge(&warn, &out, &container),
            Ok(MergeOutcome::Warnings(ref w)) if w.contains("chapter timestamps")
        );
    }

    #[test]
    fn other_exits_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let container = sample(dir.path());
        write_payloads(&container);

        for code in [Some(2), None] {
            let fake = Recording {
                code,
                args: RefCell::new(None),
            };
            let err = merge(&fake, &dir.path().join("out.mkv"), &container).unwrap_err();
            assert_matches!(err, Error::Merge(_));
        }
    }

    #[test]
    fn missing_payload_blocks_invocation() {
        let dir = tempfile::tempdir().unwrap();
        let container = sample(dir.path());
        write_payloads(&container);
        fs::remove_file(dir.path().join("track_1.aac")).unwrap();

        let fake = Recording::exiting(0);
        let err = merge(&fake, &dir.path().join("out.mkv"), &container).unwrap_err();
        assert_matches!(err, Error::Merge(ref msg) if msg.contains("track_1.aac"));
        assert!(fake.args.borrow().is_none());
    }
}
