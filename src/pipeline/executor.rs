use std::path::{Path, PathBuf};

use tf_av::{
    extract_all, merge, scan, Extractor, Ffmpeg, Inspector, MergeOutcome, Mkvextract, Mkvmerge,
    Multiplexer, ToolRegistry, Transcoder, Workspace,
};
use tf_core::{Error, ExtractedContainer, ExtractedTrack, Result, TrackType};
use tf_naming::{parse_source_name, track_tags, OutputName};

use crate::config::Config;
use crate::normalize::normalize_codecs;
use crate::selection::select_tracks;

/// The external collaborators one pipeline run talks to.
pub struct Collaborators {
    pub inspector: Box<dyn Inspector>,
    pub extractor: Box<dyn Extractor>,
    pub transcoder: Box<dyn Transcoder>,
    pub multiplexer: Box<dyn Multiplexer>,
}

impl Collaborators {
    /// mkvmerge, mkvextract and ffmpeg as found in `registry`.
    pub fn system(registry: &ToolRegistry) -> Result<Self> {
        let mkvmerge = Mkvmerge::from_registry(registry)?;
        Ok(Self {
            inspector: Box::new(mkvmerge.clone()),
            extractor: Box::new(Mkvextract::from_registry(registry)?),
            transcoder: Box::new(Ffmpeg::from_registry(registry)?),
            multiplexer: Box::new(mkvmerge),
        })
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessReport {
    pub output: PathBuf,
    pub outcome: MergeOutcome,
    pub selected: usize,
    pub dropped: usize,
}

/// Runs the repackaging pipeline for one input at a time.
pub struct PipelineExecutor {
    tools: Collaborators,
    config: Config,
}

impl PipelineExecutor {
    pub fn new(tools: Collaborators, config: Config) -> Self {
        Self { tools, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Repackage `input` into a sibling file with a canonical name.
    ///
    /// Every intermediate file lives in a [`Workspace`] that is dropped before
    /// this returns, whatever the outcome.
    pub fn process(&self, input: &Path) -> Result<ProcessReport> {
        let _span = tracing::info_span!("input", path = %input.display()).entered();
        tracing::info!("processing");

        let identity = scan(self.tools.inspector.as_ref(), input)?;

        let mut workspace = Workspace::new(self.config.work_dir.as_deref())?;
        let extracted = extract_all(
            &identity,
            input,
            self.tools.extractor.as_ref(),
            &mut workspace,
        )?;

        let selection = select_tracks(extracted.tracks, &self.config.selection);
        let dropped = selection.dropped.len();

        let tracks = normalize_codecs(
            selection.selected,
            self.tools.transcoder.as_ref(),
            &self.config.normalize,
            &mut workspace,
        );

        let output = output_path(input, &self.output_name(input, &tracks))?;
        let container = ExtractedContainer {
            tracks,
            attachments: extracted.attachments,
            chapters: extracted.chapters,
        };

        tracing::info!("writing {}", output.display());
        let outcome = merge(self.tools.multiplexer.as_ref(), &output, &container)?;
        tracing::info!("done");

        Ok(ProcessReport {
            output,
            outcome,
            selected: container.tracks.len(),
            dropped,
        })
    }

    /// Canonical output name for `input` given its selected tracks.
    pub fn output_name(&self, input: &Path, tracks: &[ExtractedTrack]) -> OutputName {
        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut name = OutputName::from(parse_source_name(&file_name));
        for track in tracks {
            match track.info.track_type {
                TrackType::Video => name.video_tags = track_tags(&track.info),
                TrackType::Audio => name.audio_tags.push(track_tags(&track.info)),
                _ => {}
            }
        }
        name.origin = self.config.naming.origin.clone();
        name.authors = self.config.naming.authors.clone();
        name
    }
}

fn output_path(input: &Path, name: &OutputName) -> Result<PathBuf> {
    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    let output = dir.join(name.file_name());
    if output == input {
        return Err(Error::Merge(format!(
            "output name matches the input: {}",
            output.display()
        )));
    }
    Ok(output)
}
