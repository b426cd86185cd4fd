//! Extraction of every track, timestamp map, chapter list and attachment.
//!
//! All tracks are extracted unconditionally; selection happens later on the
//! sorted result. Payload paths are deterministic inside the [`Workspace`]:
//!
//! | Item        | Path                                  |
//! |-------------|---------------------------------------|
//! | track       | `track_<id>.<ext>`                    |
//! | timestamps  | `track_<id>_timemap.txt` (video only) |
//! | chapters    | `chapters.xml`                        |
//! | attachment  | `attachment_<id>_<file name>`         |

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use tf_core::{
    Error, ExtractedAttachment, ExtractedContainer, ExtractedTrack, Identity, Result,
    TrackOperations,
};

use crate::command::ToolOutput;
use crate::tools::Mkvextract;
use crate::workspace::Workspace;

/// One extraction request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractItem {
    Track { id: u32, dest: PathBuf },
    Timestamps { id: u32, dest: PathBuf },
    Chapters { dest: PathBuf },
    Attachment { id: u32, dest: PathBuf },
}

impl ExtractItem {
    /// Where the item is written.
    pub fn dest(&self) -> &Path {
        match self {
            ExtractItem::Track { dest, .. }
            | ExtractItem::Timestamps { dest, .. }
            | ExtractItem::Chapters { dest }
            | ExtractItem::Attachment { dest, .. } => dest,
        }
    }

    /// Short description used in logs and errors.
    pub fn label(&self) -> String {
        match self {
            ExtractItem::Track { id, .. } => format!("track {id}"),
            ExtractItem::Timestamps { id, .. } => format!("timestamps {id}"),
            ExtractItem::Chapters { .. } => "chapters".to_string(),
            ExtractItem::Attachment { id, .. } => format!("attachment {id}"),
        }
    }

    /// mkvextract arguments for this item.
    pub fn mkvextract_args(&self, source: &Path) -> Vec<String> {
        let source = source.to_string_lossy().to_string();
        let target = |id: &u32, dest: &Path| format!("{id}:{}", dest.display());
        match self {
            ExtractItem::Track { id, dest } => vec![source, "tracks".into(), target(id, dest)],
            ExtractItem::Timestamps { id, dest } => {
                vec![source, "timestamps_v2".into(), target(id, dest)]
            }
            ExtractItem::Chapters { dest } => {
                vec![source, "chapters".into(), dest.display().to_string()]
            }
            ExtractItem::Attachment { id, dest } => {
                vec![source, "attachments".into(), target(id, dest)]
            }
        }
    }
}

/// Writes one item of a container to disk.
pub trait Extractor {
    /// Run the extraction and return the raw result.
    ///
    /// `Err` is reserved for failing to run the tool at all.
    fn extract(&self, source: &Path, item: &ExtractItem) -> Result<ToolOutput>;
}

impl Extractor for Mkvextract {
    fn extract(&self, source: &Path, item: &ExtractItem) -> Result<ToolOutput> {
        let mut cmd = self.command();
        cmd.args(item.mkvextract_args(source));
        cmd.run()
    }
}

fn extract_one(extractor: &dyn Extractor, source: &Path, item: &ExtractItem) -> Result<()> {
    tracing::trace!("extracting {} to {}", item.label(), item.dest().display());
    let output = extractor
        .extract(source, item)
        .map_err(|e| Error::extraction(item.label(), e.to_string()))?;
    if !output.success() {
        return Err(Error::extraction(
            item.label(),
            format!(
                "extractor exited with {}: {}",
                output.code_display(),
                output.diagnostics()
            ),
        ));
    }
    Ok(())
}

/// Attachment names come from the container and must stay inside the workspace.
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect()
}

/// Extract every item of `identity` into `workspace`.
///
/// Each destination is registered with the workspace before the extractor
/// runs. The returned tracks are ordered with [`sort_tracks`].
///
/// # Errors
///
/// Returns [`Error::Extraction`] naming the first item that failed. Files
/// written up to that point stay registered with the workspace.
pub fn extract_all(
    identity: &Identity,
    source: &Path,
    extractor: &dyn Extractor,
    workspace: &mut Workspace,
) -> Result<ExtractedContainer> {
    tracing::debug!("extracting all items from {}", source.display());

    let mut tracks = Vec::with_capacity(identity.tracks.len());
    for track in &identity.tracks {
        let file_name = format!("track_{}.{}", track.id, track.properties.file_extension());
        let file_path = workspace.track(workspace.file(&file_name));
        extract_one(
            extractor,
            source,
            &ExtractItem::Track {
                id: track.id,
                dest: file_path.clone(),
            },
        )?;

        let time_map_path = if track.is_video() {
            let map =
                workspace.track(workspace.file(&format!("track_{}_timemap.txt", track.id)));
            extract_one(
                extractor,
                source,
                &ExtractItem::Timestamps {
                    id: track.id,
                    dest: map.clone(),
                },
            )?;
            Some(map)
        } else {
            None
        };

        tracks.push(ExtractedTrack {
            info: track.clone(),
            operations: TrackOperations::default(),
            file_path,
            time_map_path,
        });
    }

    let chapters = if identity.has_chapters() {
        let dest = workspace.track(workspace.file("chapters.xml"));
        extract_one(extractor, source, &ExtractItem::Chapters { dest: dest.clone() })?;
        Some(dest)
    } else {
        None
    };

    let mut attachments = Vec::with_capacity(identity.attachments.len());
    for attachment in &identity.attachments {
        let file_name = format!(
            "attachment_{}_{}",
            attachment.id,
            sanitize_file_name(&attachment.file_name)
        );
        let dest = workspace.track(workspace.file(&file_name));
        extract_one(
            extractor,
            source,
            &ExtractItem::Attachment {
                id: attachment.id,
                dest: dest.clone(),
            },
        )?;
        attachments.push(ExtractedAttachment {
            info: attachment.clone(),
            file_path: dest,
        });
    }

    sort_tracks(&mut tracks);
    tracing::info!(
        tracks = tracks.len(),
        attachments = attachments.len(),
        chapters = chapters.is_some(),
        "extraction complete"
    );

    Ok(ExtractedContainer {
        tracks,
        attachments,
        chapters,
    })
}

/// Ordering between two extracted tracks: type, then language tag text,
/// then forced before unforced.
pub fn track_ordering(a: &ExtractedTrack, b: &ExtractedTrack) -> Ordering {
    a.info
        .track_type
        .order()
        .cmp(&b.info.track_type.order())
        .then_with(|| {
            a.info
                .language()
                .to_string()
                .cmp(&b.info.language().to_string())
        })
        .then_with(|| {
            b.info
                .properties
                .forced_track
                .cmp(&a.info.properties.forced_track)
        })
}

/// Stable sort by [`track_ordering`]; ties keep their container order.
pub fn sort_tracks(tracks: &mut [ExtractedTrack]) {
    tracks.sort_by(track_ordering);
}
