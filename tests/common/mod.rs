//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which wires a [`PipelineExecutor`] to in-process
//! fakes for every external tool. The fakes write real files so workspace
//! cleanup can be observed, and record what they were asked to do.

#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tempfile::TempDir;
use tf_av::{
    ConvertOptions, ExtractItem, Extractor, Inspector, Multiplexer, ToolOutput, Transcoder,
};
use tf_core::Result;
use trackforge::config::Config;
use trackforge::{Collaborators, PipelineExecutor};

/// A Matroska identification document with one of every track kind.
pub const IDENTITY: &str = r#"{
    "attachments": [
        {"id": 1, "content_type": "font/ttf", "description": "", "file_name": "font.ttf", "size": 4}
    ],
    "chapters": [{"num_entries": 3}],
    "container": {"recognized": true, "supported": true, "type": "Matroska", "properties": {}},
    "tracks": [
        {"id": 0, "type": "video", "codec": "AVC/H.264/MPEG-4p10",
         "properties": {"codec_id": "V_MPEG4/ISO/AVC", "language_ietf": "ja",
                        "display_dimensions": "1920x1080", "track_name": "Main"}},
        {"id": 1, "type": "audio", "codec": "FLAC",
         "properties": {"codec_id": "A_FLAC", "language_ietf": "ja"}},
        {"id": 2, "type": "audio", "codec": "AAC",
         "properties": {"codec_id": "A_AAC", "language_ietf": "es", "track_name": "European Spanish"}},
        {"id": 3, "type": "audio", "codec": "AAC",
         "properties": {"codec_id": "A_AAC", "language_ietf": "en"}},
        {"id": 4, "type": "subtitles", "codec": "SubRip/SRT",
         "properties": {"codec_id": "S_TEXT/UTF8", "language_ietf": "es-ES", "forced_track": true}},
        {"id": 5, "type": "subtitles", "codec": "SubRip/SRT",
         "properties": {"codec_id": "S_TEXT/UTF8", "language_ietf": "es-ES"}}
    ]
}"#;

fn exit(code: i32, stderr: &str) -> ToolOutput {
    ToolOutput {
        code: Some(code),
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

/// What the fakes observed during a run.
#[derive(Debug, Default)]
pub struct Calls {
    pub identified: Vec<PathBuf>,
    pub extracted: Vec<ExtractItem>,
    pub transcoded: Vec<ConvertOptions>,
    pub merged: Vec<Vec<String>>,
}

/// Knobs for making individual fakes fail.
#[derive(Debug, Clone, Default)]
pub struct Behavior {
    pub scan_exit: i32,
    pub fail_extract: Option<String>,
    pub transcode_exit: i32,
    pub merge_exit: i32,
}

struct Fake {
    calls: Rc<RefCell<Calls>>,
    behavior: Behavior,
}

impl Inspector for Fake {
    fn identify(&self, source: &Path) -> Result<ToolOutput> {
        self.calls.borrow_mut().identified.push(source.to_path_buf());
        if self.behavior.scan_exit != 0 {
            return Ok(exit(self.behavior.scan_exit, "not a Matroska file"));
        }
        Ok(ToolOutput {
            code: Some(0),
            stdout: IDENTITY.to_string(),
            stderr: String::new(),
        })
    }
}

impl Extractor for Fake {
    fn extract(&self, _source: &Path, item: &ExtractItem) -> Result<ToolOutput> {
        self.calls.borrow_mut().extracted.push(item.clone());
        if self.behavior.fail_extract.as_deref() == Some(item.label().as_str()) {
            return Ok(exit(2, "extraction failed"));
        }
        fs::write(item.dest(), item.label())?;
        Ok(exit(0, ""))
    }
}

impl Transcoder for Fake {
    fn transcode(&self, options: &ConvertOptions) -> Result<ToolOutput> {
        self.calls.borrow_mut().transcoded.push(options.clone());
        if self.behavior.transcode_exit != 0 {
            return Ok(exit(self.behavior.transcode_exit, "encoder failure"));
        }
        fs::write(&options.output, b"converted")?;
        Ok(exit(0, ""))
    }
}

impl Multiplexer for Fake {
    fn multiplex(&self, args: &[String]) -> Result<ToolOutput> {
        self.calls.borrow_mut().merged.push(args.to_vec());
        if self.behavior.merge_exit > 1 {
            return Ok(exit(self.behavior.merge_exit, "mux failed"));
        }
        fs::write(&args[1], b"matroska")?;
        Ok(exit(self.behavior.merge_exit, "Warning: minor issue"))
    }
}

/// A pipeline wired to fakes, with separate media and work directories.
pub struct TestHarness {
    pub media: TempDir,
    pub work: TempDir,
    pub calls: Rc<RefCell<Calls>>,
    pub executor: PipelineExecutor,
}

impl TestHarness {
    /// Harness with the default test config and well-behaved fakes.
    pub fn new() -> Self {
        Self::with_behavior(Behavior::default())
    }

    /// Harness whose fakes follow `behavior`.
    pub fn with_behavior(behavior: Behavior) -> Self {
        Self::build(behavior, |_| {})
    }

    /// Harness with a customised config.
    pub fn build(behavior: Behavior, tweak: impl FnOnce(&mut Config)) -> Self {
        let media = tempfile::tempdir().expect("media dir");
        let work = tempfile::tempdir().expect("work dir");
        let calls = Rc::new(RefCell::new(Calls::default()));

        let mut config = Config::default();
        config.selection.main_language = "es-ES".parse().expect("tag");
        config.selection.audio_languages =
            vec!["ja".parse().expect("tag"), "es-ES".parse().expect("tag")];
        config.naming.authors = vec!["Alice".to_string()];
        config.work_dir = Some(work.path().to_path_buf());
        tweak(&mut config);

        let fake = || {
            Box::new(Fake {
                calls: Rc::clone(&calls),
                behavior: behavior.clone(),
            })
        };
        let tools = Collaborators {
            inspector: fake(),
            extractor: fake(),
            transcoder: fake(),
            multiplexer: fake(),
        };

        Self {
            media,
            work,
            calls,
            executor: PipelineExecutor::new(tools, config),
        }
    }

    /// Create an (empty) input file in the media directory.
    pub fn input(&self, name: &str) -> PathBuf {
        let path = self.media.path().join(name);
        fs::write(&path, b"").expect("write input");
        path
    }

    /// Files currently left in the work directory.
    pub fn leftovers(&self) -> Vec<PathBuf> {
        fs::read_dir(self.work.path())
            .expect("read work dir")
            .map(|e| e.expect("entry").path())
            .collect()
    }
}
