//! Audio transcoding through ffmpeg.

use std::fs::File;
use std::path::{Path, PathBuf};

use tf_core::{Error, Result};

use crate::command::ToolOutput;
use crate::tools::Ffmpeg;

/// An input file and an optional stream map selector (`-map`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    pub track_map: Option<String>,
}

/// Target encoder for a stream specifier, rendered as `-c:<selector> <encoder>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEncoder {
    pub selector: String,
    pub encoder: String,
}

/// A conversion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    pub inputs: Vec<InputFile>,
    pub output: PathBuf,
    pub streams: Vec<StreamEncoder>,
}

impl ConvertOptions {
    /// Convert the first audio stream of `input` with `encoder`.
    pub fn single_audio(input: &Path, output: &Path, encoder: &str) -> Self {
        Self {
            inputs: vec![InputFile {
                path: input.to_path_buf(),
                track_map: Some("0:a:0".to_string()),
            }],
            output: output.to_path_buf(),
            streams: vec![StreamEncoder {
                selector: "a".to_string(),
                encoder: encoder.to_string(),
            }],
        }
    }

    /// Check that every input exists and can be opened for reading.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transcode`] naming the first unusable input.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(Error::Transcode("no input files".into()));
        }
        for input in &self.inputs {
            if !input.path.is_file() {
                return Err(Error::Transcode(format!(
                    "input file does not exist: {}",
                    input.path.display()
                )));
            }
            File::open(&input.path).map_err(|e| {
                Error::Transcode(format!(
                    "cannot read input file {}: {e}",
                    input.path.display()
                ))
            })?;
        }
        Ok(())
    }

    /// ffmpeg arguments for this request.
    pub fn ffmpeg_args(&self) -> Vec<String> {
        let mut args: Vec<String> = ["-nostats", "-hide_banner", "-y", "-progress", "-"]
            .into_iter()
            .map(String::from)
            .collect();

        for input in &self.inputs {
            args.push("-i".into());
            args.push(input.path.to_string_lossy().to_string());
            if let Some(map) = &input.track_map {
                args.push("-map".into());
                args.push(map.clone());
            }
        }
        for stream in &self.streams {
            args.push(format!("-c:{}", stream.selector));
            args.push(stream.encoder.clone());
        }
        args.push(self.output.to_string_lossy().to_string());
        args
    }
}

/// Converts streams into a new file.
pub trait Transcoder {
    /// Run the conversion and return the raw result.
    ///
    /// `Err` is reserved for failing to run the tool at all.
    fn transcode(&self, options: &ConvertOptions) -> Result<ToolOutput>;
}

impl Transcoder for Ffmpeg {
    fn transcode(&self, options: &ConvertOptions) -> Result<ToolOutput> {
        let mut cmd = self.command();
        cmd.args(options.ffmpeg_args());
        cmd.run()
    }
}

/// Validate `options`, then run the conversion.
///
/// # Errors
///
/// Returns [`Error::Transcode`] if validation rejects the request (the
/// transcoder is not invoked), the tool cannot run, or it exits non-zero.
pub fn transcode(transcoder: &dyn Transcoder, options: &ConvertOptions) -> Result<()> {
    options.validate()?;
    tracing::trace!("transcoding into {}", options.output.display());

    let output = transcoder
        .transcode(options)
        .map_err(|e| Error::Transcode(e.to_string()))?;
    if !output.success() {
        return Err(Error::Transcode(format!(
            "transcoder exited with {}: {}",
            output.code_display(),
            output.diagnostics()
        )));
    }
    Ok(())
}
