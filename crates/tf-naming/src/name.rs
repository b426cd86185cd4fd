use std::fmt::Write;

use crate::ParsedName;

/// Everything that goes into the output file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputName {
    pub show: String,
    pub year: Option<u32>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub title: Option<String>,
    pub origin: Option<String>,
    pub video_tags: Vec<String>,
    /// One tag list per selected audio track, in track order.
    pub audio_tags: Vec<Vec<String>>,
    pub authors: Vec<String>,
    pub extension: String,
}

impl From<ParsedName> for OutputName {
    fn from(parsed: ParsedName) -> Self {
        Self {
            show: parsed.show,
            year: parsed.year,
            season: parsed.season,
            episode: parsed.episode,
            extension: parsed.extension,
            ..Self::default()
        }
    }
}

impl OutputName {
    /// Render `Show[ (Year)][ - sSSeEE | - eEE][ - Title][ [groups]].ext`.
    pub fn file_name(&self) -> String {
        let mut out = self.show.clone();

        if let Some(year) = self.year.filter(|&y| y > 0) {
            let _ = write!(out, " ({year:04})");
        }

        match (self.season, self.episode.filter(|&e| e > 0)) {
            (Some(season), Some(episode)) => {
                let _ = write!(out, " - s{season:02}e{episode:02}");
            }
            (None, Some(episode)) => {
                let _ = write!(out, " - e{episode:02}");
            }
            _ => {}
        }

        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            out.push_str(" - ");
            out.push_str(title);
        }

        let groups: Vec<String> = self
            .origin
            .iter()
            .filter(|o| !o.is_empty())
            .map(|o| o.to_string())
            .chain(Some(&self.video_tags).filter(|t| !t.is_empty()).map(|t| t.join("; ")))
            .chain(
                self.audio_tags
                    .iter()
                    .filter(|t| !t.is_empty())
                    .map(|t| t.join("; ")),
            )
            .chain(Some(&self.authors).filter(|a| !a.is_empty()).map(|a| a.join("; ")))
            .collect();

        if !groups.is_empty() {
            out.push(' ');
            for group in groups {
                let _ = write!(out, "[{group}]");
            }
        }

        out.push('.');
        out.push_str(&self.extension);
        out
    }
}
