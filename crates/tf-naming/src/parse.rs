//! Source file name parsing.

use regex::Regex;

macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| Regex::new($re).unwrap())
    }};
}

/// Fields recovered from a source file name. Anything not found is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedName {
    pub show: String,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    /// Release year. Only set when the year token parses as a number on its own.
    pub year: Option<u32>,
    /// The raw year token as matched, parentheses included.
    pub year_text: Option<String>,
    /// Text after the final dot; empty when there is none.
    pub extension: String,
}

fn capture_number(caps: &regex::Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group).and_then(|m| m.as_str().parse().ok())
}

/// Parse a bare file name (no directories).
///
/// Season and episode are filled by a cascade of patterns; a later pattern
/// never overwrites a field an earlier one already set. Digits, spaces and
/// case folding are ASCII only.
pub fn parse_source_name(file_name: &str) -> ParsedName {
    let mut name = ParsedName {
        show: match file_name.find(['(', '{', '[', '-', '_']) {
            Some(idx) => file_name[..idx].trim_matches([' ', '.']).to_string(),
            None => file_name.to_string(),
        },
        ..ParsedName::default()
    };

    if let Some(caps) = regex!(r"(?i-u)S(\d{1,2})E(\d{1,3})").captures(file_name) {
        name.season = capture_number(&caps, 1);
        name.episode = capture_number(&caps, 2);
    }

    if name.season.is_none() || name.episode.is_none() {
        if let Some(caps) = regex!(r"(?i-u)(\d{1,2})x(\d{1,3})").captures(file_name) {
            name.season = name.season.or(capture_number(&caps, 1));
            name.episode = name.episode.or(capture_number(&caps, 2));
        }
    }

    if name.episode.is_none() {
        if let Some(caps) = regex!(r"(?i-u)(Episode|Ep)\s?(\d{1,3})").captures(file_name) {
            name.episode = capture_number(&caps, 2);
        }
    }

    if name.season.is_none() {
        if let Some(caps) = regex!(r"(?i-u)Season\s?(\d{1,2})").captures(file_name) {
            name.season = capture_number(&caps, 1);
        }
    }

    if name.episode.is_none() {
        if let Some(caps) = regex!(r"(?-u)[\s._-](\d{2,3})[\s._-]").captures(file_name) {
            name.episode = capture_number(&caps, 1);
        }
    }

    if let Some(m) = regex!(r"(?-u)\((19|20)\d{2}\)").find(file_name) {
        // The whole token is parsed, parentheses included, so this stays None.
        name.year = m.as_str().parse().ok();
        name.year_text = Some(m.as_str().to_string());
    }

    if let Some(idx) = file_name.rfind('.') {
        name.extension = file_name[idx + 1..].to_string();
    }

    tracing::trace!(?name, "parsed source name {file_name:?}");
    name
}
