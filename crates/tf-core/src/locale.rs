//! IETF language tag handling.
//!
//! [`LocaleInfo`] wraps a parsed [`LanguageIdentifier`] and is the only type
//! used for language comparisons across the workspace. Tags are canonicalized
//! on parse, so `es-es` and `es-ES` compare equal while `es` and `es-ES` do
//! not. Use [`LocaleInfo::base`] or [`LocaleInfo::same_base`] when a fallback
//! match on the bare language is wanted.

use std::fmt;
use std::str::FromStr;

use phf::phf_map;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use unic_langid::LanguageIdentifier;

use crate::{Error, Result};

/// English and native display names, keyed by base language subtag.
static LANGUAGE_NAMES: phf::Map<&'static str, (&'static str, &'static str)> = phf_map! {
    "ar" => ("Arabic", "العربية"),
    "bg" => ("Bulgarian", "български"),
    "ca" => ("Catalan", "català"),
    "cs" => ("Czech", "čeština"),
    "da" => ("Danish", "dansk"),
    "de" => ("German", "Deutsch"),
    "el" => ("Greek", "Ελληνικά"),
    "en" => ("English", "English"),
    "es" => ("Spanish", "español"),
    "et" => ("Estonian", "eesti"),
    "eu" => ("Basque", "euskara"),
    "fa" => ("Persian", "فارسی"),
    "fi" => ("Finnish", "suomi"),
    "fil" => ("Filipino", "Filipino"),
    "fr" => ("French", "français"),
    "gl" => ("Galician", "galego"),
    "he" => ("Hebrew", "עברית"),
    "hi" => ("Hindi", "हिन्दी"),
    "hr" => ("Croatian", "hrvatski"),
    "hu" => ("Hungarian", "magyar"),
    "id" => ("Indonesian", "Indonesia"),
    "it" => ("Italian", "italiano"),
    "ja" => ("Japanese", "日本語"),
    "ko" => ("Korean", "한국어"),
    "lt" => ("Lithuanian", "lietuvių"),
    "lv" => ("Latvian", "latviešu"),
    "ms" => ("Malay", "Melayu"),
    "nb" => ("Norwegian Bokmål", "norsk bokmål"),
    "nl" => ("Dutch", "Nederlands"),
    "no" => ("Norwegian", "norsk"),
    "pl" => ("Polish", "polski"),
    "pt" => ("Portuguese", "português"),
    "ro" => ("Romanian", "română"),
    "ru" => ("Russian", "русский"),
    "sk" => ("Slovak", "slovenčina"),
    "sl" => ("Slovenian", "slovenščina"),
    "sr" => ("Serbian", "српски"),
    "sv" => ("Swedish", "svenska"),
    "ta" => ("Tamil", "தமிழ்"),
    "te" => ("Telugu", "తెలుగు"),
    "th" => ("Thai", "ไทย"),
    "tr" => ("Turkish", "Türkçe"),
    "uk" => ("Ukrainian", "українська"),
    "vi" => ("Vietnamese", "Tiếng Việt"),
    "zh" => ("Chinese", "中文"),
};

/// English region names, keyed by region subtag.
static REGION_NAMES: phf::Map<&'static str, &'static str> = phf_map! {
    "419" => "Latin America",
    "AR" => "Argentina",
    "AT" => "Austria",
    "BE" => "Belgium",
    "BR" => "Brazil",
    "CA" => "Canada",
    "CH" => "Switzerland",
    "CN" => "China",
    "DE" => "Germany",
    "ES" => "Spain",
    "FR" => "France",
    "GB" => "United Kingdom",
    "HK" => "Hong Kong",
    "IN" => "India",
    "IT" => "Italy",
    "JP" => "Japan",
    "KR" => "South Korea",
    "MX" => "Mexico",
    "NL" => "Netherlands",
    "PT" => "Portugal",
    "SA" => "Saudi Arabia",
    "TW" => "Taiwan",
    "US" => "United States",
};

/// A parsed IETF language tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LocaleInfo(LanguageIdentifier);

impl LocaleInfo {
    /// Parse an IETF tag such as `ja`, `es-ES` or `zh-Hant-TW`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTag`] for empty or malformed input.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid_tag(text, "empty tag"));
        }
        trimmed
            .parse::<LanguageIdentifier>()
            .map(Self)
            .map_err(|e| Error::invalid_tag(text, e.to_string()))
    }

    /// The undetermined language (`und`).
    pub fn undetermined() -> Self {
        Self::default()
    }

    /// Whether this is the undetermined language.
    pub fn is_undetermined(&self) -> bool {
        self.language() == "und"
    }

    /// The bare language subtag (e.g. `es` for `es-ES`).
    pub fn language(&self) -> &str {
        self.0.language.as_str()
    }

    /// The tag with script, region and variants removed.
    pub fn base(&self) -> LocaleInfo {
        Self(LanguageIdentifier::from_parts(
            self.0.language,
            None,
            None,
            &[],
        ))
    }

    /// Whether both tags share the same base language.
    pub fn same_base(&self, other: &LocaleInfo) -> bool {
        self.0.language == other.0.language
    }

    /// The region subtag, if any (e.g. `ES`).
    pub fn region_code(&self) -> Option<&str> {
        self.0.region.as_ref().map(|r| r.as_str())
    }

    /// English name of the base language, or the bare code when unknown.
    pub fn english_name(&self) -> String {
        LANGUAGE_NAMES
            .get(self.language())
            .map(|(english, _)| english.to_string())
            .unwrap_or_else(|| self.language().to_string())
    }

    /// Native (self-localized) name of the base language.
    pub fn native_name(&self) -> String {
        LANGUAGE_NAMES
            .get(self.language())
            .map(|(_, native)| native.to_string())
            .unwrap_or_else(|| self.language().to_string())
    }

    /// English name of the region, if the tag has one.
    pub fn region_english_name(&self) -> Option<String> {
        let code = self.region_code()?;
        Some(
            REGION_NAMES
                .get(code)
                .map(|name| name.to_string())
                .unwrap_or_else(|| code.to_string()),
        )
    }
}

impl fmt::Display for LocaleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LocaleInfo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for LocaleInfo {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LocaleInfo {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
