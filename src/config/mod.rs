pub use tf_core::config::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "TRACKFORGE_CONFIG";

/// Locations searched, in order, when no explicit file is given.
const DEFAULT_PATHS: &[&str] = &[
    "./trackforge.toml",
    "~/.config/trackforge/config.toml",
    "/etc/trackforge/config.toml",
];

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .validate()
        .with_context(|| format!("Invalid config file: {:?}", path))?;

    Ok(config)
}

/// The file that [`load_config_or_default`] would read, if any.
///
/// An explicit path wins, then `$TRACKFORGE_CONFIG`, then the first existing
/// default location.
pub fn resolve_config_path(custom_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = custom_path {
        return Some(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    DEFAULT_PATHS
        .iter()
        .map(|p| PathBuf::from(shellexpand::tilde(p).as_ref()))
        .find(|p| p.exists())
}

/// Load config from the resolved location or return the default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    match resolve_config_path(custom_path) {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            load_config(&path)
        }
        None => {
            tracing::debug!("no config file found, using defaults");
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    fn parse_full_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trackforge.toml");
        fs::write(
            &path,
            r#"
work_dir = "/tmp"

[selection]
original_language = "ja"
audio_languages = ["ja", "es-ES"]
main_language = "es-ES"

[[selection.delays]]
language = "es-ES"
ms = 6000

[naming]
origin = "BDRip"
authors = ["Alice"]

[normalize]
undesired = ["FLAC", "TRUEHD"]

[tools]
ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.selection.audio_languages.len(), 2);
        assert_eq!(config.selection.main_language.to_string(), "es-ES");
        assert_eq!(config.selection.delays[0].ms, 6000);
        assert_eq!(config.naming.origin.as_deref(), Some("BDRip"));
        assert_eq!(config.naming.authors, vec!["Alice"]);
        assert_eq!(config.normalize.undesired, vec!["FLAC", "TRUEHD"]);
        assert_eq!(config.normalize.encoder, "eac3");
        assert_eq!(
            config.tools.ffmpeg_path.as_deref(),
            Some(Path::new("/opt/ffmpeg/bin/ffmpeg"))
        );
        assert_eq!(config.work_dir.as_deref(), Some(Path::new("/tmp")));
    }

    #[test]
    fn invalid_tag_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[selection]\nmain_language = \"not a tag!\"\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse"));
    }

    #[test]
    fn validation_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.toml");
        fs::write(&path, "[selection]\naudio_languages = []\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("audio_languages"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_config(Path::new("/nonexistent/trackforge.toml")).is_err());
    }

    #[test]
    #[serial]
    fn env_var_selects_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[naming]\norigin = \"HDTV\"\n").unwrap();

        std::env::set_var(CONFIG_ENV, &path);
        let resolved = resolve_config_path(None);
        let config = load_config_or_default(None);
        std::env::remove_var(CONFIG_ENV);

        assert_eq!(resolved, Some(path));
        assert_eq!(config.unwrap().naming.origin.as_deref(), Some("HDTV"));
    }

    #[test]
    #[serial]
    fn explicit_path_beats_env_var() {
        std::env::set_var(CONFIG_ENV, "/nonexistent/env.toml");
        let resolved = resolve_config_path(Some(Path::new("/explicit.toml")));
        std::env::remove_var(CONFIG_ENV);
        assert_eq!(resolved, Some(PathBuf::from("/explicit.toml")));
    }
}
