//! This module handles the gallery configuration: slot counts, filename
//! patterns, extension candidate lists, and the asset root, with loading and
//! saving to a `gallery.toml` file.
//!
//! Counts bound the slot enumeration; the patterns must contain the `{n}`
//! placeholder that the resolver substitutes with the slot number. Extension
//! candidates are tried in list order, so the list also encodes tie-break
//! priority when several extensions exist for the same slot.
//!
//! # Examples
//!
//! ```no_run
//! use memoria::config::{self, GalleryConfig};
//!
//! // Load existing configuration (falls back to defaults when absent)
//! let mut config = config::load().unwrap_or_default();
//!
//! // Point the gallery at a different asset folder
//! config.asset_root = "media/".to_string();
//!
//! config::save(&config).expect("Failed to save config");
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "gallery.toml";
const APP_NAME: &str = "Memoria";

/// Placeholder substituted with the slot number in filename patterns.
pub const SLOT_PLACEHOLDER: &str = "{n}";

pub const DEFAULT_PHOTO_COUNT: u32 = 50;
pub const DEFAULT_VIDEO_COUNT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// Number of photo slots to enumerate (`1..=photo_count`).
    #[serde(default = "default_photo_count")]
    pub photo_count: u32,
    /// Number of video slots to enumerate (`1..=video_count`).
    #[serde(default = "default_video_count")]
    pub video_count: u32,
    /// Prefix prepended to every resolved filename (folder path or URL base).
    #[serde(default = "default_asset_root")]
    pub asset_root: String,
    /// Photo filename pattern; `{n}` is replaced with the slot number.
    #[serde(default = "default_photo_pattern")]
    pub photo_pattern: String,
    /// Video filename pattern; `{n}` is replaced with the slot number.
    #[serde(default = "default_video_pattern")]
    pub video_pattern: String,
    /// Photo extensions tried in order, dot-prefixed (e.g. `".jpg"`).
    #[serde(default = "default_photo_extensions")]
    pub photo_extensions: Vec<String>,
    /// Video extensions tried in order, dot-prefixed (e.g. `".mp4"`).
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,
    /// Optional upper bound on a single probe attempt, in seconds.
    /// A probe that exceeds it counts as "unresolved", never as success.
    #[serde(default)]
    pub probe_timeout_secs: Option<u64>,
}

fn default_photo_count() -> u32 {
    DEFAULT_PHOTO_COUNT
}

fn default_video_count() -> u32 {
    DEFAULT_VIDEO_COUNT
}

fn default_asset_root() -> String {
    "images/".to_string()
}

fn default_photo_pattern() -> String {
    "photo_{n}".to_string()
}

fn default_video_pattern() -> String {
    "video_{n}".to_string()
}

fn default_photo_extensions() -> Vec<String> {
    // Uppercase variants included: asset hosts are often case-sensitive.
    [
        ".jpg", ".jpeg", ".heic", ".png", ".webp", ".gif", ".HEIC", ".JPG", ".JPEG", ".PNG",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect()
}

fn default_video_extensions() -> Vec<String> {
    [".mp4", ".mov", ".MP4", ".MOV", ".webm", ".avi"]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            photo_count: default_photo_count(),
            video_count: default_video_count(),
            asset_root: default_asset_root(),
            photo_pattern: default_photo_pattern(),
            video_pattern: default_video_pattern(),
            photo_extensions: default_photo_extensions(),
            video_extensions: default_video_extensions(),
            probe_timeout_secs: None,
        }
    }
}

impl GalleryConfig {
    /// Checks the configuration for structural errors before any probing
    /// starts.
    ///
    /// A misconfigured pattern or extension list would make every slot
    /// resolve as absent and produce a silently empty gallery, which is
    /// worse than an explicit failure. Counts of zero are valid: an empty
    /// batch simply contributes no slots.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a pattern is missing the `{n}`
    /// placeholder, or an extension list is empty or contains entries
    /// without a leading dot while its slot count is non-zero.
    pub fn validate(&self) -> Result<()> {
        if !self.photo_pattern.contains(SLOT_PLACEHOLDER) {
            return Err(Error::Config(format!(
                "photo pattern '{}' is missing the {} placeholder",
                self.photo_pattern, SLOT_PLACEHOLDER
            )));
        }
        if !self.video_pattern.contains(SLOT_PLACEHOLDER) {
            return Err(Error::Config(format!(
                "video pattern '{}' is missing the {} placeholder",
                self.video_pattern, SLOT_PLACEHOLDER
            )));
        }
        if self.photo_count > 0 {
            validate_extensions("photo", &self.photo_extensions)?;
        }
        if self.video_count > 0 {
            validate_extensions("video", &self.video_extensions)?;
        }
        Ok(())
    }

    /// Returns the configured probe timeout as a [`Duration`], if set.
    #[must_use]
    pub fn probe_timeout(&self) -> Option<Duration> {
        self.probe_timeout_secs.map(Duration::from_secs)
    }
}

fn validate_extensions(kind: &str, extensions: &[String]) -> Result<()> {
    if extensions.is_empty() {
        return Err(Error::Config(format!(
            "{} extension list is empty but the {} count is non-zero",
            kind, kind
        )));
    }
    for ext in extensions {
        if !ext.starts_with('.') {
            return Err(Error::Config(format!(
                "{} extension '{}' must start with a dot",
                kind, ext
            )));
        }
    }
    Ok(())
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<GalleryConfig> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(GalleryConfig::default())
}

pub fn save(config: &GalleryConfig) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Loads and validates a configuration file.
///
/// Unlike a preferences file, a malformed gallery configuration is rejected
/// rather than replaced with defaults: every slot would otherwise resolve as
/// absent and the gallery would come up empty with no indication why.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, [`Error::Config`] if it
/// cannot be parsed or fails [`GalleryConfig::validate`].
pub fn load_from_path(path: &Path) -> Result<GalleryConfig> {
    let content = fs::read_to_string(path)?;
    let config: GalleryConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

pub fn save_to_path(config: &GalleryConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_fields() {
        let config = GalleryConfig {
            photo_count: 3,
            video_count: 1,
            asset_root: "media/".to_string(),
            photo_pattern: "pic_{n}".to_string(),
            video_pattern: "clip_{n}".to_string(),
            photo_extensions: vec![".jpg".to_string(), ".png".to_string()],
            video_extensions: vec![".mp4".to_string()],
            probe_timeout_secs: Some(5),
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("gallery.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_rejects_invalid_toml() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("gallery.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        match load_from_path(&config_path) {
            Err(Error::Config(_)) => {}
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn save_to_path_creates_parent_directories() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("deep").join("path").join("gallery.toml");

        save_to_path(&GalleryConfig::default(), &config_path).expect("save should create directories");
        assert!(config_path.exists());
    }

    #[test]
    fn default_config_is_valid() {
        let config = GalleryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.photo_count, DEFAULT_PHOTO_COUNT);
        assert_eq!(config.video_count, DEFAULT_VIDEO_COUNT);
        assert!(config.probe_timeout().is_none());
    }

    #[test]
    fn validate_rejects_pattern_without_placeholder() {
        let config = GalleryConfig {
            photo_pattern: "photo_1".to_string(),
            ..GalleryConfig::default()
        };
        match config.validate() {
            Err(Error::Config(message)) => assert!(message.contains("{n}")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_empty_extension_list() {
        let config = GalleryConfig {
            video_extensions: Vec::new(),
            ..GalleryConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_allows_empty_extensions_when_count_is_zero() {
        let config = GalleryConfig {
            video_count: 0,
            video_extensions: Vec::new(),
            ..GalleryConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_extension_without_dot() {
        let config = GalleryConfig {
            photo_extensions: vec!["jpg".to_string()],
            ..GalleryConfig::default()
        };
        match config.validate() {
            Err(Error::Config(message)) => assert!(message.contains("dot")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn zero_counts_are_valid() {
        let config = GalleryConfig {
            photo_count: 0,
            video_count: 0,
            ..GalleryConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn probe_timeout_converts_to_duration() {
        let config = GalleryConfig {
            probe_timeout_secs: Some(3),
            ..GalleryConfig::default()
        };
        assert_eq!(config.probe_timeout(), Some(Duration::from_secs(3)));
    }
}
