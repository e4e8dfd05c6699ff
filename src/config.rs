//! Gallery configuration module.
//!
//! Handles loading, validating, and merging the `config.toml` that sits in the
//! collection root. Stock defaults are serialized to a TOML table, the user's
//! file is deep-merged on top, and the result is deserialized and validated.
//!
//! ## Config File Location
//!
//! ```text
//! public/photos/
//! ├── config.toml      # Optional; overrides stock defaults
//! ├── cover.jpg
//! └── Fauna/
//!     └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! title = "Photo Gallery"
//! description = "A modern photo gallery"
//! dark_mode = true
//! base_path = "/"           # Prefix the site is served under
//! photos_dir = "photos"     # Directory name of the collection under base_path
//!
//! [colors]
//! primary = "#ffffff"
//! secondary = "#888888"
//! background = "#0d0d0d"
//!
//! [navigation]
//! enable_swipe = true
//! enable_click_navigation = true
//!
//! [photos]
//! quality = "auto"          # auto | low | medium | high
//! thumbnail_size = "medium" # small | medium | large
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! [navigation]
//! enable_swipe = false
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the collection root.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Site title shown in the header.
    pub title: String,
    pub description: String,
    pub dark_mode: bool,
    /// URL prefix the gallery is served under. Starts and ends with `/`.
    pub base_path: String,
    /// Name of the collection directory below `base_path`.
    pub photos_dir: String,
    pub colors: ColorConfig,
    /// Which pointer interactions the viewer honours.
    pub navigation: NavigationConfig,
    pub photos: PhotosConfig,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            title: "Photo Gallery".to_string(),
            description: "A modern photo gallery".to_string(),
            dark_mode: true,
            base_path: "/".to_string(),
            photos_dir: "photos".to_string(),
            colors: ColorConfig::default(),
            navigation: NavigationConfig::default(),
            photos: PhotosConfig::default(),
        }
    }
}

impl GalleryConfig {
    /// Validate config values are well formed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("colors.primary", &self.colors.primary),
            ("colors.secondary", &self.colors.secondary),
            ("colors.background", &self.colors.background),
        ] {
            if !is_hex_color(value) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be #rgb or #rrggbb, got {value:?}"
                )));
            }
        }
        if !self.base_path.starts_with('/') || !self.base_path.ends_with('/') {
            return Err(ConfigError::Validation(
                "base_path must start and end with '/'".into(),
            ));
        }
        if self.photos_dir.is_empty() || self.photos_dir.contains('/') {
            return Err(ConfigError::Validation(
                "photos_dir must be a single non-empty directory name".into(),
            ));
        }
        Ok(())
    }

    /// Public URL of a photo path under this gallery's prefix.
    pub fn photo_url(&self, photo_path: &str) -> String {
        crate::index::photo_url(&self.base_path, &self.photos_dir, photo_path)
    }
}

fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => {
            matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Gallery colour scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub primary: String,
    pub secondary: String,
    pub background: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            primary: "#ffffff".to_string(),
            secondary: "#888888".to_string(),
            background: "#0d0d0d".to_string(),
        }
    }
}

/// Pointer interaction switches for the viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigationConfig {
    /// Horizontal drags past the threshold step photos.
    pub enable_swipe: bool,
    /// Clicks in the outer zones step photos.
    pub enable_click_navigation: bool,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            enable_swipe: true,
            enable_click_navigation: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    Auto,
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailSize {
    Small,
    #[default]
    Medium,
    Large,
}

/// Photo presentation preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhotosConfig {
    pub quality: Quality,
    pub thumbnail_size: ThumbnailSize,
}

// =============================================================================
// Loading
// =============================================================================

/// Read `config.toml` from the collection root and resolve it into a
/// [`GalleryConfig`].
///
/// The user's keys are laid over the defaults table by table, so a file that
/// sets only `[navigation] enable_swipe` keeps every other default. No file
/// means the defaults as they are. Malformed TOML, unknown keys and values
/// that fail [`GalleryConfig::validate`] are errors.
pub fn load_config(root: &Path) -> Result<GalleryConfig, ConfigError> {
    let mut table = defaults_table();
    match fs::read_to_string(root.join(CONFIG_FILE)) {
        Ok(content) => overlay(&mut table, toml::from_str(&content)?),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    let config: GalleryConfig = table.try_into()?;
    config.validate()?;
    Ok(config)
}

/// The defaults as a TOML table, the bottom layer under the user's file.
fn defaults_table() -> toml::Value {
    toml::Value::try_from(GalleryConfig::default()).expect("default config must serialize")
}

/// Write `user` into `base` in place. Sections recurse key by key; any other
/// value (including a scalar where `base` has a section) replaces what was
/// there.
fn overlay(base: &mut toml::Value, user: toml::Value) {
    match (base, user) {
        (toml::Value::Table(section), toml::Value::Table(user_section)) => {
            for (key, value) in user_section {
                match section.get_mut(&key) {
                    Some(existing) => overlay(existing, value),
                    None => {
                        section.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Photo Gallery Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the root of the photo collection.
# Unknown keys will cause an error.

title = "Photo Gallery"
description = "A modern photo gallery"
dark_mode = true

# URL prefix the gallery is served under. Must start and end with "/".
base_path = "/"

# Directory name of the collection below base_path. Photo URLs are
# {base_path}{photos_dir}/{folder}/{file}.
photos_dir = "photos"

# ---------------------------------------------------------------------------
# Colors (#rgb or #rrggbb)
# ---------------------------------------------------------------------------
[colors]
primary = "#ffffff"
secondary = "#888888"
background = "#0d0d0d"

# ---------------------------------------------------------------------------
# Viewer navigation
# ---------------------------------------------------------------------------
[navigation]
# Horizontal drags longer than 50 units step to the next/previous photo.
enable_swipe = true

# Clicks in the left/right 30% of the viewer step to the previous/next photo.
enable_click_navigation = true

# ---------------------------------------------------------------------------
# Photos
# ---------------------------------------------------------------------------
[photos]
# auto | low | medium | high
quality = "auto"

# small | medium | large
thumbnail_size = "medium"
"##
}
