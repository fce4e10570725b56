// SPDX-License-Identifier: MPL-2.0
//! Editor configuration, loaded from and saved to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[history]` - Undo/redo capacity
//! - `[adjustments]` - Slider commit debounce
//! - `[export]` - Default format, quality and text calibration
//! - `[limits]` - Maximum accepted image size
//! - `[text]` - Default text overlay style and drop shadow
//! - `[draw]` - Default freehand stroke style
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with an explicit path
//! 2. Set `TESTIMONIAL_EDITOR_CONFIG_DIR` environment variable
//! 3. Falls back to the platform-specific config directory
//!
//! Missing fields take their default. Out-of-range values are clamped by
//! [`Config::sanitized`] rather than rejected.
//!
//! # Examples
//!
//! ```no_run
//! use testimonial_editor::config;
//!
//! let (mut config, _warning) = config::load();
//! config.history.max_size = 20;
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;
pub mod paths;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// Undo/redo history settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryConfig {
    /// Maximum number of rendered snapshots kept.
    #[serde(default = "default_history_size")]
    pub max_size: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_HISTORY_SIZE,
        }
    }
}

/// Live adjustment settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdjustmentsConfig {
    /// Quiet period in milliseconds before a slider drag is committed to history.
    #[serde(default = "default_commit_debounce_ms")]
    pub commit_debounce_ms: u64,
}

impl Default for AdjustmentsConfig {
    fn default() -> Self {
        Self {
            commit_debounce_ms: DEFAULT_COMMIT_DEBOUNCE_MS,
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportConfig {
    /// Default MIME type (e.g. `image/jpeg`).
    #[serde(default = "default_export_format")]
    pub format: String,

    /// Default quality (0.0 to 1.0), used by lossy formats only.
    #[serde(default = "default_export_quality")]
    pub quality: f32,

    /// Font-size multiplier for baked text when the preview width is unknown.
    #[serde(default = "default_export_font_scale")]
    pub font_scale: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_EXPORT_FORMAT.to_string(),
            quality: DEFAULT_EXPORT_QUALITY,
            font_scale: DEFAULT_EXPORT_FONT_SCALE,
        }
    }
}

/// Decode limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LimitsConfig {
    /// Largest accepted width or height.
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,

    /// Largest accepted pixel count.
    #[serde(default = "default_max_pixels")]
    pub max_pixels: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

/// Default text overlay style.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextConfig {
    #[serde(default = "default_text_font_size")]
    pub font_size: f32,

    #[serde(default = "default_text_font_family")]
    pub font_family: String,

    #[serde(default = "default_text_color")]
    pub color: String,

    /// Drop shadow offset in pixels.
    #[serde(default = "default_text_shadow_offset")]
    pub shadow_offset: f32,

    /// Drop shadow blur radius in pixels.
    #[serde(default = "default_text_shadow_blur")]
    pub shadow_blur: f32,

    /// Drop shadow opacity (0.0 to 1.0).
    #[serde(default = "default_text_shadow_opacity")]
    pub shadow_opacity: f32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_TEXT_FONT_SIZE,
            font_family: DEFAULT_TEXT_FONT_FAMILY.to_string(),
            color: DEFAULT_TEXT_COLOR.to_string(),
            shadow_offset: DEFAULT_TEXT_SHADOW_OFFSET,
            shadow_blur: DEFAULT_TEXT_SHADOW_BLUR,
            shadow_opacity: DEFAULT_TEXT_SHADOW_OPACITY,
        }
    }
}

/// Default freehand stroke style.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrawConfig {
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,

    #[serde(default = "default_stroke_color")]
    pub color: String,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            stroke_width: DEFAULT_STROKE_WIDTH,
            color: DEFAULT_STROKE_COLOR.to_string(),
        }
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Editor configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub adjustments: AdjustmentsConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub limits: LimitsConfig,

    #[serde(default)]
    pub text: TextConfig,

    #[serde(default)]
    pub draw: DrawConfig,
}

impl Config {
    /// Returns a copy with every numeric field clamped to its valid range.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.history.max_size = self
            .history
            .max_size
            .clamp(MIN_HISTORY_SIZE, MAX_HISTORY_SIZE);
        self.adjustments.commit_debounce_ms = self
            .adjustments
            .commit_debounce_ms
            .clamp(MIN_COMMIT_DEBOUNCE_MS, MAX_COMMIT_DEBOUNCE_MS);
        self.export.quality = clamp_or(self.export.quality, 0.0, 1.0, DEFAULT_EXPORT_QUALITY);
        self.export.font_scale = clamp_or(
            self.export.font_scale,
            MIN_EXPORT_FONT_SCALE,
            MAX_EXPORT_FONT_SCALE,
            DEFAULT_EXPORT_FONT_SCALE,
        );
        self.limits.max_dimension = self.limits.max_dimension.max(1);
        self.limits.max_pixels = self.limits.max_pixels.max(1);
        self.text.font_size = clamp_or(self.text.font_size, 1.0, 1000.0, DEFAULT_TEXT_FONT_SIZE);
        self.text.shadow_opacity = clamp_or(
            self.text.shadow_opacity,
            0.0,
            1.0,
            DEFAULT_TEXT_SHADOW_OPACITY,
        );
        self.text.shadow_blur = self.text.shadow_blur.max(0.0);
        self.draw.stroke_width = clamp_or(self.draw.stroke_width, 0.5, 500.0, DEFAULT_STROKE_WIDTH);
        self
    }
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_history_size() -> usize {
    DEFAULT_HISTORY_SIZE
}

fn default_commit_debounce_ms() -> u64 {
    DEFAULT_COMMIT_DEBOUNCE_MS
}

fn default_export_format() -> String {
    DEFAULT_EXPORT_FORMAT.to_string()
}

fn default_export_quality() -> f32 {
    DEFAULT_EXPORT_QUALITY
}

fn default_export_font_scale() -> f32 {
    DEFAULT_EXPORT_FONT_SCALE
}

fn default_max_dimension() -> u32 {
    DEFAULT_MAX_DIMENSION
}

fn default_max_pixels() -> u64 {
    DEFAULT_MAX_PIXELS
}

fn default_text_font_size() -> f32 {
    DEFAULT_TEXT_FONT_SIZE
}

fn default_text_font_family() -> String {
    DEFAULT_TEXT_FONT_FAMILY.to_string()
}

fn default_text_color() -> String {
    DEFAULT_TEXT_COLOR.to_string()
}

fn default_text_shadow_offset() -> f32 {
    DEFAULT_TEXT_SHADOW_OFFSET
}

fn default_text_shadow_blur() -> f32 {
    DEFAULT_TEXT_SHADOW_BLUR
}

fn default_text_shadow_opacity() -> f32 {
    DEFAULT_TEXT_SHADOW_OPACITY
}

fn default_stroke_width() -> f32 {
    DEFAULT_STROKE_WIDTH
}

fn default_stroke_color() -> String {
    DEFAULT_STROKE_COLOR.to_string()
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning message key explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "falling back to default config");
                    return (
                        Config::default(),
                        Some("notification-config-load-error".to_string()),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`] if it
/// is not valid TOML for this schema.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config.sanitized())
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path, creating parent directories.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let mut config = Config::default();
        config.history.max_size = 25;
        config.export.format = "image/png".to_string();
        config.export.font_scale = 2.5;
        config.text.font_family = "serif".to_string();

        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        match load_from_path(&config_path) {
            Err(Error::Config(_)) => {}
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn load_with_override_falls_back_with_warning_on_invalid_file() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "[history\nmax_size = ")
            .expect("failed to write invalid toml");

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));

        assert_eq!(config, Config::default());
        assert_eq!(warning.as_deref(), Some("notification-config-load-error"));
    }

    #[test]
    fn load_with_override_missing_file_returns_defaults_without_warning() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert!(warning.is_none());
    }

    #[test]
    fn partial_sections_fill_missing_fields_with_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "[export]\nquality = 0.5\n").expect("failed to write toml");

        let loaded = load_from_path(&config_path).expect("partial config should load");

        assert_relative_eq!(loaded.export.quality, 0.5);
        assert_eq!(loaded.export.format, DEFAULT_EXPORT_FORMAT);
        assert_eq!(loaded.history.max_size, DEFAULT_HISTORY_SIZE);
    }

    #[test]
    fn sanitized_clamps_out_of_range_values() {
        let mut config = Config::default();
        config.history.max_size = 0;
        config.export.quality = 4.0;
        config.export.font_scale = f32::NAN;
        config.adjustments.commit_debounce_ms = 1;

        let sanitized = config.sanitized();

        assert_eq!(sanitized.history.max_size, MIN_HISTORY_SIZE);
        assert_relative_eq!(sanitized.export.quality, 1.0);
        assert_relative_eq!(sanitized.export.font_scale, DEFAULT_EXPORT_FONT_SCALE);
        assert_eq!(sanitized.adjustments.commit_debounce_ms, MIN_COMMIT_DEBOUNCE_MS);
    }

    #[test]
    fn save_to_path_creates_parent_directories() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("deep").join("path").join("settings.toml");

        save_to_path(&Config::default(), &config_path).expect("save should create directories");
        assert!(config_path.exists());
    }
}
