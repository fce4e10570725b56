// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the editor. Constants are organized by category.
//!
//! # Categories
//!
//! - **History**: Undo/redo stack capacity
//! - **Adjustments**: Slider debounce timing
//! - **Export**: Default MIME type, quality and font-size calibration
//! - **Limits**: Maximum decoded image size
//! - **Text / Draw**: Default overlay styling

// ==========================================================================
// History Defaults
// ==========================================================================

/// Default number of rendered snapshots kept for undo/redo.
pub const DEFAULT_HISTORY_SIZE: usize = 10;

/// Minimum history size (one entry means "no undo").
pub const MIN_HISTORY_SIZE: usize = 1;

/// Maximum history size. Each entry is a full RGBA snapshot.
pub const MAX_HISTORY_SIZE: usize = 100;

// ==========================================================================
// Adjustment Defaults
// ==========================================================================

/// Quiet period after the last slider tick before the change is committed.
pub const DEFAULT_COMMIT_DEBOUNCE_MS: u64 = 500;

/// Minimum commit debounce.
pub const MIN_COMMIT_DEBOUNCE_MS: u64 = 10;

/// Maximum commit debounce.
pub const MAX_COMMIT_DEBOUNCE_MS: u64 = 5_000;

// ==========================================================================
// Export Defaults
// ==========================================================================

/// Default export MIME type.
pub const DEFAULT_EXPORT_FORMAT: &str = "image/jpeg";

/// Default export quality (0.0 to 1.0).
pub const DEFAULT_EXPORT_QUALITY: f32 = 0.92;

/// Font-size multiplier applied when baking text at export time and no
/// preview display width is known. Calibrated against a preview that shows
/// the image at roughly 55% of its natural width.
pub const DEFAULT_EXPORT_FONT_SCALE: f32 = 1.8;

/// Minimum font-size multiplier.
pub const MIN_EXPORT_FONT_SCALE: f32 = 0.1;

/// Maximum font-size multiplier.
pub const MAX_EXPORT_FONT_SCALE: f32 = 20.0;

// ==========================================================================
// Limit Defaults
// ==========================================================================

/// Largest accepted width or height of a decoded image.
pub const DEFAULT_MAX_DIMENSION: u32 = 16_384;

/// Largest accepted pixel count of a decoded image (~100 MP).
pub const DEFAULT_MAX_PIXELS: u64 = 100_000_000;

// ==========================================================================
// Text Overlay Defaults
// ==========================================================================

/// Default text overlay font size in preview pixels.
pub const DEFAULT_TEXT_FONT_SIZE: f32 = 24.0;

/// Default text overlay font family.
pub const DEFAULT_TEXT_FONT_FAMILY: &str = "sans-serif";

/// Default text overlay color.
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";

/// Drop shadow offset in pixels (both axes).
pub const DEFAULT_TEXT_SHADOW_OFFSET: f32 = 2.0;

/// Drop shadow blur radius in pixels.
pub const DEFAULT_TEXT_SHADOW_BLUR: f32 = 4.0;

/// Drop shadow opacity (0.0 to 1.0).
pub const DEFAULT_TEXT_SHADOW_OPACITY: f32 = 0.5;

// ==========================================================================
// Draw Defaults
// ==========================================================================

/// Default freehand stroke width in pixels.
pub const DEFAULT_STROKE_WIDTH: f32 = 4.0;

/// Default freehand stroke color.
pub const DEFAULT_STROKE_COLOR: &str = "#ff3b30";

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_HISTORY_SIZE > 0);
    assert!(MAX_HISTORY_SIZE >= MIN_HISTORY_SIZE);
    assert!(DEFAULT_HISTORY_SIZE >= MIN_HISTORY_SIZE);
    assert!(DEFAULT_HISTORY_SIZE <= MAX_HISTORY_SIZE);

    assert!(MIN_COMMIT_DEBOUNCE_MS > 0);
    assert!(MAX_COMMIT_DEBOUNCE_MS >= MIN_COMMIT_DEBOUNCE_MS);
    assert!(DEFAULT_COMMIT_DEBOUNCE_MS >= MIN_COMMIT_DEBOUNCE_MS);
    assert!(DEFAULT_COMMIT_DEBOUNCE_MS <= MAX_COMMIT_DEBOUNCE_MS);

    assert!(DEFAULT_EXPORT_QUALITY > 0.0);
    assert!(DEFAULT_EXPORT_QUALITY <= 1.0);
    assert!(MIN_EXPORT_FONT_SCALE > 0.0);
    assert!(DEFAULT_EXPORT_FONT_SCALE >= MIN_EXPORT_FONT_SCALE);
    assert!(DEFAULT_EXPORT_FONT_SCALE <= MAX_EXPORT_FONT_SCALE);

    assert!(DEFAULT_MAX_DIMENSION > 0);
    assert!(DEFAULT_MAX_PIXELS > 0);

    assert!(DEFAULT_TEXT_FONT_SIZE > 0.0);
    assert!(DEFAULT_TEXT_SHADOW_OPACITY >= 0.0);
    assert!(DEFAULT_TEXT_SHADOW_OPACITY <= 1.0);
    assert!(DEFAULT_STROKE_WIDTH > 0.0);
};
