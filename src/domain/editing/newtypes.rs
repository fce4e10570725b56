// SPDX-License-Identifier: MPL-2.0
//! Editing newtypes.
//!
//! Every adjustment field is a value object that is always within its valid
//! range. Non-finite input collapses to the neutral value so a stray `NaN`
//! from a slider can never reach the pixel pipeline.

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

// =============================================================================
// Brightness
// =============================================================================

/// Brightness bounds (50% to 150%).
pub mod brightness_bounds {
    /// Minimum brightness percentage.
    pub const MIN: f32 = 50.0;
    /// Maximum brightness percentage.
    pub const MAX: f32 = 150.0;
    /// Neutral brightness percentage.
    pub const DEFAULT: f32 = 100.0;
}

/// Brightness percentage, guaranteed to be within 50–150 (100 = unchanged).
///
/// The pixel pipeline adds `255 * (value - 100) / 100` to every color channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brightness(f32);

impl Brightness {
    /// Creates a new brightness value, clamping to the valid range.
    #[must_use]
    pub fn new(percent: f32) -> Self {
        let percent = finite_or(percent, brightness_bounds::DEFAULT);
        Self(percent.clamp(brightness_bounds::MIN, brightness_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Channel offset in 8-bit units.
    #[must_use]
    pub fn channel_offset(self) -> f32 {
        255.0 * (self.0 - brightness_bounds::DEFAULT) / 100.0
    }

    #[must_use]
    pub fn is_neutral(self) -> bool {
        (self.0 - brightness_bounds::DEFAULT).abs() < f32::EPSILON
    }

    #[must_use]
    pub fn is_min(self) -> bool {
        self.0 <= brightness_bounds::MIN
    }

    #[must_use]
    pub fn is_max(self) -> bool {
        self.0 >= brightness_bounds::MAX
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self(brightness_bounds::DEFAULT)
    }
}

// =============================================================================
// Contrast
// =============================================================================

/// Contrast bounds (50% to 150%).
pub mod contrast_bounds {
    /// Minimum contrast percentage.
    pub const MIN: f32 = 50.0;
    /// Maximum contrast percentage.
    pub const MAX: f32 = 150.0;
    /// Neutral contrast percentage.
    pub const DEFAULT: f32 = 100.0;
}

/// Contrast percentage, guaranteed to be within 50–150 (100 = unchanged).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contrast(f32);

impl Contrast {
    /// Creates a new contrast value, clamping to the valid range.
    #[must_use]
    pub fn new(percent: f32) -> Self {
        let percent = finite_or(percent, contrast_bounds::DEFAULT);
        Self(percent.clamp(contrast_bounds::MIN, contrast_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns the contrast as a multiplier around mid-gray (100% → 1.0).
    #[must_use]
    pub fn as_factor(self) -> f32 {
        self.0 / 100.0
    }

    #[must_use]
    pub fn is_neutral(self) -> bool {
        (self.0 - contrast_bounds::DEFAULT).abs() < f32::EPSILON
    }

    #[must_use]
    pub fn is_min(self) -> bool {
        self.0 <= contrast_bounds::MIN
    }

    #[must_use]
    pub fn is_max(self) -> bool {
        self.0 >= contrast_bounds::MAX
    }
}

impl Default for Contrast {
    fn default() -> Self {
        Self(contrast_bounds::DEFAULT)
    }
}

// =============================================================================
// Saturation
// =============================================================================

/// Saturation bounds (0% to 200%).
pub mod saturation_bounds {
    /// Fully desaturated.
    pub const MIN: f32 = 0.0;
    /// Double saturation.
    pub const MAX: f32 = 200.0;
    /// Neutral saturation percentage.
    pub const DEFAULT: f32 = 100.0;
}

/// Saturation percentage, guaranteed to be within 0–200 (100 = unchanged).
///
/// Values below 100 blend toward luma, values above 100 push away from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Saturation(f32);

impl Saturation {
    /// Creates a new saturation value, clamping to the valid range.
    #[must_use]
    pub fn new(percent: f32) -> Self {
        let percent = finite_or(percent, saturation_bounds::DEFAULT);
        Self(percent.clamp(saturation_bounds::MIN, saturation_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Weight of the luma blend: `1 - value / 100`.
    #[must_use]
    pub fn luma_blend(self) -> f32 {
        1.0 - self.0 / 100.0
    }

    #[must_use]
    pub fn is_neutral(self) -> bool {
        (self.0 - saturation_bounds::DEFAULT).abs() < f32::EPSILON
    }

    #[must_use]
    pub fn is_min(self) -> bool {
        self.0 <= saturation_bounds::MIN
    }

    #[must_use]
    pub fn is_max(self) -> bool {
        self.0 >= saturation_bounds::MAX
    }
}

impl Default for Saturation {
    fn default() -> Self {
        Self(saturation_bounds::DEFAULT)
    }
}

// =============================================================================
// FilterIntensity
// =============================================================================

/// Filter intensity bounds (0% to 100%).
pub mod intensity_bounds {
    /// Filter has no visible effect.
    pub const MIN: f32 = 0.0;
    /// Filter fully applied.
    pub const MAX: f32 = 100.0;
    /// Default intensity.
    pub const DEFAULT: f32 = 100.0;
}

/// Blend weight between the unfiltered and the filtered pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterIntensity(f32);

impl FilterIntensity {
    /// Creates a new intensity, clamping to the valid range.
    #[must_use]
    pub fn new(percent: f32) -> Self {
        let percent = finite_or(percent, intensity_bounds::DEFAULT);
        Self(percent.clamp(intensity_bounds::MIN, intensity_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns the intensity as a 0.0–1.0 weight.
    #[must_use]
    pub fn as_weight(self) -> f32 {
        self.0 / 100.0
    }

    /// Returns whether the filter would leave pixels untouched.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 <= intensity_bounds::MIN
    }
}

impl Default for FilterIntensity {
    fn default() -> Self {
        Self(intensity_bounds::DEFAULT)
    }
}

// =============================================================================
// RotationDegrees
// =============================================================================

/// Rotation range. Values wrap instead of clamping.
pub mod rotation_bounds {
    /// Inclusive lower bound.
    pub const MIN: f32 = -180.0;
    /// Exclusive upper bound.
    pub const MAX: f32 = 180.0;
    /// No rotation.
    pub const DEFAULT: f32 = 0.0;
}

/// Free rotation angle in degrees, normalized into `[-180, 180)`.
///
/// # Example
///
/// ```ignore
/// assert_eq!(RotationDegrees::new(270.0).value(), -90.0);
/// assert_eq!(RotationDegrees::new(180.0).value(), -180.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationDegrees(f32);

impl RotationDegrees {
    /// Creates a new rotation, wrapping into `[-180, 180)`.
    #[must_use]
    pub fn new(degrees: f32) -> Self {
        let degrees = finite_or(degrees, rotation_bounds::DEFAULT);
        let wrapped = (degrees - rotation_bounds::MIN).rem_euclid(360.0) + rotation_bounds::MIN;
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        if wrapped >= rotation_bounds::MAX {
            Self(rotation_bounds::MIN)
        } else {
            Self(wrapped)
        }
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.abs() < f32::EPSILON
    }

    /// Returns the number of clockwise quarter turns when the angle is an
    /// exact multiple of 90°, `None` otherwise.
    #[must_use]
    pub fn quarter_turns(self) -> Option<u8> {
        let turns = self.0 / 90.0;
        if (turns - turns.round()).abs() > f32::EPSILON {
            return None;
        }
        #[allow(clippy::cast_possible_truncation)]
        let turns = (turns.round() as i32).rem_euclid(4);
        #[allow(clippy::cast_sign_loss)]
        Some(turns as u8)
    }
}

impl Default for RotationDegrees {
    fn default() -> Self {
        Self(rotation_bounds::DEFAULT)
    }
}

// =============================================================================
// ZoomPercent
// =============================================================================

/// Zoom bounds (50% to 300%).
pub mod zoom_bounds {
    /// Minimum zoom percentage.
    pub const MIN: f32 = 50.0;
    /// Maximum zoom percentage.
    pub const MAX: f32 = 300.0;
    /// No zoom.
    pub const DEFAULT: f32 = 100.0;
}

/// Centered zoom applied inside the pipeline, guaranteed to be within 50–300%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomPercent(f32);

impl ZoomPercent {
    /// Creates a new zoom value, clamping to the valid range.
    #[must_use]
    pub fn new(percent: f32) -> Self {
        let percent = finite_or(percent, zoom_bounds::DEFAULT);
        Self(percent.clamp(zoom_bounds::MIN, zoom_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns the zoom as a scale factor (100% → 1.0).
    #[must_use]
    pub fn as_factor(self) -> f32 {
        self.0 / 100.0
    }

    #[must_use]
    pub fn is_neutral(self) -> bool {
        (self.0 - zoom_bounds::DEFAULT).abs() < f32::EPSILON
    }

    #[must_use]
    pub fn is_min(self) -> bool {
        self.0 <= zoom_bounds::MIN
    }

    #[must_use]
    pub fn is_max(self) -> bool {
        self.0 >= zoom_bounds::MAX
    }
}

impl Default for ZoomPercent {
    fn default() -> Self {
        Self(zoom_bounds::DEFAULT)
    }
}

// =============================================================================
// Tests
// =============================================================================
