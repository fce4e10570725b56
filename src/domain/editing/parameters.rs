// SPDX-License-Identifier: MPL-2.0
//! The full set of adjustment parameters driving one pipeline run.

use super::newtypes::{
    Brightness, Contrast, FilterIntensity, RotationDegrees, Saturation, ZoomPercent,
};

/// Named color filter applied after the basic adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterKind {
    #[default]
    None,
    Grayscale,
    Sepia,
    Invert,
    HueRotate90,
    HueRotate180,
    HueRotate270,
    Warm,
    Cool,
    /// A filter name the engine does not know. Leaves pixels untouched.
    Unsupported,
}

impl FilterKind {
    /// All filters the engine can actually apply, in menu order.
    pub const ALL: [FilterKind; 9] = [
        FilterKind::None,
        FilterKind::Grayscale,
        FilterKind::Sepia,
        FilterKind::Invert,
        FilterKind::HueRotate90,
        FilterKind::HueRotate180,
        FilterKind::HueRotate270,
        FilterKind::Warm,
        FilterKind::Cool,
    ];

    /// Parses a filter name. Accepts kebab-case, snake_case and camelCase
    /// spellings; anything else maps to [`FilterKind::Unsupported`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let normalized: String = name
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "" | "none" => FilterKind::None,
            "grayscale" | "greyscale" => FilterKind::Grayscale,
            "sepia" => FilterKind::Sepia,
            "invert" => FilterKind::Invert,
            "huerotate90" => FilterKind::HueRotate90,
            "huerotate180" => FilterKind::HueRotate180,
            "huerotate270" => FilterKind::HueRotate270,
            "warm" => FilterKind::Warm,
            "cool" => FilterKind::Cool,
            _ => FilterKind::Unsupported,
        }
    }

    /// Canonical kebab-case name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::None => "none",
            FilterKind::Grayscale => "grayscale",
            FilterKind::Sepia => "sepia",
            FilterKind::Invert => "invert",
            FilterKind::HueRotate90 => "hue-rotate-90",
            FilterKind::HueRotate180 => "hue-rotate-180",
            FilterKind::HueRotate270 => "hue-rotate-270",
            FilterKind::Warm => "warm",
            FilterKind::Cool => "cool",
            FilterKind::Unsupported => "unsupported",
        }
    }

    /// Hue shift in degrees for the hue-rotate family.
    #[must_use]
    pub fn hue_shift(self) -> Option<f32> {
        match self {
            FilterKind::HueRotate90 => Some(90.0),
            FilterKind::HueRotate180 => Some(180.0),
            FilterKind::HueRotate270 => Some(270.0),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_none(self) -> bool {
        self == FilterKind::None
    }
}

/// One field change coming from a live slider or picker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdjustmentField {
    Brightness(f32),
    Contrast(f32),
    Saturation(f32),
    Filter(FilterKind),
    FilterIntensity(f32),
    Rotation(f32),
    Zoom(f32),
}

impl AdjustmentField {
    /// Field name, without the value.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            AdjustmentField::Brightness(_) => "brightness",
            AdjustmentField::Contrast(_) => "contrast",
            AdjustmentField::Saturation(_) => "saturation",
            AdjustmentField::Filter(_) => "filter",
            AdjustmentField::FilterIntensity(_) => "filter_intensity",
            AdjustmentField::Rotation(_) => "rotation",
            AdjustmentField::Zoom(_) => "zoom",
        }
    }
}

/// Complete adjustment state. `Default` is the neutral (no-op) state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AdjustmentParameters {
    pub brightness: Brightness,
    pub contrast: Contrast,
    pub saturation: Saturation,
    pub filter: FilterKind,
    pub filter_intensity: FilterIntensity,
    pub rotation: RotationDegrees,
    pub zoom: ZoomPercent,
}

impl AdjustmentParameters {
    /// Returns true when a pipeline run with these parameters is the identity.
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        self.basic_is_neutral()
            && !self.has_filter()
            && self.rotation.is_zero()
            && self.zoom.is_neutral()
    }

    /// Returns true when brightness, contrast and saturation are all neutral.
    #[must_use]
    pub fn basic_is_neutral(&self) -> bool {
        self.brightness.is_neutral() && self.contrast.is_neutral() && self.saturation.is_neutral()
    }

    /// Returns true when the filter stage would run.
    #[must_use]
    pub fn has_filter(&self) -> bool {
        !self.filter.is_none() && !self.filter_intensity.is_zero()
    }

    /// Restores every field to its neutral value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Applies a single field change, clamping through the field's newtype.
    pub fn set(&mut self, field: AdjustmentField) {
        match field {
            AdjustmentField::Brightness(v) => self.brightness = Brightness::new(v),
            AdjustmentField::Contrast(v) => self.contrast = Contrast::new(v),
            AdjustmentField::Saturation(v) => self.saturation = Saturation::new(v),
            AdjustmentField::Filter(kind) => self.filter = kind,
            AdjustmentField::FilterIntensity(v) => {
                self.filter_intensity = FilterIntensity::new(v);
            }
            AdjustmentField::Rotation(v) => self.rotation = RotationDegrees::new(v),
            AdjustmentField::Zoom(v) => self.zoom = ZoomPercent::new(v),
        }
    }

    /// Returns a copy with `field` applied.
    #[must_use]
    pub fn with(mut self, field: AdjustmentField) -> Self {
        self.set(field);
        self
    }
}
