// SPDX-License-Identifier: MPL-2.0
//! Named color filters.
//!
//! Every filter is a linear blend between the unmodified pixel and the
//! filtered value, weighted by the intensity. Hue rotation goes through
//! HSL here; the engine may first try an external transcoder and only use
//! [`rotate_hue`] as its fallback.

use super::adjust::{luma, to_channel};
use crate::domain::editing::{FilterIntensity, FilterKind};
use crate::error::{Error, Result};
use image_rs::RgbaImage;

/// Sepia matrix rows.
const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Per-channel shift of the warm filter. Cool uses the mirrored shift.
const WARM_SHIFT: [f32; 3] = [24.0, 8.0, -24.0];

/// Which implementation produced the filtered pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterPath {
    /// Nothing to do (`FilterKind::None` or zero intensity).
    Noop,
    /// Unknown filter; the buffer was left untouched.
    Skipped,
    /// In-process pixel implementation.
    Pixel,
    /// External hue transcoder.
    Delegated,
    /// The transcoder failed and the in-process path was used instead.
    Fallback { reason: String },
    /// Every path failed; the buffer kept its pre-filter pixels.
    Failed { reason: String },
}

impl FilterPath {
    /// Returns true when the result should be reported to the user.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            FilterPath::Fallback { .. } | FilterPath::Failed { .. } | FilterPath::Skipped
        )
    }

    /// Human-readable reason for a degraded path.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            FilterPath::Fallback { reason } | FilterPath::Failed { reason } => Some(reason),
            FilterPath::Skipped => Some("unsupported filter"),
            FilterPath::Noop | FilterPath::Pixel | FilterPath::Delegated => None,
        }
    }

    /// Short name for logs and diagnostics.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            FilterPath::Noop => "noop",
            FilterPath::Skipped => "skipped",
            FilterPath::Pixel => "pixel",
            FilterPath::Delegated => "delegated",
            FilterPath::Fallback { .. } => "fallback",
            FilterPath::Failed { .. } => "failed",
        }
    }
}

fn grayscale([r, g, b]: [f32; 3]) -> [f32; 3] {
    let y = luma(r, g, b);
    [y, y, y]
}

fn sepia([r, g, b]: [f32; 3]) -> [f32; 3] {
    let row = |m: [f32; 3]| m[0] * r + m[1] * g + m[2] * b;
    [row(SEPIA[0]), row(SEPIA[1]), row(SEPIA[2])]
}

fn invert([r, g, b]: [f32; 3]) -> [f32; 3] {
    [255.0 - r, 255.0 - g, 255.0 - b]
}

fn warm([r, g, b]: [f32; 3]) -> [f32; 3] {
    [r + WARM_SHIFT[0], g + WARM_SHIFT[1], b + WARM_SHIFT[2]]
}

fn cool([r, g, b]: [f32; 3]) -> [f32; 3] {
    [r - WARM_SHIFT[0], g - WARM_SHIFT[1] * 0.5, b - WARM_SHIFT[2]]
}

/// Per-pixel color function of a non-hue filter.
fn pixel_filter(kind: FilterKind) -> Option<fn([f32; 3]) -> [f32; 3]> {
    let filter: fn([f32; 3]) -> [f32; 3] = match kind {
        FilterKind::Grayscale => grayscale,
        FilterKind::Sepia => sepia,
        FilterKind::Invert => invert,
        FilterKind::Warm => warm,
        FilterKind::Cool => cool,
        _ => return None,
    };
    Some(filter)
}

/// Applies a non-hue filter in place.
///
/// Returns `false` (buffer untouched) for filters this function does not
/// handle: `None`, `Unsupported` and the hue-rotate family.
pub fn apply_pixel_filter(image: &mut RgbaImage, kind: FilterKind, intensity: FilterIntensity) -> bool {
    let Some(filter) = pixel_filter(kind) else {
        return false;
    };
    let weight = intensity.as_weight();
    for pixel in image.pixels_mut() {
        let [r, g, b, _] = pixel.0;
        let src = [f32::from(r), f32::from(g), f32::from(b)];
        let dst = filter(src);
        for i in 0..3 {
            pixel.0[i] = to_channel(src[i] + (dst[i].clamp(0.0, 255.0) - src[i]) * weight);
        }
    }
    true
}

/// Blends `filtered` into `image` by `intensity`. Alpha comes from `image`.
///
/// # Errors
///
/// Returns [`Error::Filter`] if the buffers differ in size.
pub fn blend_into(image: &mut RgbaImage, filtered: &RgbaImage, intensity: FilterIntensity) -> Result<()> {
    if image.dimensions() != filtered.dimensions() {
        return Err(Error::Filter(format!(
            "filtered buffer is {:?}, expected {:?}",
            filtered.dimensions(),
            image.dimensions()
        )));
    }
    let weight = intensity.as_weight();
    for (pixel, target) in image.pixels_mut().zip(filtered.pixels()) {
        for i in 0..3 {
            let src = f32::from(pixel.0[i]);
            pixel.0[i] = to_channel(src + (f32::from(target.0[i]) - src) * weight);
        }
    }
    Ok(())
}

/// Rotates the hue of every pixel through HSL.
///
/// # Errors
///
/// Returns [`Error::Filter`] for a non-finite angle.
pub fn rotate_hue(image: &RgbaImage, degrees: f32) -> Result<RgbaImage> {
    if !degrees.is_finite() {
        return Err(Error::Filter(format!("invalid hue shift {degrees}")));
    }
    let shift = degrees / 360.0;
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let [r, g, b, _] = pixel.0;
        let (h, s, l) = rgb_to_hsl(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        );
        let (nr, ng, nb) = hsl_to_rgb((h + shift).rem_euclid(1.0), s, l);
        pixel.0[0] = to_channel(nr * 255.0);
        pixel.0[1] = to_channel(ng * 255.0);
        pixel.0[2] = to_channel(nb * 255.0);
    }
    Ok(out)
}

/// RGB (0..1) → HSL (all 0..1).
#[must_use]
pub fn rgb_to_hsl(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if (max - min).abs() < 1e-6 {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if (max - r).abs() < 1e-6 {
        let h = (g - b) / d;
        (if h < 0.0 { h + 6.0 } else { h }) / 6.0
    } else if (max - g).abs() < 1e-6 {
        ((b - r) / d + 2.0) / 6.0
    } else {
        ((r - g) / d + 4.0) / 6.0
    };

    (h, s, l)
}

/// HSL (all 0..1) → RGB (0..1).
#[must_use]
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    if s.abs() < 1e-6 {
        return (l, l, l);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    (
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}
