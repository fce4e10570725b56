// SPDX-License-Identifier: MPL-2.0
//! Geometric stages: rotation, centered zoom and percent crop.
//!
//! Quarter turns use the lossless `image` rotations. Everything else is
//! resampled through tiny-skia with bilinear filtering onto a transparent
//! canvas.

use super::{pixmap_to_rgba, rgba_to_pixmap};
use crate::domain::editing::{RotationDegrees, ZoomPercent};
use crate::error::{Error, Result};
use image_rs::{imageops, RgbaImage};
use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

/// Canvas size that fully contains a `width`×`height` image rotated by
/// `degrees`: `newW = h|sin| + w|cos|`, `newH = h|cos| + w|sin|`, rounded up.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn rotated_bounds(width: u32, height: u32, degrees: f32) -> (u32, u32) {
    let radians = degrees.to_radians();
    let (sin, cos) = (radians.sin().abs(), radians.cos().abs());
    let (w, h) = (width as f32, height as f32);
    // Shave float noise so an exact fit does not grow by one pixel.
    let new_w = (h * sin + w * cos - 1e-3).ceil().max(1.0);
    let new_h = (h * cos + w * sin - 1e-3).ceil().max(1.0);
    (new_w as u32, new_h as u32)
}

/// Rotates clockwise by `degrees`.
///
/// # Errors
///
/// Returns [`Error::Svg`] if the rotated canvas cannot be allocated.
#[allow(clippy::cast_precision_loss)]
pub fn rotate(image: &RgbaImage, degrees: RotationDegrees) -> Result<RgbaImage> {
    match degrees.quarter_turns() {
        Some(0) => return Ok(image.clone()),
        Some(1) => return Ok(imageops::rotate90(image)),
        Some(2) => return Ok(imageops::rotate180(image)),
        Some(3) => return Ok(imageops::rotate270(image)),
        _ => {}
    }

    let (width, height) = image.dimensions();
    let (new_w, new_h) = rotated_bounds(width, height, degrees.value());
    let source = rgba_to_pixmap(image)?;
    let mut target = Pixmap::new(new_w, new_h)
        .ok_or_else(|| Error::Svg(format!("cannot allocate {new_w}x{new_h} canvas")))?;

    let transform = Transform::from_translate(new_w as f32 / 2.0, new_h as f32 / 2.0)
        .pre_rotate(degrees.value())
        .pre_translate(-(width as f32) / 2.0, -(height as f32) / 2.0);
    target.draw_pixmap(0, 0, source.as_ref(), &bilinear(), transform, None);

    Ok(pixmap_to_rgba(&target))
}

/// Scales about the canvas center by `zoom`, then shifts by the given
/// percentages of the canvas size. The canvas size never changes; areas
/// uncovered by a zoom-out are transparent.
///
/// # Errors
///
/// Returns [`Error::Svg`] if the canvas cannot be allocated.
#[allow(clippy::cast_precision_loss)]
pub fn zoom_and_crop(
    image: &RgbaImage,
    zoom: ZoomPercent,
    x_offset_percent: f32,
    y_offset_percent: f32,
) -> Result<RgbaImage> {
    if zoom.is_neutral() && x_offset_percent == 0.0 && y_offset_percent == 0.0 {
        return Ok(image.clone());
    }

    let (width, height) = image.dimensions();
    let (w, h) = (width as f32, height as f32);
    let source = rgba_to_pixmap(image)?;
    let mut target = Pixmap::new(width, height)
        .ok_or_else(|| Error::Svg(format!("cannot allocate {width}x{height} canvas")))?;

    let factor = zoom.as_factor();
    let transform = Transform::from_translate(
        w / 2.0 + w * x_offset_percent / 100.0,
        h / 2.0 + h * y_offset_percent / 100.0,
    )
    .pre_scale(factor, factor)
    .pre_translate(-w / 2.0, -h / 2.0);
    target.draw_pixmap(0, 0, source.as_ref(), &bilinear(), transform, None);

    Ok(pixmap_to_rgba(&target))
}

/// Pixel rectangle resolved from percent coordinates, clamped to the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Resolves a percent rectangle against `width`×`height`.
///
/// Returns `None` when the clamped rectangle has no area.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn resolve_percent_rect(
    width: u32,
    height: u32,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
) -> Option<PixelRect> {
    if ![x, y, w, h].iter().all(|v| v.is_finite()) {
        return None;
    }
    let to_px = |percent: f32, extent: u32| -> u32 {
        ((percent / 100.0) * extent as f32).round().clamp(0.0, extent as f32) as u32
    };
    let left = to_px(x, width);
    let top = to_px(y, height);
    let right = to_px(x + w.max(0.0), width);
    let bottom = to_px(y + h.max(0.0), height);
    let rect = PixelRect {
        x: left,
        y: top,
        width: right.saturating_sub(left),
        height: bottom.saturating_sub(top),
    };
    (rect.width > 0 && rect.height > 0).then_some(rect)
}

/// Extracts the percent rectangle; the result is exactly that rectangle.
///
/// # Errors
///
/// Returns [`Error::InvalidCrop`] when the rectangle resolves to no pixels.
pub fn crop(image: &RgbaImage, x: f32, y: f32, w: f32, h: f32) -> Result<RgbaImage> {
    let rect = resolve_percent_rect(image.width(), image.height(), x, y, w, h)
        .ok_or(Error::InvalidCrop)?;
    Ok(imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height).to_image())
}

fn bilinear() -> PixmapPaint {
    PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    }
}
