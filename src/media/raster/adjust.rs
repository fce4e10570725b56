// SPDX-License-Identifier: MPL-2.0
//! Brightness, contrast and saturation.
//!
//! The three stages always run in this order and each stage writes a clamped,
//! rounded 8-bit value before the next one reads it. A neutral stage is
//! skipped entirely, so neutral parameters leave the buffer bit-identical.

use crate::domain::editing::{Brightness, Contrast, Saturation};
use image_rs::RgbaImage;

/// Luma weights used for desaturation.
pub const LUMA_R: f32 = 0.2989;
pub const LUMA_G: f32 = 0.587;
pub const LUMA_B: f32 = 0.114;

#[inline]
pub(crate) fn to_channel(value: f32) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let channel = value.round().clamp(0.0, 255.0) as u8;
    channel
}

#[inline]
pub(crate) fn luma(r: f32, g: f32, b: f32) -> f32 {
    LUMA_R * r + LUMA_G * g + LUMA_B * b
}

/// Applies brightness, then contrast, then saturation. Alpha is untouched.
pub fn apply_basic(
    image: &mut RgbaImage,
    brightness: Brightness,
    contrast: Contrast,
    saturation: Saturation,
) {
    if !brightness.is_neutral() {
        let offset = brightness.channel_offset();
        for pixel in image.pixels_mut() {
            for channel in &mut pixel.0[..3] {
                *channel = to_channel(f32::from(*channel) + offset);
            }
        }
    }

    if !contrast.is_neutral() {
        let factor = contrast.as_factor();
        for pixel in image.pixels_mut() {
            for channel in &mut pixel.0[..3] {
                let normalized = f32::from(*channel) / 255.0;
                *channel = to_channel(((normalized - 0.5) * factor + 0.5) * 255.0);
            }
        }
    }

    if !saturation.is_neutral() {
        let blend = saturation.luma_blend();
        for pixel in image.pixels_mut() {
            let [r, g, b, _] = pixel.0;
            let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));
            let gray = luma(r, g, b);
            pixel.0[0] = to_channel(r + (gray - r) * blend);
            pixel.0[1] = to_channel(g + (gray - g) * blend);
            pixel.0[2] = to_channel(b + (gray - b) * blend);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::Rgba;

    fn single(r: u8, g: u8, b: u8) -> RgbaImage {
        RgbaImage::from_pixel(1, 1, Rgba([r, g, b, 200]))
    }

    #[test]
    fn neutral_parameters_are_identity() {
        let mut image = RgbaImage::from_fn(8, 8, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            Rgba([(x * 31) as u8, (y * 29) as u8, 77, 255])
        });
        let before = image.clone();
        apply_basic(
            &mut image,
            Brightness::default(),
            Contrast::default(),
            Saturation::default(),
        );
        assert_eq!(image, before);
    }

    #[test]
    fn brightness_adds_scaled_offset() {
        let mut image = single(100, 0, 250);
        apply_basic(
            &mut image,
            Brightness::new(110.0),
            Contrast::default(),
            Saturation::default(),
        );
        // +25.5 rounds to +26, the blue channel saturates.
        assert_eq!(image.get_pixel(0, 0).0, [126, 26, 255, 200]);
    }

    #[test]
    fn contrast_pivots_around_mid_gray() {
        let mut image = single(255, 0, 128);
        apply_basic(
            &mut image,
            Brightness::default(),
            Contrast::new(50.0),
            Saturation::default(),
        );
        let [r, g, b, a] = image.get_pixel(0, 0).0;
        assert_eq!((r, g, a), (191, 64, 200));
        assert_eq!(b, 128);
    }

    #[test]
    fn zero_saturation_produces_gray() {
        let mut image = single(200, 100, 50);
        apply_basic(
            &mut image,
            Brightness::default(),
            Contrast::default(),
            Saturation::new(0.0),
        );
        let [r, g, b, _] = image.get_pixel(0, 0).0;
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(r, to_channel(luma(200.0, 100.0, 50.0)));
    }

    #[test]
    fn stage_order_is_brightness_contrast_saturation() {
        // Expected value computed stage by stage with intermediate rounding.
        let mut image = single(180, 90, 30);
        apply_basic(
            &mut image,
            Brightness::new(120.0),
            Contrast::new(120.0),
            Saturation::new(50.0),
        );

        let bright = |c: f32| to_channel(c + 51.0);
        let contrast = |c: u8| to_channel(((f32::from(c) / 255.0 - 0.5) * 1.2 + 0.5) * 255.0);
        let (r, g, b) = (
            contrast(bright(180.0)),
            contrast(bright(90.0)),
            contrast(bright(30.0)),
        );
        let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));
        let gray = luma(r, g, b);
        let expected = [
            to_channel(r + (gray - r) * 0.5),
            to_channel(g + (gray - g) * 0.5),
            to_channel(b + (gray - b) * 0.5),
        ];

        assert_eq!(&image.get_pixel(0, 0).0[..3], &expected);
    }
}
