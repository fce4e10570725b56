// SPDX-License-Identifier: MPL-2.0
//! Image decoding with resolution limits (PNG, JPEG, GIF, WebP, SVG, etc.).
//!
//! Raster formats go through the `image` crate; the header is read first so
//! an oversized upload is rejected before any pixel memory is allocated.
//! SVG uploads are rasterized at their intrinsic size with resvg.

use crate::config::LimitsConfig;
use crate::error::{Error, Result};
use image_rs::{ImageReader, RgbaImage};
use resvg::usvg;
use std::io::Cursor;

/// Size limits applied to every decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Largest accepted width or height.
    pub max_dimension: u32,
    /// Largest accepted `width * height`.
    pub max_pixels: u64,
}

impl DecodeLimits {
    /// Rejects dimensions that are empty or exceed the limits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedResolution`].
    pub fn check(&self, width: u32, height: u32) -> Result<()> {
        let too_large = width > self.max_dimension
            || height > self.max_dimension
            || u64::from(width) * u64::from(height) > self.max_pixels;
        if width == 0 || height == 0 || too_large {
            return Err(Error::UnsupportedResolution {
                width,
                height,
                max_dimension: self.max_dimension,
            });
        }
        Ok(())
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self::from(&LimitsConfig::default())
    }
}

impl From<&LimitsConfig> for DecodeLimits {
    fn from(config: &LimitsConfig) -> Self {
        Self {
            max_dimension: config.max_dimension,
            max_pixels: config.max_pixels,
        }
    }
}

/// Returns true when the bytes look like an SVG document.
#[must_use]
pub fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    let Ok(text) = std::str::from_utf8(head) else {
        return false;
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

/// Decodes `bytes` into a straight-alpha RGBA buffer.
///
/// # Errors
///
/// - [`Error::Decode`] if the format is unknown or the data is corrupt
/// - [`Error::Svg`] if an SVG document cannot be parsed or rendered
/// - [`Error::UnsupportedResolution`] if the image exceeds `limits`
pub fn decode(bytes: &[u8], limits: &DecodeLimits) -> Result<RgbaImage> {
    if looks_like_svg(bytes) {
        return rasterize_svg(bytes, limits);
    }

    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()
        .map_err(|e| Error::Decode(e.to_string()))?;
    limits.check(width, height)?;

    let mut io_limits = image_rs::Limits::default();
    io_limits.max_image_width = Some(limits.max_dimension);
    io_limits.max_image_height = Some(limits.max_dimension);

    let mut reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    reader.limits(io_limits);
    let decoded = reader.decode().map_err(|e| Error::Decode(e.to_string()))?;
    Ok(decoded.to_rgba8())
}

fn rasterize_svg(bytes: &[u8], limits: &DecodeLimits) -> Result<RgbaImage> {
    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
        .map_err(|e| Error::Svg(e.to_string()))?;

    let size = tree.size().to_int_size();
    limits.check(size.width(), size.height())?;

    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| Error::Svg("Failed to allocate SVG pixmap".into()))?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    Ok(super::raster::pixmap_to_rgba(&pixmap))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::Rgba;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image_rs::ImageFormat::Png)
            .expect("failed to encode png");
        bytes
    }

    #[test]
    fn decode_png_returns_expected_dimensions() {
        let image = decode(&png_bytes(4, 2), &DecodeLimits::default()).expect("png should decode");
        assert_eq!(image.dimensions(), (4, 2));
        assert_eq!(image.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn decode_rejects_oversized_image_before_decoding() {
        let limits = DecodeLimits {
            max_dimension: 8,
            max_pixels: 1_000,
        };
        match decode(&png_bytes(9, 2), &limits) {
            Err(Error::UnsupportedResolution {
                width,
                height,
                max_dimension,
            }) => {
                assert_eq!((width, height, max_dimension), (9, 2, 8));
            }
            other => panic!("expected UnsupportedResolution, got {other:?}"),
        }
    }

    #[test]
    fn decode_rejects_pixel_count_over_limit() {
        let limits = DecodeLimits {
            max_dimension: 100,
            max_pixels: 50,
        };
        assert!(matches!(
            decode(&png_bytes(10, 10), &limits),
            Err(Error::UnsupportedResolution { .. })
        ));
    }

    #[test]
    fn decode_garbage_returns_decode_error() {
        match decode(b"definitely not an image", &DecodeLimits::default()) {
            Err(Error::Decode(message)) => assert!(!message.is_empty()),
            other => panic!("expected Decode error, got {other:?}"),
        }
    }

    #[test]
    fn decode_svg_rasterizes_successfully() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="6" height="3">
            <rect width="6" height="3" fill="blue" />
        </svg>"#;
        let image = decode(svg, &DecodeLimits::default()).expect("svg should decode");
        assert_eq!(image.dimensions(), (6, 3));
        assert_eq!(image.get_pixel(2, 1), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn broken_svg_returns_svg_error() {
        match decode(b"<svg>oops", &DecodeLimits::default()) {
            Err(Error::Svg(message)) => assert!(!message.is_empty()),
            other => panic!("expected Svg error, got {other:?}"),
        }
    }

    #[test]
    fn svg_sniffing() {
        assert!(looks_like_svg(b"  <svg xmlns='x'/>"));
        assert!(looks_like_svg(b"<?xml version='1.0'?><svg/>"));
        assert!(!looks_like_svg(&png_bytes(1, 1)));
    }
}
