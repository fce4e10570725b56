// SPDX-License-Identifier: MPL-2.0
//! Encoding of flattened buffers into download-ready bytes.
//!
//! Formats are selected by MIME type, the way browser canvases name them.
//! Quality (0.0 to 1.0) only matters for JPEG; the other formats are
//! written losslessly.

use crate::error::{Error, Result};
use image_rs::codecs::jpeg::JpegEncoder;
use image_rs::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// JPEG (lossy, no alpha). Default for testimonial uploads.
    #[default]
    Jpeg,
    /// PNG (lossless).
    Png,
    /// WebP (lossless encoder).
    WebP,
    /// BMP (uncompressed).
    Bmp,
}

impl ExportFormat {
    /// Parses a MIME type such as `image/png`. Parameters after `;` are ignored.
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<ExportFormat> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" => Some(ExportFormat::Jpeg),
            "image/png" => Some(ExportFormat::Png),
            "image/webp" => Some(ExportFormat::WebP),
            "image/bmp" | "image/x-bmp" => Some(ExportFormat::Bmp),
            _ => None,
        }
    }

    /// Detects format from a file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<ExportFormat> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ExportFormat::Jpeg),
            "png" => Some(ExportFormat::Png),
            "webp" => Some(ExportFormat::WebP),
            "bmp" => Some(ExportFormat::Bmp),
            _ => None,
        }
    }

    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Png => "image/png",
            ExportFormat::WebP => "image/webp",
            ExportFormat::Bmp => "image/bmp",
        }
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Png => "png",
            ExportFormat::WebP => "webp",
            ExportFormat::Bmp => "bmp",
        }
    }

    /// Returns true when the format honors the quality setting.
    #[must_use]
    pub fn is_lossy(self) -> bool {
        matches!(self, ExportFormat::Jpeg)
    }

    fn image_format(self) -> ImageFormat {
        match self {
            ExportFormat::Jpeg => ImageFormat::Jpeg,
            ExportFormat::Png => ImageFormat::Png,
            ExportFormat::WebP => ImageFormat::WebP,
            ExportFormat::Bmp => ImageFormat::Bmp,
        }
    }
}

/// Maps a 0.0–1.0 quality onto the JPEG encoder's 1–100 scale.
#[must_use]
pub fn jpeg_quality(quality: f32) -> u8 {
    let quality = if quality.is_finite() { quality } else { 0.92 };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scaled = (quality.clamp(0.0, 1.0) * 100.0).round() as u8;
    scaled.max(1)
}

/// Encodes `image` as `format`.
///
/// # Errors
///
/// Returns [`Error::Encode`] if the encoder rejects the buffer.
pub fn encode(image: &RgbaImage, format: ExportFormat, quality: f32) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    match format {
        ExportFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            let encoder = JpegEncoder::new_with_quality(&mut bytes, jpeg_quality(quality));
            rgb.write_with_encoder(encoder)
                .map_err(|e| Error::Encode(e.to_string()))?;
        }
        other => {
            image
                .write_to(&mut Cursor::new(&mut bytes), other.image_format())
                .map_err(|e| Error::Encode(e.to_string()))?;
        }
    }
    Ok(bytes)
}

/// Encodes `image` using a MIME type string.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for unknown MIME types and
/// [`Error::Encode`] if encoding fails.
pub fn encode_mime(image: &RgbaImage, mime: &str, quality: f32) -> Result<Vec<u8>> {
    let format =
        ExportFormat::from_mime(mime).ok_or_else(|| Error::UnsupportedFormat(mime.to_string()))?;
    encode(image, format, quality)
}
