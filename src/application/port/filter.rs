// SPDX-License-Identifier: MPL-2.0
//! Hue transcoder port definition.
//!
//! Hue rotation is the one filter the raster engine may hand to an external
//! codec. The engine keeps an in-process HSL fallback, so an adapter is free
//! to fail: any error (or a result with different dimensions) sends the
//! engine down the fallback path.

use image_rs::RgbaImage;
use std::fmt;

// =============================================================================
// TranscoderError
// =============================================================================

/// Errors reported by a [`HueTranscoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscoderError {
    /// The backing codec is not installed or not reachable.
    Unavailable,

    /// The codec ran and failed.
    Failed(String),
}

impl fmt::Display for TranscoderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscoderError::Unavailable => write!(f, "hue transcoder is unavailable"),
            TranscoderError::Failed(msg) => write!(f, "hue transcoder failed: {msg}"),
        }
    }
}

impl std::error::Error for TranscoderError {}

// =============================================================================
// HueTranscoder
// =============================================================================

/// Applies a hue rotation to a whole buffer.
pub trait HueTranscoder: Send + Sync {
    /// Human-readable adapter name, used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Rotates the hue of every pixel by `degrees`.
    ///
    /// Implementations must preserve dimensions and alpha.
    ///
    /// # Errors
    ///
    /// Returns [`TranscoderError`] when the rotation cannot be performed.
    fn rotate_hue(&self, image: &RgbaImage, degrees: f32) -> Result<RgbaImage, TranscoderError>;
}
