// SPDX-License-Identifier: MPL-2.0
//! Text extraction (OCR) port definition.
//!
//! The editor treats extraction as best-effort and opaque: it hands over the
//! current buffer and stores whatever string comes back.

use image_rs::RgbaImage;
use std::fmt;

/// Errors reported by a [`TextExtractor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// No extraction backend is configured.
    Unavailable,

    /// The backend ran and failed.
    Failed(String),
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionError::Unavailable => write!(f, "text extraction is unavailable"),
            ExtractionError::Failed(msg) => write!(f, "text extraction failed: {msg}"),
        }
    }
}

impl std::error::Error for ExtractionError {}

/// Extracts human-readable text from an image.
pub trait TextExtractor: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ExtractionError`] when the backend cannot produce text.
    fn extract_text(&self, image: &RgbaImage) -> Result<String, ExtractionError>;
}
