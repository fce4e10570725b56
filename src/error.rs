// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Decode(String),
    Encode(String),
    Svg(String),
    Config(String),
    Network(String),
    /// A raster operation ran before any image finished loading.
    NoImageLoaded,
    /// The decoded image exceeds the configured dimension or pixel limits.
    UnsupportedResolution {
        width: u32,
        height: u32,
        max_dimension: u32,
    },
    /// A crop rectangle resolved to zero pixels.
    InvalidCrop,
    /// Both the primary and the fallback filter path failed.
    Filter(String),
    /// The export MIME type is not one the encoder supports.
    UnsupportedFormat(String),
    /// An asynchronous result arrived after the session moved on.
    StaleResult,
    /// The text extraction collaborator failed.
    Extraction(String),
}

impl Error {
    /// Returns the notification message key for this error.
    pub fn message_key(&self) -> &'static str {
        match self {
            Error::Io(_) => "error-io",
            Error::Decode(_) => "error-decode-image",
            Error::Encode(_) => "error-encode-image",
            Error::Svg(_) => "error-render-overlay",
            Error::Config(_) => "error-config",
            Error::Network(_) => "error-fetch-image",
            Error::NoImageLoaded => "error-no-image-loaded",
            Error::UnsupportedResolution { .. } => "error-unsupported-resolution",
            Error::InvalidCrop => "error-invalid-crop",
            Error::Filter(_) => "error-filter-failed",
            Error::UnsupportedFormat(_) => "error-unsupported-format",
            Error::StaleResult => "error-stale-result",
            Error::Extraction(_) => "error-extract-text",
        }
    }

    /// Whether the failure leaves the session fully usable.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Config(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Decode(e) => write!(f, "Decode Error: {}", e),
            Error::Encode(e) => write!(f, "Encode Error: {}", e),
            Error::Svg(e) => write!(f, "SVG Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Network(e) => write!(f, "Network Error: {}", e),
            Error::NoImageLoaded => write!(f, "No image loaded"),
            Error::UnsupportedResolution {
                width,
                height,
                max_dimension,
            } => write!(
                f,
                "Unsupported resolution: {}x{} (max side {})",
                width, height, max_dimension
            ),
            Error::InvalidCrop => write!(f, "Crop area is empty"),
            Error::Filter(e) => write!(f, "Filter Error: {}", e),
            Error::UnsupportedFormat(mime) => write!(f, "Unsupported export format: {}", mime),
            Error::StaleResult => write!(f, "Result discarded: session changed while rendering"),
            Error::Extraction(e) => write!(f, "Text Extraction Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<image_rs::ImageError> for Error {
    fn from(err: image_rs::ImageError) -> Self {
        match err {
            image_rs::ImageError::IoError(e) => Error::Io(e.to_string()),
            image_rs::ImageError::Encoding(e) => Error::Encode(e.to_string()),
            other => Error::Decode(other.to_string()),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<crate::application::port::ExtractionError> for Error {
    fn from(err: crate::application::port::ExtractionError) -> Self {
        Error::Extraction(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn image_io_error_maps_to_io_variant() {
        let image_error = image_rs::ImageError::IoError(std::io::Error::other("decode failed"));
        let err: Error = image_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("decode failed")),
            other => panic!("expected Io variant, got {other:?}"),
        }
    }

    #[test]
    fn unsupported_resolution_mentions_dimensions() {
        let err = Error::UnsupportedResolution {
            width: 40000,
            height: 20,
            max_dimension: 16384,
        };
        let text = format!("{}", err);
        assert!(text.contains("40000x20"));
        assert!(text.contains("16384"));
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn message_keys_are_distinct_for_user_facing_failures() {
        assert_ne!(
            Error::Decode(String::new()).message_key(),
            Error::Filter(String::new()).message_key()
        );
        assert_eq!(Error::NoImageLoaded.message_key(), "error-no-image-loaded");
    }
}
