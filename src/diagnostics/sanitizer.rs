// SPDX-License-Identifier: MPL-2.0
//! Message sanitization and warning/error categories.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Categories of warnings recorded in the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningType {
    /// A filter fell back to a slower path or was skipped.
    FilterDegraded,
    /// The image exceeds the configured size limits.
    UnsupportedResolution,
    /// The requested export format is unknown.
    UnsupportedFormat,
    NetworkError,
    ConfigurationIssue,
    Other,
}

/// Categories of errors recorded in the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    IoError,
    DecodeError,
    ExportError,
    RenderError,
    ExtractionError,
    Other,
}

/// Paths and URLs that may identify the user.
static SENSITIVE_PATTERNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"("#,
        r#"https?://[^\s"'()\[\]]+"#,    // URLs (may carry tokens)
        r#"|/home/[^\s"'()\[\]]+"#,      // Linux home
        r#"|/Users/[^\s"'()\[\]]+"#,     // macOS home
        r#"|/tmp/[^\s"'()\[\]]+"#,
        r#"|/var/[^\s"'()\[\]]+"#,
        r#"|~/[^\s"'()\[\]]+"#,
        r#"|[A-Za-z]:\\[^\s"'()\[\]]+"#, // Windows drive paths
        r#")"#,
    ))
    .expect("sanitizer regex should compile")
});

/// Replaces file paths with `<path>` and URLs with `<url>`.
///
/// ```
/// use testimonial_editor::diagnostics::sanitize_message;
///
/// assert_eq!(sanitize_message("cannot open /home/ana/me.png"), "cannot open <path>");
/// assert_eq!(sanitize_message("GET https://cdn.example/a.jpg failed"), "GET <url> failed");
/// ```
#[must_use]
pub fn sanitize_message(message: &str) -> String {
    SENSITIVE_PATTERNS
        .replace_all(message, |caps: &regex::Captures<'_>| {
            if caps[0].starts_with("http") {
                "<url>"
            } else {
                "<path>"
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_type_serializes_to_snake_case() {
        assert_eq!(
            serde_json::to_string(&WarningType::FilterDegraded).expect("serialize"),
            "\"filter_degraded\""
        );
        assert_eq!(
            serde_json::to_string(&WarningType::UnsupportedResolution).expect("serialize"),
            "\"unsupported_resolution\""
        );
    }

    #[test]
    fn error_type_round_trips() {
        let json = serde_json::to_string(&ErrorType::ExportError).expect("serialize");
        assert_eq!(json, "\"export_error\"");
        let parsed: ErrorType = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, ErrorType::ExportError);
    }

    #[test]
    fn sanitize_replaces_unix_and_windows_paths() {
        assert_eq!(
            sanitize_message("failed to read /tmp/upload-1.png"),
            "failed to read <path>"
        );
        assert_eq!(
            sanitize_message("failed to read C:\\Users\\bo\\a.png"),
            "failed to read <path>"
        );
    }

    #[test]
    fn sanitize_replaces_urls() {
        assert_eq!(
            sanitize_message("https://example.com/img.jpg?token=abc answered 404"),
            "<url> answered 404"
        );
    }

    #[test]
    fn sanitize_keeps_plain_messages() {
        assert_eq!(sanitize_message("crop area is empty"), "crop area is empty");
    }
}
