// SPDX-License-Identifier: MPL-2.0
//! Diagnostic event types for editor activity tracking.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::{ErrorType, WarningType};

/// User-initiated editor actions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UserAction {
    /// Load an image to edit.
    LoadImage {
        /// `url`, `file` or `bytes`.
        source: String,
    },

    SelectTool {
        tool: String,
    },

    /// A slider or picker moved (live preview).
    AdjustParameter {
        field: String,
    },

    ApplyAdjustments,
    ResetAdjustments,
    ApplyCrop,
    CommitStroke,
    AddTextOverlay,
    AddAnnotation,
    Undo,
    Redo,
    ResetEditor,
    ExtractText,

    SaveImage {
        /// Export MIME type.
        format: String,
    },
}

/// A warning with its category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WarningEvent {
    pub warning_type: WarningType,
    pub message: String,
}

impl WarningEvent {
    #[must_use]
    pub fn new(warning_type: WarningType, message: impl Into<String>) -> Self {
        Self {
            warning_type,
            message: message.into(),
        }
    }
}

/// An error with its category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorEvent {
    pub error_type: ErrorType,
    pub message: String,
}

impl ErrorEvent {
    #[must_use]
    pub fn new(error_type: ErrorType, message: impl Into<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
        }
    }
}

/// A timed pipeline or export operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum EditorOperation {
    Render {
        duration_ms: u64,
        /// `delegated`, `pixel`, `fallback`, ...
        filter_path: String,
    },
    Export {
        duration_ms: u64,
        format: String,
        bytes: usize,
    },
}

/// A diagnostic event with its monotonic timestamp.
#[derive(Debug, Clone)]
pub struct DiagnosticEvent {
    pub timestamp: Instant,
    pub kind: DiagnosticEventKind,
}

impl DiagnosticEvent {
    #[must_use]
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self {
            timestamp: Instant::now(),
            kind,
        }
    }

    #[must_use]
    pub fn with_timestamp(kind: DiagnosticEventKind, timestamp: Instant) -> Self {
        Self { timestamp, kind }
    }
}

/// The type and payload of a diagnostic event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticEventKind {
    UserAction {
        action: UserAction,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
    Operation {
        operation: EditorOperation,
    },
    Warning {
        event: WarningEvent,
    },
    Error {
        event: ErrorEvent,
    },
}
