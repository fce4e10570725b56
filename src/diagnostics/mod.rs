// SPDX-License-Identifier: MPL-2.0
//! Diagnostics journal for editor activity.
//!
//! Events (user actions, timed operations, warnings and errors) are sent
//! through cheap handles, stored in a memory-bounded ring buffer and exported
//! as a JSON report.
//!
//! # Architecture
//!
//! - [`CircularBuffer`]: journal sized by [`JournalCapacity`], counting evictions
//! - [`DiagnosticsHandle`] / [`DiagnosticsCollector`]: channel pair
//! - [`DiagnosticEvent`]: timestamped event
//!
//! # Privacy
//!
//! Messages and details are passed through [`sanitize_message`] before
//! they are queued, so paths and URLs never reach a report.

mod buffer;
mod collector;
mod events;
mod report;
mod sanitizer;

pub use buffer::{CircularBuffer, JournalCapacity};
pub use collector::{DiagnosticsCollector, DiagnosticsHandle};
pub use events::{
    DiagnosticEvent, DiagnosticEventKind, EditorOperation, ErrorEvent, UserAction, WarningEvent,
};
pub use report::{DiagnosticReport, ReportMetadata, ReportSummary, SerializableEvent, SystemInfo};
pub use sanitizer::{sanitize_message, ErrorType, WarningType};
