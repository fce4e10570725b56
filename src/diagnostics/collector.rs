// SPDX-License-Identifier: MPL-2.0
//! Diagnostics collector and the handle that feeds it.
//!
//! Handles send over a bounded channel and never block: when the channel is
//! full the event is dropped. The collector drains the channel into its
//! ring buffer on [`DiagnosticsCollector::process_pending`].

use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use super::{
    sanitize_message, CircularBuffer, DiagnosticEvent, DiagnosticEventKind, DiagnosticReport,
    EditorOperation, ErrorEvent, JournalCapacity, ReportMetadata, SerializableEvent, SystemInfo,
    UserAction, WarningEvent,
};
use crate::error::{Error, Result};

/// Channel slots between handles and the collector.
const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// Cheap-to-clone sender side of the journal.
#[derive(Clone, Debug)]
pub struct DiagnosticsHandle {
    event_tx: Sender<DiagnosticEvent>,
}

impl DiagnosticsHandle {
    pub fn log_action(&self, action: UserAction) {
        self.log_action_with_details(action, None);
    }

    /// Details are sanitized before they are queued.
    pub fn log_action_with_details(&self, action: UserAction, details: Option<String>) {
        let details = details.map(|d| sanitize_message(&d));
        self.send(DiagnosticEventKind::UserAction { action, details });
    }

    pub fn log_operation(&self, operation: EditorOperation) {
        self.send(DiagnosticEventKind::Operation { operation });
    }

    /// The message is sanitized to remove paths and URLs.
    pub fn log_warning(&self, warning: WarningEvent) {
        let event = WarningEvent {
            message: sanitize_message(&warning.message),
            ..warning
        };
        self.send(DiagnosticEventKind::Warning { event });
    }

    /// The message is sanitized to remove paths and URLs.
    pub fn log_error(&self, error: ErrorEvent) {
        let event = ErrorEvent {
            message: sanitize_message(&error.message),
            ..error
        };
        self.send(DiagnosticEventKind::Error { event });
    }

    /// Like [`log_action`](Self::log_action) but reports backpressure.
    ///
    /// # Errors
    ///
    /// Returns the rejected event when the channel is full or closed.
    pub fn try_log_action(&self, action: UserAction) -> std::result::Result<(), TrySendError<DiagnosticEvent>> {
        self.event_tx
            .try_send(DiagnosticEvent::new(DiagnosticEventKind::UserAction {
                action,
                details: None,
            }))
    }

    fn send(&self, kind: DiagnosticEventKind) {
        // Non-blocking send - drop if channel is full
        let _ = self.event_tx.try_send(DiagnosticEvent::new(kind));
    }
}

/// Receives events from handles and keeps the most recent ones.
#[derive(Debug)]
pub struct DiagnosticsCollector {
    buffer: CircularBuffer<DiagnosticEvent>,
    event_rx: Receiver<DiagnosticEvent>,
    event_tx: Sender<DiagnosticEvent>,
    /// Monotonic start, for relative event timestamps.
    collection_started_at: Instant,
    /// Wall-clock start, for report metadata.
    collection_started_at_utc: DateTime<Utc>,
}

impl Default for DiagnosticsCollector {
    fn default() -> Self {
        Self::new(JournalCapacity::default())
    }
}

impl DiagnosticsCollector {
    #[must_use]
    pub fn new(capacity: JournalCapacity) -> Self {
        let (event_tx, event_rx) = bounded(DEFAULT_CHANNEL_CAPACITY);
        Self {
            buffer: CircularBuffer::new(capacity),
            event_rx,
            event_tx,
            collection_started_at: Instant::now(),
            collection_started_at_utc: Utc::now(),
        }
    }

    #[must_use]
    pub fn handle(&self) -> DiagnosticsHandle {
        DiagnosticsHandle {
            event_tx: self.event_tx.clone(),
        }
    }

    /// Drains every queued event into the buffer.
    pub fn process_pending(&mut self) {
        self.buffer.extend(self.event_rx.try_iter());
    }

    /// Records an action directly, bypassing the channel.
    pub fn log_action(&mut self, action: UserAction) {
        self.buffer
            .push(DiagnosticEvent::new(DiagnosticEventKind::UserAction {
                action,
                details: None,
            }));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Stored events, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticEvent> {
        self.buffer.iter()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    #[must_use]
    pub fn collection_duration(&self) -> std::time::Duration {
        self.collection_started_at.elapsed()
    }

    /// Builds a report from the current buffer contents.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Duration in ms fits comfortably in u64
    pub fn build_report(&self) -> DiagnosticReport {
        let collection_duration_ms = self.collection_started_at.elapsed().as_millis() as u64;
        let events: Vec<SerializableEvent> = self
            .buffer
            .iter()
            .map(|event| {
                SerializableEvent::new(
                    event.timestamp,
                    self.collection_started_at,
                    event.kind.clone(),
                )
            })
            .collect();
        let metadata = ReportMetadata::new(
            self.collection_started_at_utc,
            collection_duration_ms,
            events.len(),
            self.buffer.evicted(),
        );
        DiagnosticReport::new(metadata, SystemInfo::collect(), events)
    }

    /// Exports the journal as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.build_report())
    }

    /// Writes the JSON report to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be written.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self
            .export_json()
            .map_err(|e| Error::Io(format!("report serialization failed: {e}")))?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
