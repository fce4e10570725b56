// SPDX-License-Identifier: MPL-2.0
//! Diagnostic report structures for JSON export.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DiagnosticEventKind;

/// Metadata about a diagnostic report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportMetadata {
    /// Identifier derived from the generation time.
    pub report_id: String,
    /// When the report was generated (RFC 3339).
    pub generated_at: String,
    pub editor_version: String,
    /// When collection started (RFC 3339).
    pub collection_started_at: String,
    pub collection_duration_ms: u64,
    pub event_count: usize,
    /// Events dropped because the journal was full.
    #[serde(default)]
    pub events_evicted: u64,
}

impl ReportMetadata {
    #[must_use]
    pub fn new(
        collection_started_at: DateTime<Utc>,
        collection_duration_ms: u64,
        event_count: usize,
        events_evicted: u64,
    ) -> Self {
        let now = Utc::now();
        Self {
            report_id: format!("report-{}", now.format("%Y%m%dT%H%M%S%.6fZ")),
            generated_at: now.to_rfc3339(),
            editor_version: env!("CARGO_PKG_VERSION").to_string(),
            collection_started_at: collection_started_at.to_rfc3339(),
            collection_duration_ms,
            event_count,
            events_evicted,
        }
    }
}

/// Platform the report was produced on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemInfo {
    pub os: String,
    pub cpu_arch: String,
    /// Threads available to blocking render workers.
    pub parallelism: usize,
}

impl SystemInfo {
    #[must_use]
    pub fn collect() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            cpu_arch: std::env::consts::ARCH.to_string(),
            parallelism: std::thread::available_parallelism().map_or(1, std::num::NonZero::get),
        }
    }
}

/// An event with a timestamp relative to collection start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerializableEvent {
    pub timestamp_ms: u64,
    #[serde(flatten)]
    pub kind: DiagnosticEventKind,
}

impl SerializableEvent {
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Duration in ms fits comfortably in u64
    pub fn new(
        event_timestamp: Instant,
        collection_start: Instant,
        kind: DiagnosticEventKind,
    ) -> Self {
        let timestamp_ms = event_timestamp
            .saturating_duration_since(collection_start)
            .as_millis() as u64;
        Self { timestamp_ms, kind }
    }
}

/// Counts per event category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReportSummary {
    pub user_actions: usize,
    pub operations: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl ReportSummary {
    #[must_use]
    pub fn from_events(events: &[SerializableEvent]) -> Self {
        let mut summary = Self::default();
        for event in events {
            match event.kind {
                DiagnosticEventKind::UserAction { .. } => summary.user_actions += 1,
                DiagnosticEventKind::Operation { .. } => summary.operations += 1,
                DiagnosticEventKind::Warning { .. } => summary.warnings += 1,
                DiagnosticEventKind::Error { .. } => summary.errors += 1,
            }
        }
        summary
    }
}

/// Complete exported report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticReport {
    pub metadata: ReportMetadata,
    pub system_info: SystemInfo,
    pub summary: ReportSummary,
    pub events: Vec<SerializableEvent>,
}

impl DiagnosticReport {
    #[must_use]
    pub fn new(
        metadata: ReportMetadata,
        system_info: SystemInfo,
        events: Vec<SerializableEvent>,
    ) -> Self {
        let summary = ReportSummary::from_events(&events);
        Self {
            metadata,
            system_info,
            summary,
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{UserAction, WarningEvent, WarningType};
    use std::time::Duration;

    #[test]
    fn serializable_event_uses_relative_timestamp() {
        let start = Instant::now();
        let event = SerializableEvent::new(
            start + Duration::from_millis(250),
            start,
            DiagnosticEventKind::UserAction {
                action: UserAction::Redo,
                details: None,
            },
        );
        assert_eq!(event.timestamp_ms, 250);
    }

    #[test]
    fn flattened_event_keeps_type_tag_at_top_level() {
        let event = SerializableEvent {
            timestamp_ms: 5,
            kind: DiagnosticEventKind::Warning {
                event: WarningEvent::new(WarningType::Other, "w"),
            },
        };
        let json = serde_json::to_string(&event).expect("serialize");
        assert!(json.starts_with("{\"timestamp_ms\":5,\"type\":\"warning\""));
    }

    #[test]
    fn summary_counts_categories() {
        let events = vec![
            SerializableEvent {
                timestamp_ms: 0,
                kind: DiagnosticEventKind::UserAction {
                    action: UserAction::Undo,
                    details: None,
                },
            },
            SerializableEvent {
                timestamp_ms: 1,
                kind: DiagnosticEventKind::Warning {
                    event: WarningEvent::new(WarningType::FilterDegraded, "x"),
                },
            },
        ];
        let summary = ReportSummary::from_events(&events);
        assert_eq!(summary.user_actions, 1);
        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.errors, 0);
    }

    #[test]
    fn metadata_records_version_and_count() {
        let metadata = ReportMetadata::new(Utc::now(), 10, 3, 0);
        assert_eq!(metadata.event_count, 3);
        assert_eq!(metadata.editor_version, env!("CARGO_PKG_VERSION"));
        assert!(metadata.report_id.starts_with("report-"));
    }
}
