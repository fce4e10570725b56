// SPDX-License-Identifier: MPL-2.0
//! Notification queue for the editor.
//!
//! Notices are kept in arrival order. The oldest [`MAX_VISIBLE`] are shown
//! and the rest wait behind them, so a burst of failures never hides the
//! first one. Warnings and errors are mirrored into the diagnostics journal
//! as they arrive.

use super::notification::{Notification, NotificationId, Severity};
use crate::diagnostics::{DiagnosticsHandle, ErrorEvent, ErrorType, WarningEvent, WarningType};
use crate::error::Error;
use std::collections::VecDeque;

/// Maximum number of notifications visible at once.
pub const MAX_VISIBLE: usize = 3;

/// Argument that marks a notification as raised while loading an image.
pub const STAGE_ARG: &str = "stage";
pub const LOAD_STAGE: &str = "load";

#[derive(Debug, Default)]
pub struct Manager {
    /// Oldest first; the head is what is on screen.
    entries: VecDeque<Notification>,
    diagnostics: Option<DiagnosticsHandle>,
}

impl Manager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirrors warnings and errors into the journal behind `handle`.
    pub fn set_diagnostics(&mut self, handle: DiagnosticsHandle) {
        self.diagnostics = Some(handle);
    }

    /// Queues `notification`. It is shown at once while fewer than
    /// [`MAX_VISIBLE`] are on screen.
    pub fn push(&mut self, notification: Notification) {
        self.record(&notification);
        self.entries.push_back(notification);
    }

    /// Queues the notice for an editor failure.
    pub fn push_error(&mut self, error: &Error) {
        self.push(Notification::from_error(error));
    }

    /// Queues the notice for a failed image load. It is removed by
    /// [`clear_load_errors`](Self::clear_load_errors) once a load succeeds.
    pub fn push_load_failure(&mut self, error: &Error) {
        self.push(Notification::from_error(error).with_arg(STAGE_ARG, LOAD_STAGE));
    }

    /// Queues a warning unless one of the same [`WarningType`] is still
    /// shown or queued. Repeated slider renders through a degraded filter
    /// therefore warn once.
    ///
    /// Returns true if the warning was queued.
    pub fn warn_once(&mut self, warning_type: WarningType, notification: Notification) -> bool {
        if self.has_warning(warning_type) {
            return false;
        }
        self.push(notification.with_warning_type(warning_type));
        true
    }

    /// Whether a warning of `warning_type` is shown or queued.
    #[must_use]
    pub fn has_warning(&self, warning_type: WarningType) -> bool {
        self.entries
            .iter()
            .any(|n| n.warning_type() == Some(warning_type))
    }

    /// Removes a notification by its ID. Returns true if it was found.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|n| n.id() != id);
        self.entries.len() < before
    }

    /// Drops shown notifications whose timer ran out; queued ones move up.
    ///
    /// Returns how many were dismissed.
    pub fn tick(&mut self) -> usize {
        let expired: Vec<NotificationId> = self
            .visible()
            .filter(|n| n.should_auto_dismiss())
            .map(Notification::id)
            .collect();
        for id in &expired {
            self.dismiss(*id);
        }
        expired.len()
    }

    /// Notifications on screen, oldest first.
    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter().take(MAX_VISIBLE)
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.entries.len().min(MAX_VISIBLE)
    }

    #[must_use]
    pub fn queued_count(&self) -> usize {
        self.entries.len().saturating_sub(MAX_VISIBLE)
    }

    #[must_use]
    pub fn has_notifications(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Whether any shown or queued notification uses `message_key`.
    #[must_use]
    pub fn contains_key(&self, message_key: &str) -> bool {
        self.entries.iter().any(|n| n.message_key() == message_key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Removes the notices raised by failed loads.
    pub fn clear_load_errors(&mut self) {
        self.entries
            .retain(|n| n.arg(STAGE_ARG) != Some(LOAD_STAGE));
    }

    fn record(&self, notification: &Notification) {
        match notification.severity() {
            Severity::Warning => {
                tracing::warn!(notification = %notification.describe(), "notification");
                if let Some(handle) = &self.diagnostics {
                    let warning_type = notification.warning_type().unwrap_or(WarningType::Other);
                    handle.log_warning(WarningEvent::new(warning_type, notification.describe()));
                }
            }
            Severity::Error => {
                tracing::error!(notification = %notification.describe(), "notification");
                if let Some(handle) = &self.diagnostics {
                    let error_type = notification.error_type().unwrap_or(ErrorType::Other);
                    handle.log_error(ErrorEvent::new(error_type, notification.describe()));
                }
            }
            Severity::Success | Severity::Info => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticEventKind, DiagnosticsCollector};
    use std::time::Duration;

    fn keys(manager: &Manager) -> Vec<&str> {
        manager.visible().map(Notification::message_key).collect()
    }

    #[test]
    fn overflow_waits_behind_the_oldest() {
        let mut manager = Manager::new();
        for key in ["first", "second", "third", "fourth"] {
            manager.push(Notification::success(key));
        }

        assert_eq!(keys(&manager), ["first", "second", "third"]);
        assert_eq!(manager.queued_count(), 1);

        let first = manager.visible().next().map(Notification::id);
        assert!(manager.dismiss(first.expect("a visible notification")));
        assert_eq!(keys(&manager), ["second", "third", "fourth"]);
        assert_eq!(manager.queued_count(), 0);
    }

    #[test]
    fn dismissing_an_unknown_id_changes_nothing() {
        let mut manager = Manager::new();
        manager.push(Notification::info("saved"));
        assert!(!manager.dismiss(Notification::success("temp").id()));
        assert_eq!(manager.visible_count(), 1);
    }

    #[test]
    fn tick_expires_only_shown_notices() {
        let mut manager = Manager::new();
        manager.push(Notification::error("error-encode-image"));
        for i in 0..3 {
            manager.push(Notification::info(format!("saved-{i}")).auto_dismiss(Duration::ZERO));
        }
        assert_eq!(manager.queued_count(), 1);

        // Errors stay; the two shown infos expire, then the queued one shows.
        assert_eq!(manager.tick(), 2);
        assert_eq!(keys(&manager), ["error-encode-image", "saved-2"]);
        assert_eq!(manager.tick(), 1);
        assert_eq!(keys(&manager), ["error-encode-image"]);
    }

    #[test]
    fn degraded_filter_warns_once_while_shown() {
        let mut manager = Manager::new();
        let degraded = || Notification::warning("warning-filter-degraded");

        assert!(manager.warn_once(WarningType::FilterDegraded, degraded()));
        assert!(!manager.warn_once(WarningType::FilterDegraded, degraded()));
        assert!(manager.warn_once(WarningType::Other, degraded()));
        assert_eq!(manager.visible_count(), 2);

        let shown = manager
            .visible()
            .find(|n| n.warning_type() == Some(WarningType::FilterDegraded))
            .map(Notification::id)
            .expect("degraded warning shown");
        manager.dismiss(shown);
        assert!(!manager.has_warning(WarningType::FilterDegraded));
        assert!(manager.warn_once(WarningType::FilterDegraded, degraded()));
    }

    #[test]
    fn successful_load_clears_only_load_failures() {
        let mut manager = Manager::new();
        manager.push_load_failure(&Error::NoImageLoaded);
        manager.push_load_failure(&Error::StaleResult);
        manager.push(Notification::success("notification-save-success"));
        manager.push_error(&Error::NoImageLoaded);
        assert_eq!(manager.queued_count(), 1);

        manager.clear_load_errors();

        assert_eq!(manager.visible_count(), 2);
        assert_eq!(manager.queued_count(), 0);
        assert!(manager.visible().all(|n| n.arg(STAGE_ARG).is_none()));
    }

    #[test]
    fn warnings_and_errors_reach_diagnostics() {
        let mut collector = DiagnosticsCollector::default();
        let mut manager = Manager::new();
        manager.set_diagnostics(collector.handle());

        manager.push(Notification::success("notification-save-success"));
        manager.warn_once(
            WarningType::FilterDegraded,
            Notification::warning("warning-filter-degraded"),
        );
        manager.push(Notification::error("error-io"));
        collector.process_pending();

        assert_eq!(collector.len(), 2);
        let kinds: Vec<_> = collector.iter().map(|e| e.kind.clone()).collect();
        assert!(matches!(
            &kinds[0],
            DiagnosticEventKind::Warning { event } if event.warning_type == WarningType::FilterDegraded
        ));
        assert!(matches!(
            &kinds[1],
            DiagnosticEventKind::Error { event } if event.error_type == ErrorType::Other
        ));
    }
}
