// SPDX-License-Identifier: MPL-2.0
//! Shared, async access to one [`EditSession`].
//!
//! [`SessionHandle`] is the surface the embedding application talks to. It
//! serializes every session call behind a tokio mutex, runs the heavy pixel
//! work on blocking threads and commits results only when the session has
//! not moved on in the meantime.
//!
//! Slider drags are cheap to preview but should not flood history, so
//! [`SessionHandle::slider_changed`] renders a preview immediately and
//! (re)schedules a single trailing commit. Only the last change of a drag is
//! recorded.

use super::{EditLabel, EditSession, Exporter, RenderJob, Rendered, Tool};
use crate::application::port::TextExtractor;
use crate::config::Config;
use crate::diagnostics::{DiagnosticsHandle, EditorOperation, UserAction, WarningType};
use crate::domain::editing::AdjustmentField;
use crate::error::{Error, Result};
use crate::media::image;
use crate::media::raster::FilterPath;
use crate::media::ImageSource;
use crate::notifications::{Manager, Notification};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, MutexGuard};
use tokio::task::JoinHandle;

const FILTER_DEGRADED_KEY: &str = "warning-filter-degraded";

/// A scheduled trailing commit.
#[derive(Debug)]
struct PendingCommit {
    ticket: u64,
    task: JoinHandle<()>,
}

/// Cheap-to-clone handle to a shared [`EditSession`].
///
/// Methods that spawn work (`slider_changed`, `load`, ...) must be called
/// from within a tokio runtime.
#[derive(Clone)]
pub struct SessionHandle {
    session: Arc<Mutex<EditSession>>,
    client: reqwest::Client,
    notifications: Arc<std::sync::Mutex<Manager>>,
    diagnostics: Option<DiagnosticsHandle>,
    pending: Arc<std::sync::Mutex<Option<PendingCommit>>>,
    next_ticket: Arc<AtomicU64>,
    debounce: Duration,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("debounce", &self.debounce)
            .field("has_pending_commit", &self.has_pending_commit())
            .finish_non_exhaustive()
    }
}

impl SessionHandle {
    /// Wraps `session`. The commit debounce comes from its settings.
    #[must_use]
    pub fn new(session: EditSession) -> Self {
        let debounce = session.settings().commit_debounce;
        Self {
            session: Arc::new(Mutex::new(session)),
            client: reqwest::Client::new(),
            notifications: Arc::new(std::sync::Mutex::new(Manager::new())),
            diagnostics: None,
            pending: Arc::new(std::sync::Mutex::new(None)),
            next_ticket: Arc::new(AtomicU64::new(0)),
            debounce,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(EditSession::from_config(config))
    }

    /// Uses `client` for URL sources instead of a default client.
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Records actions and timings to `handle`; notification warnings and
    /// errors are forwarded too.
    #[must_use]
    pub fn with_diagnostics(self, handle: DiagnosticsHandle) -> Self {
        self.notifications().set_diagnostics(handle.clone());
        Self {
            diagnostics: Some(handle),
            ..self
        }
    }

    /// Exclusive access to the session for synchronous calls.
    ///
    /// Holding the guard blocks every other handle operation, including a
    /// scheduled commit.
    pub async fn lock(&self) -> MutexGuard<'_, EditSession> {
        self.session.lock().await
    }

    /// Notifications raised by handle operations.
    pub fn notifications(&self) -> std::sync::MutexGuard<'_, Manager> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    #[must_use]
    pub fn has_pending_commit(&self) -> bool {
        self.pending_slot().is_some()
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    /// Fetches, decodes and loads an image as a fresh session.
    ///
    /// A pending commit is dropped. On failure the previous image stays
    /// loaded and an error notification is pushed.
    ///
    /// # Errors
    ///
    /// - [`Error::Network`] or [`Error::Io`] if the source cannot be read
    /// - [`Error::Decode`] or [`Error::UnsupportedResolution`] if the bytes
    ///   are not an acceptable image
    pub async fn load(&self, source: ImageSource) -> Result<()> {
        self.cancel_pending();
        self.log_action(UserAction::LoadImage {
            source: source.kind().to_string(),
        });
        tracing::debug!(source = %source.describe(), "loading image");

        let limits = self.session.lock().await.settings().limits;
        let decoded = match source.fetch(&self.client).await {
            Ok(bytes) => run_blocking(move || image::decode(&bytes, &limits)).await,
            Err(err) => Err(err),
        };
        let outcome = match decoded {
            Ok(decoded) => self.session.lock().await.load_decoded(decoded),
            Err(err) => Err(err),
        };
        match outcome {
            Ok(()) => {
                self.notifications().clear_load_errors();
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "image load failed");
                self.notifications().push_load_failure(&err);
                Err(err)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Adjustments
    // -------------------------------------------------------------------------

    /// Applies one slider change: the preview is rendered right away and a
    /// history commit is scheduled after the debounce period. A later change
    /// reschedules the commit.
    ///
    /// A preview that finishes after a newer change is dropped silently.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoImageLoaded`] before the first load.
    pub async fn slider_changed(&self, field: AdjustmentField) -> Result<()> {
        let job = {
            let mut session = self.session.lock().await;
            if !session.is_loaded() {
                return Err(Error::NoImageLoaded);
            }
            session.set_adjustment(field);
            session.render_job(false)?
        };
        self.log_action(UserAction::AdjustParameter {
            field: field.name().to_string(),
        });
        self.schedule_commit();

        let rendered = self.run_job(job).await?;
        let filter_path = rendered.filter_path.clone();
        match self.session.lock().await.commit_preview(rendered) {
            Ok(()) => {}
            Err(Error::StaleResult) => return Ok(()),
            Err(err) => return Err(err),
        }
        self.report_filter_path(&filter_path);
        Ok(())
    }

    /// Commits a pending slider change now.
    ///
    /// Returns `Ok(false)` when nothing was pending, or when a stroke or
    /// crop already baked the pending change in.
    ///
    /// # Errors
    ///
    /// Propagates render failures, or [`Error::StaleResult`] if the session
    /// changed while the commit rendered.
    pub async fn flush(&self) -> Result<bool> {
        let Some(pending) = self.pending_slot().take() else {
            return Ok(false);
        };
        pending.task.abort();
        self.commit_if_uncommitted().await
    }

    /// Drops a pending slider commit without recording it.
    ///
    /// Returns true if a commit was pending.
    pub fn cancel_pending(&self) -> bool {
        match self.pending_slot().take() {
            Some(pending) => {
                pending.task.abort();
                tracing::debug!(ticket = pending.ticket, "pending commit cancelled");
                true
            }
            None => false,
        }
    }

    /// Renders the current parameters and records the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoImageLoaded`] before the first load, or
    /// [`Error::StaleResult`] if the session changed while rendering.
    pub async fn apply_adjustments(&self) -> Result<()> {
        self.cancel_pending();
        self.log_action(UserAction::ApplyAdjustments);
        self.commit_adjustments().await
    }

    async fn commit_adjustments(&self) -> Result<()> {
        let job = self.session.lock().await.render_job(false)?;
        let rendered = self.run_job(job).await?;
        let filter_path = rendered.filter_path.clone();
        self.session
            .lock()
            .await
            .commit_render(rendered, EditLabel::Adjust)?;
        self.report_filter_path(&filter_path);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Session operations
    // -------------------------------------------------------------------------

    /// Switches tools. A pending slider commit is dropped along with its
    /// preview.
    pub async fn set_tool(&self, tool: Tool) {
        self.cancel_pending();
        self.log_action(UserAction::SelectTool {
            tool: tool.name().to_string(),
        });
        self.session.lock().await.set_tool(tool);
    }

    /// Returns false at the oldest entry.
    pub async fn undo(&self) -> bool {
        self.cancel_pending();
        self.log_action(UserAction::Undo);
        self.session.lock().await.perform_undo()
    }

    /// Returns false at the newest entry.
    pub async fn redo(&self) -> bool {
        self.cancel_pending();
        self.log_action(UserAction::Redo);
        self.session.lock().await.perform_redo()
    }

    /// Runs `extractor` on the current image off the async runtime and
    /// stores the text it returns.
    ///
    /// # Errors
    ///
    /// - [`Error::NoImageLoaded`] before the first load
    /// - [`Error::Extraction`] if the collaborator fails
    pub async fn extract_text(&self, extractor: Arc<dyn TextExtractor>) -> Result<String> {
        self.log_action(UserAction::ExtractText);
        let image = self.session.lock().await.begin_extraction()?;
        let result =
            run_blocking(move || extractor.extract_text(&image).map_err(Error::from)).await;
        self.session.lock().await.finish_extraction(&result);
        if let Err(err) = &result {
            self.notifications().push_error(err);
        }
        result
    }

    /// Flattens and encodes the image, after committing any pending slider
    /// change.
    ///
    /// Returns `None` on failure; the failure is pushed as an error
    /// notification.
    pub async fn save_image(&self, mime: &str, quality: f32) -> Option<Vec<u8>> {
        self.log_action(UserAction::SaveImage {
            format: mime.to_string(),
        });
        match self.flush().await {
            Ok(_) | Err(Error::StaleResult) => {}
            Err(err) => {
                self.notifications().push_error(&err);
                return None;
            }
        }

        let session = Arc::clone(&self.session).lock_owned().await;
        let format = mime.to_string();
        let started = Instant::now();
        let result = run_blocking(move || {
            let mut session = session;
            let mut exporter = Exporter::new(&mut session);
            exporter.save_image(&format, quality)
        })
        .await;

        match result {
            Ok(bytes) => {
                self.log_operation(EditorOperation::Export {
                    duration_ms: elapsed_ms(started),
                    format: mime.to_string(),
                    bytes: bytes.len(),
                });
                Some(bytes)
            }
            Err(err) => {
                self.notifications().push_error(&err);
                None
            }
        }
    }

    /// Drops any pending commit and releases the session buffers.
    pub async fn close(&self) {
        self.cancel_pending();
        self.session.lock().await.close();
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn pending_slot(&self) -> std::sync::MutexGuard<'_, Option<PendingCommit>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces any scheduled commit with one that fires after the debounce.
    fn schedule_commit(&self) {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed) + 1;
        let handle = self.clone();
        let delay = self.debounce;

        let mut slot = self.pending_slot();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !handle.take_pending(ticket) {
                return;
            }
            match handle.commit_if_uncommitted().await {
                Ok(true) => tracing::debug!(ticket, "debounced commit recorded"),
                Ok(false) => tracing::debug!(ticket, "nothing left to commit"),
                Err(Error::StaleResult | Error::NoImageLoaded) => {
                    tracing::debug!(ticket, "debounced commit dropped");
                }
                Err(err) => {
                    tracing::warn!(error = %err, "debounced commit failed");
                    handle.notifications().push_error(&err);
                }
            }
        });
        if let Some(previous) = slot.replace(PendingCommit { ticket, task }) {
            previous.task.abort();
        }
    }

    /// Commits the live parameters unless a stroke or crop already baked
    /// them in. Returns true if an entry was recorded.
    async fn commit_if_uncommitted(&self) -> Result<bool> {
        if !self.session.lock().await.has_uncommitted_adjustments() {
            return Ok(false);
        }
        self.commit_adjustments().await?;
        Ok(true)
    }

    /// Clears the slot if it still holds `ticket`.
    fn take_pending(&self, ticket: u64) -> bool {
        let mut slot = self.pending_slot();
        if slot.as_ref().is_some_and(|pending| pending.ticket == ticket) {
            *slot = None;
            true
        } else {
            false
        }
    }

    async fn run_job(&self, job: RenderJob) -> Result<Rendered> {
        let started = Instant::now();
        let rendered = run_blocking(move || job.run()).await?;
        self.log_operation(EditorOperation::Render {
            duration_ms: elapsed_ms(started),
            filter_path: rendered.filter_path.label().to_string(),
        });
        Ok(rendered)
    }

    /// Warns once about a degraded filter while the warning is still shown.
    fn report_filter_path(&self, path: &FilterPath) {
        let Some(reason) = path.reason() else {
            return;
        };
        self.notifications().warn_once(
            WarningType::FilterDegraded,
            Notification::warning(FILTER_DEGRADED_KEY)
                .with_arg("path", path.label())
                .with_arg("reason", reason),
        );
    }

    fn log_action(&self, action: UserAction) {
        if let Some(handle) = &self.diagnostics {
            handle.log_action(action);
        }
    }

    fn log_operation(&self, operation: EditorOperation) {
        if let Some(handle) = &self.diagnostics {
            handle.log_operation(operation);
        }
    }
}

/// Runs `work` on the blocking pool.
async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| Error::Io(format!("background task failed: {e}")))?
}

#[allow(clippy::cast_possible_truncation)] // Duration in ms fits comfortably in u64
fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
