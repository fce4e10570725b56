// SPDX-License-Identifier: MPL-2.0
//! Adjustment recomputes: committed, live preview and text render.

use crate::domain::editing::AdjustmentField;
use crate::editor::{EditLabel, EditSession};
use crate::error::Result;

impl EditSession {
    /// Changes one parameter without rendering. In-flight renders become
    /// stale.
    pub(crate) fn set_adjustment(&mut self, field: AdjustmentField) {
        self.params.set(field);
        self.invalidate();
    }

    /// Recomputes from the original with the current parameters and
    /// commits the result to history. Text overlays are not baked.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoImageLoaded`](crate::error::Error::NoImageLoaded)
    /// before the first load.
    pub fn apply_adjustments(&mut self) -> Result<()> {
        let rendered = self.render_job(false)?.run()?;
        self.commit_render(rendered, EditLabel::Adjust)
    }

    /// Updates one parameter and renders a live preview. Nothing is
    /// recorded in history.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoImageLoaded`](crate::error::Error::NoImageLoaded)
    /// before the first load.
    pub fn apply_quick_adjustment(&mut self, field: AdjustmentField) -> Result<()> {
        self.set_adjustment(field);
        let rendered = self.render_job(false)?.run()?;
        self.commit_preview(rendered)
    }

    /// Runs the pipeline and commits it; with `final_render` the text
    /// overlays are baked into the committed image too.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoImageLoaded`](crate::error::Error::NoImageLoaded)
    /// before the first load, or a text rendering failure.
    pub fn apply_text_overlays(&mut self, final_render: bool) -> Result<()> {
        let label = if final_render {
            EditLabel::TextRender
        } else {
            EditLabel::Adjust
        };
        let rendered = self.render_job(final_render)?.run()?;
        self.commit_render(rendered, label)
    }

    /// Whether the parameters differ from the ones recorded with the
    /// current history entry, or a preview is still on screen.
    #[must_use]
    pub fn has_uncommitted_adjustments(&self) -> bool {
        self.preview.is_some()
            || self
                .history
                .current()
                .is_some_and(|entry| entry.params != self.params)
    }

    /// Commits a visible preview so that edits baked into `current` start
    /// from what is on screen.
    pub(crate) fn commit_visible_preview(&mut self) -> Result<()> {
        if self.preview.is_some() {
            self.apply_adjustments()?;
        }
        Ok(())
    }

    /// Restores neutral parameters. Nothing is recomputed until the next
    /// apply.
    pub fn reset_adjustments(&mut self) {
        self.params.reset();
        self.invalidate();
    }
}
