// SPDX-License-Identifier: MPL-2.0
//! Baking a finished freehand stroke.

use crate::editor::{DrawPath, EditLabel, EditSession};
use crate::error::{Error, Result};

impl EditSession {
    /// Bakes `path` into `current`, after committing a visible preview.
    /// Like a crop, the result becomes the new original. Returns `Ok(false)` for a path without points.
    ///
    /// # Errors
    ///
    /// - [`Error::NoImageLoaded`] before the first load
    /// - [`Error::Svg`] if the stroke cannot be rendered
    pub fn commit_stroke(&mut self, path: &DrawPath) -> Result<bool> {
        if path.points.is_empty() {
            return Ok(false);
        }
        self.commit_visible_preview()?;
        let current = self.current.clone().ok_or(Error::NoImageLoaded)?;

        let mut engine = self.engine.fork();
        engine.set_working((*current).clone())?;
        engine.draw_path(&path.points, &path.style())?;
        let stroked = engine.into_result()?;

        tracing::debug!(id = %path.id, points = path.points.len(), "stroke baked");
        self.promote(stroked, EditLabel::Stroke)?;
        Ok(true)
    }
}
