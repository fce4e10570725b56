// SPDX-License-Identifier: MPL-2.0
//! Crop tool state and the destructive crop commit.

use crate::editor::{CropArea, EditLabel, EditSession};
use crate::error::{Error, Result};
use crate::media::raster::PercentPoint;

/// Pending crop rectangle plus the anchor of an in-progress drag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CropState {
    area: Option<CropArea>,
    anchor: Option<PercentPoint>,
}

impl CropState {
    #[must_use]
    pub fn area(&self) -> Option<CropArea> {
        self.area
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    pub(crate) fn begin(&mut self, point: PercentPoint) {
        self.anchor = Some(point.clamped());
        self.area = None;
    }

    pub(crate) fn update(&mut self, point: PercentPoint) -> bool {
        let Some(anchor) = self.anchor else {
            return false;
        };
        self.area = Some(CropArea::from_corners(anchor, point));
        true
    }

    /// Ends the drag. A rectangle without area is dropped.
    pub(crate) fn end(&mut self, point: PercentPoint) -> bool {
        let updated = self.update(point);
        self.anchor = None;
        if self.area.is_some_and(|area| area.is_empty()) {
            self.area = None;
        }
        updated
    }

    pub(crate) fn clear(&mut self) -> bool {
        let had_state = self.area.is_some() || self.anchor.is_some();
        *self = Self::default();
        had_state
    }
}

impl EditSession {
    /// Sets (or clears) the pending crop rectangle directly.
    pub fn set_crop_area(&mut self, area: Option<CropArea>) {
        self.crop = CropState {
            area: area.filter(|area| !area.is_empty()),
            anchor: None,
        };
        self.touch();
    }

    /// Crops `current` to the pending rectangle.
    ///
    /// A visible preview is committed first. The cropped image becomes the
    /// new original and the adjustment parameters return to neutral, since
    /// they are baked into it. Returns
    /// `Ok(false)` without a pending rectangle.
    ///
    /// # Errors
    ///
    /// - [`Error::NoImageLoaded`] before the first load
    /// - [`Error::InvalidCrop`] if the rectangle resolves to no pixels
    pub fn apply_crop(&mut self) -> Result<bool> {
        let Some(area) = self.crop.area() else {
            return Ok(false);
        };
        self.commit_visible_preview()?;
        let current = self.current.clone().ok_or(Error::NoImageLoaded)?;

        let mut engine = self.engine.fork();
        engine.set_working((*current).clone())?;
        engine.crop(area.x, area.y, area.width, area.height)?;
        let cropped = engine.into_result()?;

        tracing::debug!(
            x = area.x,
            y = area.y,
            width = area.width,
            height = area.height,
            "crop applied"
        );
        self.crop.clear();
        self.promote(cropped, EditLabel::Crop)?;
        Ok(true)
    }
}
