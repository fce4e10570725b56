// SPDX-License-Identifier: MPL-2.0
//! Text and annotation interaction: input boxes, drags and overlay edits.
//!
//! Every successful edit bumps the session revision; edits addressed to an
//! unknown id are no-ops returning `false`.

use crate::editor::{EditSession, OverlayId};
use crate::media::raster::{PercentPoint, TextStyle};

/// Annotation hit radius, in percent of the image.
pub const ANNOTATION_HIT_TOLERANCE: f32 = 2.0;

/// Open text-input box waiting for its content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextInput {
    pub position: PercentPoint,
}

/// What an overlay drag moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    Text(OverlayId),
    Annotation(OverlayId),
}

impl DragTarget {
    #[must_use]
    pub fn id(self) -> OverlayId {
        match self {
            DragTarget::Text(id) | DragTarget::Annotation(id) => id,
        }
    }
}

/// In-progress drag of an overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayDrag {
    pub target: DragTarget,
    /// Overlay anchor minus grab point, so the overlay does not jump.
    pub offset: (f32, f32),
}

impl EditSession {
    // -------------------------------------------------------------------------
    // Input boxes
    // -------------------------------------------------------------------------

    /// Opens a text-input box at `position`, replacing any open one.
    pub fn open_text_input(&mut self, position: PercentPoint) {
        self.text_input = Some(TextInput {
            position: position.clamped(),
        });
        self.touch();
    }

    /// Turns the open text-input box into a text overlay with the default
    /// style. Blank text just closes the box.
    pub fn commit_text_input(&mut self, text: &str) -> Option<OverlayId> {
        let input = self.text_input.take()?;
        self.touch();
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(self.add_text_overlay(input.position, text))
    }

    /// Opens a pending annotation at `position`.
    pub fn open_annotation(&mut self, position: PercentPoint) {
        self.pending_annotation = Some(position.clamped());
        self.touch();
    }

    /// Turns the pending annotation into a stored one. Blank text discards it.
    pub fn commit_annotation(&mut self, text: &str) -> Option<OverlayId> {
        let position = self.pending_annotation.take()?;
        self.touch();
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(self.add_annotation(position, text))
    }

    // -------------------------------------------------------------------------
    // Overlay edits
    // -------------------------------------------------------------------------

    /// Adds a text overlay with the default style and selects it.
    pub fn add_text_overlay(&mut self, position: PercentPoint, text: &str) -> OverlayId {
        let style = self.settings.text_style.clone();
        self.add_styled_text_overlay(position, text, style)
    }

    pub fn add_styled_text_overlay(
        &mut self,
        position: PercentPoint,
        text: &str,
        style: TextStyle,
    ) -> OverlayId {
        let id = self.overlays.add_text_overlay(position, text, style);
        tracing::debug!(%id, "text overlay added");
        self.touch();
        id
    }

    pub fn update_text_overlay(&mut self, id: OverlayId, text: &str) -> bool {
        let changed = self.overlays.update_text(id, text);
        self.touch_if(changed)
    }

    pub fn set_text_overlay_style(&mut self, id: OverlayId, style: TextStyle) -> bool {
        let changed = self.overlays.set_text_style(id, style);
        self.touch_if(changed)
    }

    pub fn move_text_overlay(&mut self, id: OverlayId, position: PercentPoint) -> bool {
        let changed = self.overlays.move_text_overlay(id, position);
        self.touch_if(changed)
    }

    pub fn delete_text_overlay(&mut self, id: OverlayId) -> bool {
        self.cancel_drag_of(id);
        let changed = self.overlays.delete_text_overlay(id);
        self.touch_if(changed)
    }

    pub fn add_annotation(&mut self, position: PercentPoint, text: &str) -> OverlayId {
        let id = self.overlays.add_annotation(position, text);
        tracing::debug!(%id, "annotation added");
        self.touch();
        id
    }

    pub fn update_annotation(&mut self, id: OverlayId, text: &str) -> bool {
        let changed = self.overlays.update_annotation(id, text);
        self.touch_if(changed)
    }

    pub fn move_annotation(&mut self, id: OverlayId, position: PercentPoint) -> bool {
        let changed = self.overlays.move_annotation(id, position);
        self.touch_if(changed)
    }

    pub fn delete_annotation(&mut self, id: OverlayId) -> bool {
        self.cancel_drag_of(id);
        let changed = self.overlays.delete_annotation(id);
        self.touch_if(changed)
    }

    /// Selects an overlay or annotation; `None` or an unknown id deselects.
    pub fn select_overlay(&mut self, id: Option<OverlayId>) {
        self.overlays.select(id);
        self.touch();
    }

    fn touch_if(&mut self, changed: bool) -> bool {
        if changed {
            self.touch();
        }
        changed
    }

    // -------------------------------------------------------------------------
    // Drags
    // -------------------------------------------------------------------------

    /// Topmost overlay under `point`: text first, then annotations.
    #[must_use]
    pub fn overlay_at(&self, point: PercentPoint) -> Option<DragTarget> {
        let point = point.clamped();
        self.overlays
            .hit_test_text(point, self.display_size())
            .map(DragTarget::Text)
            .or_else(|| {
                self.overlays
                    .hit_test_annotation(point, ANNOTATION_HIT_TOLERANCE)
                    .map(DragTarget::Annotation)
            })
    }

    pub(crate) fn begin_drag(&mut self, target: DragTarget, grab: PercentPoint) -> bool {
        let anchor = match target {
            DragTarget::Text(id) => self.overlays.text_overlay(id).map(|t| t.position()),
            DragTarget::Annotation(id) => self.overlays.annotation(id).map(|a| a.position()),
        };
        let Some(anchor) = anchor else {
            return false;
        };
        let grab = grab.clamped();
        self.overlays.select(Some(target.id()));
        self.drag = Some(OverlayDrag {
            target,
            offset: (anchor.x - grab.x, anchor.y - grab.y),
        });
        self.touch();
        true
    }

    pub(crate) fn drag_to(&mut self, point: PercentPoint) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        let point = point.clamped();
        let position = PercentPoint::new(point.x + drag.offset.0, point.y + drag.offset.1);
        match drag.target {
            DragTarget::Text(id) => self.move_text_overlay(id, position),
            DragTarget::Annotation(id) => self.move_annotation(id, position),
        }
    }

    pub(crate) fn end_drag(&mut self, point: PercentPoint) -> bool {
        let moved = self.drag_to(point);
        self.drag = None;
        moved
    }

    fn cancel_drag_of(&mut self, id: OverlayId) {
        if self.drag.is_some_and(|drag| drag.target.id() == id) {
            self.drag = None;
        }
    }
}
