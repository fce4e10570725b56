// SPDX-License-Identifier: MPL-2.0
//! Live overlay layer: text overlays, point annotations and the stroke being
//! drawn.
//!
//! Everything here is positioned in percent of the image, so an overlay at
//! (50, 50) stays centered whatever size the image is shown or exported at.
//! Nothing in this module touches pixels; text is baked only on export or
//! an explicit final render, strokes are baked by the session at stroke end.

use crate::media::raster::{PercentPoint, StrokeStyle, TextStyle};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Estimated glyph advance as a fraction of the font size.
const GLYPH_WIDTH_RATIO: f32 = 0.6;
/// Estimated line box height as a fraction of the font size.
const LINE_HEIGHT_RATIO: f32 = 1.4;
/// Minimum hit box width in pixels so short labels stay grabbable.
const MIN_HIT_WIDTH: f32 = 20.0;

/// Identity of a text overlay, annotation or path.
///
/// Ids come from one process-wide counter, so they never collide within a
/// session and never collide across overlay kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OverlayId(u64);

impl OverlayId {
    /// Allocates a fresh id.
    #[must_use]
    pub fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "overlay-{}", self.0)
    }
}

/// Repositionable styled text, kept out of the pixels until export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOverlay {
    pub id: OverlayId,
    /// Horizontal center in percent.
    pub x: f32,
    /// Vertical center in percent.
    pub y: f32,
    pub text: String,
    #[serde(default)]
    pub style: TextStyle,
}

impl TextOverlay {
    #[must_use]
    pub fn position(&self) -> PercentPoint {
        PercentPoint::new(self.x, self.y)
    }

    /// Approximate bounding box in percent: `(left, top, right, bottom)`.
    ///
    /// Glyph metrics are estimated from the font size, which is enough for
    /// picking an overlay under the pointer.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn approximate_bounds(&self, image_size: (u32, u32)) -> (f32, f32, f32, f32) {
        let (width, height) = (image_size.0.max(1) as f32, image_size.1.max(1) as f32);
        let chars = self.text.chars().count().max(1) as f32;
        let box_width = (chars * self.style.font_size * GLYPH_WIDTH_RATIO).max(MIN_HIT_WIDTH);
        let box_height = self.style.font_size * LINE_HEIGHT_RATIO;
        let half_w = box_width / 2.0 / width * 100.0;
        let half_h = box_height / 2.0 / height * 100.0;
        (self.x - half_w, self.y - half_h, self.x + half_w, self.y + half_h)
    }

    fn contains(&self, point: PercentPoint, image_size: (u32, u32)) -> bool {
        let (left, top, right, bottom) = self.approximate_bounds(image_size);
        (left..=right).contains(&point.x) && (top..=bottom).contains(&point.y)
    }
}

/// Reviewer note pinned to a point. Never baked into pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: OverlayId,
    pub x: f32,
    pub y: f32,
    pub text: String,
}

impl Annotation {
    #[must_use]
    pub fn position(&self) -> PercentPoint {
        PercentPoint::new(self.x, self.y)
    }
}

/// Freehand stroke. Lives only while being drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawPath {
    pub id: OverlayId,
    pub points: Vec<PercentPoint>,
    pub stroke_width: f32,
    pub color: String,
}

impl DrawPath {
    #[must_use]
    pub fn new(start: PercentPoint, style: &StrokeStyle) -> Self {
        Self {
            id: OverlayId::next(),
            points: vec![start.clamped()],
            stroke_width: style.width,
            color: style.color.clone(),
        }
    }

    #[must_use]
    pub fn style(&self) -> StrokeStyle {
        StrokeStyle {
            width: self.stroke_width,
            color: self.color.clone(),
        }
    }
}

/// Pending crop rectangle in percent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropArea {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CropArea {
    /// Normalized rectangle spanning two corners, clamped to the image.
    #[must_use]
    pub fn from_corners(a: PercentPoint, b: PercentPoint) -> Self {
        let (a, b) = (a.clamped(), b.clamped());
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    /// Returns true when the rectangle has no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Collections of live overlays plus the selection.
#[derive(Debug, Clone, Default)]
pub struct OverlayStore {
    texts: Vec<TextOverlay>,
    annotations: Vec<Annotation>,
    active_path: Option<DrawPath>,
    selected: Option<OverlayId>,
}

impl OverlayStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Text overlays
    // -------------------------------------------------------------------------

    /// Adds a text overlay at `position` and selects it.
    pub fn add_text_overlay(
        &mut self,
        position: PercentPoint,
        text: impl Into<String>,
        style: TextStyle,
    ) -> OverlayId {
        let position = position.clamped();
        let id = OverlayId::next();
        self.texts.push(TextOverlay {
            id,
            x: position.x,
            y: position.y,
            text: text.into(),
            style,
        });
        self.selected = Some(id);
        id
    }

    #[must_use]
    pub fn text_overlay(&self, id: OverlayId) -> Option<&TextOverlay> {
        self.texts.iter().find(|t| t.id == id)
    }

    fn text_overlay_mut(&mut self, id: OverlayId) -> Option<&mut TextOverlay> {
        self.texts.iter_mut().find(|t| t.id == id)
    }

    /// Text overlays in paint order (last is on top).
    #[must_use]
    pub fn text_overlays(&self) -> &[TextOverlay] {
        &self.texts
    }

    pub fn update_text(&mut self, id: OverlayId, text: impl Into<String>) -> bool {
        let Some(overlay) = self.text_overlay_mut(id) else {
            return false;
        };
        overlay.text = text.into();
        true
    }

    pub fn set_text_style(&mut self, id: OverlayId, style: TextStyle) -> bool {
        let Some(overlay) = self.text_overlay_mut(id) else {
            return false;
        };
        overlay.style = style;
        true
    }

    /// Moves an overlay; the position is clamped to 0–100 %.
    pub fn move_text_overlay(&mut self, id: OverlayId, position: PercentPoint) -> bool {
        let Some(overlay) = self.text_overlay_mut(id) else {
            return false;
        };
        let position = position.clamped();
        overlay.x = position.x;
        overlay.y = position.y;
        true
    }

    /// Deletes an overlay, clearing the selection if it pointed at it.
    pub fn delete_text_overlay(&mut self, id: OverlayId) -> bool {
        let before = self.texts.len();
        self.texts.retain(|t| t.id != id);
        let removed = self.texts.len() != before;
        if removed && self.selected == Some(id) {
            self.selected = None;
        }
        removed
    }

    /// Topmost text overlay whose estimated box contains `point`.
    #[must_use]
    pub fn hit_test_text(&self, point: PercentPoint, image_size: (u32, u32)) -> Option<OverlayId> {
        self.texts
            .iter()
            .rev()
            .find(|t| t.contains(point, image_size))
            .map(|t| t.id)
    }

    // -------------------------------------------------------------------------
    // Annotations
    // -------------------------------------------------------------------------

    pub fn add_annotation(&mut self, position: PercentPoint, text: impl Into<String>) -> OverlayId {
        let position = position.clamped();
        let id = OverlayId::next();
        self.annotations.push(Annotation {
            id,
            x: position.x,
            y: position.y,
            text: text.into(),
        });
        id
    }

    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    #[must_use]
    pub fn annotation(&self, id: OverlayId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    pub fn update_annotation(&mut self, id: OverlayId, text: impl Into<String>) -> bool {
        let Some(annotation) = self.annotations.iter_mut().find(|a| a.id == id) else {
            return false;
        };
        annotation.text = text.into();
        true
    }

    pub fn move_annotation(&mut self, id: OverlayId, position: PercentPoint) -> bool {
        let Some(annotation) = self.annotations.iter_mut().find(|a| a.id == id) else {
            return false;
        };
        let position = position.clamped();
        annotation.x = position.x;
        annotation.y = position.y;
        true
    }

    pub fn delete_annotation(&mut self, id: OverlayId) -> bool {
        let before = self.annotations.len();
        self.annotations.retain(|a| a.id != id);
        let removed = self.annotations.len() != before;
        if removed && self.selected == Some(id) {
            self.selected = None;
        }
        removed
    }

    /// Topmost annotation within `tolerance` percent of `point`.
    #[must_use]
    pub fn hit_test_annotation(&self, point: PercentPoint, tolerance: f32) -> Option<OverlayId> {
        self.annotations
            .iter()
            .rev()
            .find(|a| (a.x - point.x).abs() <= tolerance && (a.y - point.y).abs() <= tolerance)
            .map(|a| a.id)
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn selected(&self) -> Option<OverlayId> {
        self.selected
    }

    /// Selects an existing overlay or annotation; unknown ids clear the
    /// selection.
    pub fn select(&mut self, id: Option<OverlayId>) {
        self.selected = id.filter(|id| {
            self.text_overlay(*id).is_some() || self.annotation(*id).is_some()
        });
    }

    // -------------------------------------------------------------------------
    // Live stroke
    // -------------------------------------------------------------------------

    /// Starts a new stroke, discarding any unfinished one.
    pub fn begin_path(&mut self, start: PercentPoint, style: &StrokeStyle) -> OverlayId {
        let path = DrawPath::new(start, style);
        let id = path.id;
        self.active_path = Some(path);
        id
    }

    /// Appends a point to the live stroke. Returns false without one.
    pub fn extend_path(&mut self, point: PercentPoint) -> bool {
        let Some(path) = self.active_path.as_mut() else {
            return false;
        };
        let point = point.clamped();
        if path.points.last() != Some(&point) {
            path.points.push(point);
        }
        true
    }

    /// Ends the live stroke and hands it over for baking.
    pub fn finish_path(&mut self) -> Option<DrawPath> {
        self.active_path.take()
    }

    /// Drops the live stroke without baking it.
    pub fn cancel_path(&mut self) -> bool {
        self.active_path.take().is_some()
    }

    #[must_use]
    pub fn active_path(&self) -> Option<&DrawPath> {
        self.active_path.as_ref()
    }

    /// Removes everything, including the selection and the live stroke.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty() && self.annotations.is_empty() && self.active_path.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(font_size: f32) -> TextStyle {
        TextStyle {
            font_size,
            ..TextStyle::default()
        }
    }

    #[test]
    fn overlay_ids_are_unique() {
        let a = OverlayId::next();
        let b = OverlayId::next();
        assert_ne!(a, b);
        assert!(b.value() > a.value());
    }

    #[test]
    fn add_text_overlay_selects_it() {
        let mut store = OverlayStore::new();
        let id = store.add_text_overlay(PercentPoint::new(50.0, 50.0), "Hi", style(24.0));
        assert_eq!(store.selected(), Some(id));
        assert_eq!(store.text_overlays().len(), 1);
        assert_eq!(store.text_overlay(id).map(|t| t.text.as_str()), Some("Hi"));
    }

    #[test]
    fn deleting_selected_overlay_clears_selection() {
        let mut store = OverlayStore::new();
        let first = store.add_text_overlay(PercentPoint::new(10.0, 10.0), "a", style(24.0));
        let second = store.add_text_overlay(PercentPoint::new(20.0, 20.0), "b", style(24.0));
        assert_eq!(store.selected(), Some(second));

        assert!(store.delete_text_overlay(first));
        assert_eq!(store.selected(), Some(second));

        assert!(store.delete_text_overlay(second));
        assert_eq!(store.selected(), None);
        assert!(!store.delete_text_overlay(second));
    }

    #[test]
    fn deleting_selected_annotation_clears_selection() {
        let mut store = OverlayStore::new();
        let id = store.add_annotation(PercentPoint::new(30.0, 30.0), "check spelling");
        store.select(Some(id));
        assert_eq!(store.selected(), Some(id));
        assert!(store.delete_annotation(id));
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn move_clamps_to_image() {
        let mut store = OverlayStore::new();
        let id = store.add_text_overlay(PercentPoint::new(50.0, 50.0), "x", style(24.0));
        assert!(store.move_text_overlay(id, PercentPoint::new(140.0, -20.0)));
        let overlay = store.text_overlay(id).expect("overlay exists");
        assert_eq!((overlay.x, overlay.y), (100.0, 0.0));
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let mut store = OverlayStore::new();
        let ghost = OverlayId::next();
        assert!(!store.update_text(ghost, "x"));
        assert!(!store.move_text_overlay(ghost, PercentPoint::default()));
        assert!(!store.update_annotation(ghost, "x"));
        store.select(Some(ghost));
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn hit_test_prefers_topmost_overlay() {
        let mut store = OverlayStore::new();
        let below = store.add_text_overlay(PercentPoint::new(50.0, 50.0), "Hello", style(24.0));
        let above = store.add_text_overlay(PercentPoint::new(51.0, 50.0), "Hello", style(24.0));
        let hit = store.hit_test_text(PercentPoint::new(50.5, 50.0), (800, 600));
        assert_eq!(hit, Some(above));
        assert_ne!(hit, Some(below));
    }

    #[test]
    fn hit_test_misses_far_points() {
        let mut store = OverlayStore::new();
        store.add_text_overlay(PercentPoint::new(50.0, 50.0), "Hi", style(24.0));
        assert_eq!(store.hit_test_text(PercentPoint::new(5.0, 5.0), (800, 600)), None);
    }

    #[test]
    fn bounds_scale_with_font_and_text_length() {
        let mut store = OverlayStore::new();
        let id = store.add_text_overlay(PercentPoint::new(50.0, 50.0), "0123456789", style(20.0));
        let (left, top, right, bottom) = store
            .text_overlay(id)
            .expect("overlay exists")
            .approximate_bounds((1000, 1000));
        // 10 chars * 20px * 0.6 = 120px wide, 28px high.
        assert!((right - left - 12.0).abs() < 1e-3);
        assert!((bottom - top - 2.8).abs() < 1e-3);
    }

    #[test]
    fn path_lifecycle() {
        let mut store = OverlayStore::new();
        assert!(!store.extend_path(PercentPoint::new(1.0, 1.0)));

        store.begin_path(PercentPoint::new(10.0, 10.0), &StrokeStyle::default());
        assert!(store.extend_path(PercentPoint::new(20.0, 20.0)));
        assert!(store.extend_path(PercentPoint::new(20.0, 20.0)));
        assert!(store.extend_path(PercentPoint::new(130.0, 20.0)));

        let path = store.finish_path().expect("path was active");
        assert_eq!(path.points.len(), 3);
        assert_eq!(path.points[2], PercentPoint::new(100.0, 20.0));
        assert!(store.active_path().is_none());
        assert!(store.finish_path().is_none());
    }

    #[test]
    fn crop_area_from_corners_is_normalized() {
        let area = CropArea::from_corners(PercentPoint::new(80.0, 10.0), PercentPoint::new(20.0, 60.0));
        assert_eq!(
            area,
            CropArea {
                x: 20.0,
                y: 10.0,
                width: 60.0,
                height: 50.0
            }
        );
        assert!(!area.is_empty());
        assert!(CropArea::from_corners(PercentPoint::new(5.0, 5.0), PercentPoint::new(5.0, 50.0)).is_empty());
    }

    #[test]
    fn text_overlay_round_trips_through_json() {
        let mut store = OverlayStore::new();
        let id = store.add_text_overlay(PercentPoint::new(25.0, 75.0), "Thanks!", style(32.0));
        let overlay = store.text_overlay(id).expect("overlay exists").clone();
        let json = serde_json::to_string(&overlay).expect("serialize");
        let back: TextOverlay = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, overlay);
    }
}
