// SPDX-License-Identifier: MPL-2.0
//! Editor message/event types re-exported by the facade.

use crate::domain::editing::AdjustmentField;
use crate::editor::{CropArea, OverlayId, Tool};
use crate::error::Error;
use crate::media::raster::{PercentPoint, TextStyle};

/// Tool panel and history controls.
#[derive(Debug, Clone)]
pub enum SidebarMessage {
    SelectTool(Tool),
    /// Slider or picker changed (live preview, no history)
    AdjustmentChanged(AdjustmentField),
    /// Commit current adjustments to history
    ApplyAdjustments,
    /// Reset adjustments to neutral without recomputing
    ResetAdjustments,
    /// Re-render the pipeline, optionally baking the text overlays
    RenderTextOverlays {
        final_render: bool,
    },
    SetCropArea(Option<CropArea>),
    ApplyCrop,
    Undo,
    Redo,
    ResetEditor,
    Save,
}

/// Pointer interaction on the image, in percent coordinates.
#[derive(Debug, Clone)]
pub enum CanvasMessage {
    PointerDown(PercentPoint),
    PointerMove(PercentPoint),
    PointerUp(PercentPoint),
    /// Text typed into the open text-input box
    CommitTextInput(String),
    /// Text typed into the pending annotation
    CommitAnnotation(String),
    CancelInteraction,
    /// Width the preview is displayed at changed
    PreviewWidthChanged(Option<f32>),
}

/// Direct edits of existing overlays.
#[derive(Debug, Clone)]
pub enum OverlayMessage {
    Select(Option<OverlayId>),
    UpdateText { id: OverlayId, text: String },
    SetStyle { id: OverlayId, style: TextStyle },
    Move { id: OverlayId, position: PercentPoint },
    DeleteText(OverlayId),
    UpdateAnnotation { id: OverlayId, text: String },
    DeleteAnnotation(OverlayId),
}

/// Messages accepted by [`EditSession::update`](crate::editor::EditSession::update).
#[derive(Debug, Clone)]
pub enum Message {
    Sidebar(SidebarMessage),
    Canvas(CanvasMessage),
    Overlay(OverlayMessage),
}

impl From<SidebarMessage> for Message {
    fn from(message: SidebarMessage) -> Self {
        Message::Sidebar(message)
    }
}

impl From<CanvasMessage> for Message {
    fn from(message: CanvasMessage) -> Self {
        Message::Canvas(message)
    }
}

impl From<OverlayMessage> for Message {
    fn from(message: OverlayMessage) -> Self {
        Message::Overlay(message)
    }
}

/// Events propagated to the embedding application for side effects.
#[derive(Debug, Clone)]
pub enum Event {
    None,
    /// The displayed image changed
    Rendered,
    /// Undo/redo moved or a new entry was recorded
    HistoryChanged,
    /// A filter fell back or was skipped during the last render
    FilterDegraded {
        reason: String,
    },
    TextOverlayAdded(OverlayId),
    AnnotationAdded(OverlayId),
    /// A stroke was baked into the image
    StrokeCommitted,
    /// Request to export the edited image
    SaveRequested,
    Failed(Error),
}

impl Event {
    /// True for events the presenter should surface to the user.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::Failed(_) | Event::FilterDegraded { .. })
    }
}
