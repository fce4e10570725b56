// SPDX-License-Identifier: MPL-2.0
//! Message routing helpers that keep the session facade slim.

use crate::editor::{
    CanvasMessage, DragTarget, EditSession, Event, Message, OverlayMessage, SidebarMessage, Tool,
};
use crate::error::Result;
use crate::media::raster::PercentPoint;

impl EditSession {
    /// Applies one message and reports what the presenter should react to.
    pub fn update(&mut self, message: Message) -> Event {
        match message {
            Message::Sidebar(message) => self.handle_sidebar_message(message),
            Message::Canvas(message) => self.handle_canvas_message(message),
            Message::Overlay(message) => self.handle_overlay_message(message),
        }
    }

    pub(crate) fn handle_sidebar_message(&mut self, message: SidebarMessage) -> Event {
        match message {
            SidebarMessage::SelectTool(tool) => {
                self.set_tool(tool);
                Event::None
            }
            SidebarMessage::AdjustmentChanged(field) => {
                let result = self.apply_quick_adjustment(field);
                self.render_outcome(result, Event::Rendered)
            }
            SidebarMessage::ApplyAdjustments => {
                let result = self.apply_adjustments();
                self.render_outcome(result, Event::HistoryChanged)
            }
            SidebarMessage::ResetAdjustments => {
                self.reset_adjustments();
                Event::None
            }
            SidebarMessage::RenderTextOverlays { final_render } => {
                let result = self.apply_text_overlays(final_render);
                self.render_outcome(result, Event::HistoryChanged)
            }
            SidebarMessage::SetCropArea(area) => {
                self.set_crop_area(area);
                Event::None
            }
            SidebarMessage::ApplyCrop => match self.apply_crop() {
                Ok(true) => Event::HistoryChanged,
                Ok(false) => Event::None,
                Err(err) => Self::failed(err),
            },
            SidebarMessage::Undo => history_event(self.perform_undo()),
            SidebarMessage::Redo => history_event(self.perform_redo()),
            SidebarMessage::ResetEditor => match self.reset_editor() {
                Ok(()) => Event::HistoryChanged,
                Err(err) => Self::failed(err),
            },
            SidebarMessage::Save => {
                if self.is_loaded() {
                    self.cancel_interaction();
                    Event::SaveRequested
                } else {
                    Event::None
                }
            }
        }
    }

    pub(crate) fn handle_canvas_message(&mut self, message: CanvasMessage) -> Event {
        match message {
            CanvasMessage::PointerDown(point) => self.pointer_down(point),
            CanvasMessage::PointerMove(point) => self.pointer_move(point),
            CanvasMessage::PointerUp(point) => self.pointer_up(point),
            CanvasMessage::CommitTextInput(text) => self
                .commit_text_input(&text)
                .map_or(Event::None, Event::TextOverlayAdded),
            CanvasMessage::CommitAnnotation(text) => self
                .commit_annotation(&text)
                .map_or(Event::None, Event::AnnotationAdded),
            CanvasMessage::CancelInteraction => {
                self.cancel_interaction();
                Event::None
            }
            CanvasMessage::PreviewWidthChanged(width) => {
                self.set_preview_width(width);
                Event::None
            }
        }
    }

    pub(crate) fn handle_overlay_message(&mut self, message: OverlayMessage) -> Event {
        match message {
            OverlayMessage::Select(id) => self.select_overlay(id),
            OverlayMessage::UpdateText { id, text } => {
                self.update_text_overlay(id, &text);
            }
            OverlayMessage::SetStyle { id, style } => {
                self.set_text_overlay_style(id, style);
            }
            OverlayMessage::Move { id, position } => {
                if !self.move_text_overlay(id, position) {
                    self.move_annotation(id, position);
                }
            }
            OverlayMessage::DeleteText(id) => {
                self.delete_text_overlay(id);
            }
            OverlayMessage::UpdateAnnotation { id, text } => {
                self.update_annotation(id, &text);
            }
            OverlayMessage::DeleteAnnotation(id) => {
                self.delete_annotation(id);
            }
        }
        Event::None
    }

    // -------------------------------------------------------------------------
    // Pointer routing
    // -------------------------------------------------------------------------

    /// Pointer pressed on the image.
    ///
    /// - Crop: anchors a new rectangle
    /// - Draw: starts a stroke
    /// - Text: grabs the overlay under the pointer, else opens a text input
    /// - Select: grabs any overlay under the pointer, else deselects
    /// - Annotate: opens a pending annotation
    pub fn pointer_down(&mut self, point: PercentPoint) -> Event {
        let point = point.clamped();
        match self.tool {
            Tool::Crop => {
                self.crop.begin(point);
                self.touch();
            }
            Tool::Draw => {
                let style = self.settings.stroke.clone();
                self.overlays.begin_path(point, &style);
                self.touch();
            }
            Tool::Text => {
                let under = self.overlays.hit_test_text(point, self.display_size());
                match under {
                    Some(id) => {
                        self.begin_drag(DragTarget::Text(id), point);
                    }
                    None => self.open_text_input(point),
                }
            }
            Tool::Select => match self.overlay_at(point) {
                Some(target) => {
                    self.begin_drag(target, point);
                }
                None => self.select_overlay(None),
            },
            Tool::Annotate => self.open_annotation(point),
            Tool::Zoom | Tool::Adjust => {}
        }
        Event::None
    }

    pub fn pointer_move(&mut self, point: PercentPoint) -> Event {
        match self.tool {
            Tool::Crop => {
                if self.crop.update(point) {
                    self.touch();
                }
            }
            Tool::Draw => {
                if self.overlays.extend_path(point) {
                    self.touch();
                }
            }
            Tool::Text | Tool::Select => {
                self.drag_to(point);
            }
            Tool::Annotate | Tool::Zoom | Tool::Adjust => {}
        }
        Event::None
    }

    /// Pointer released. Ends a crop drag or an overlay drag, or bakes the
    /// live stroke.
    pub fn pointer_up(&mut self, point: PercentPoint) -> Event {
        match self.tool {
            Tool::Crop => {
                if self.crop.end(point) {
                    self.touch();
                }
                Event::None
            }
            Tool::Draw => {
                self.overlays.extend_path(point);
                let Some(path) = self.overlays.finish_path() else {
                    return Event::None;
                };
                match self.commit_stroke(&path) {
                    Ok(true) => Event::StrokeCommitted,
                    Ok(false) => Event::None,
                    Err(err) => Self::failed(err),
                }
            }
            Tool::Text | Tool::Select => {
                self.end_drag(point);
                Event::None
            }
            Tool::Annotate | Tool::Zoom | Tool::Adjust => Event::None,
        }
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn render_outcome(&self, result: Result<()>, success: Event) -> Event {
        match result {
            Ok(()) => match self.last_filter_path().and_then(|path| path.reason()) {
                Some(reason) => Event::FilterDegraded {
                    reason: reason.to_string(),
                },
                None => success,
            },
            Err(err) => Self::failed(err),
        }
    }

    fn failed(err: crate::error::Error) -> Event {
        tracing::warn!(error = %err, "editor operation failed");
        Event::Failed(err)
    }
}

fn history_event(moved: bool) -> Event {
    if moved {
        Event::HistoryChanged
    } else {
        Event::None
    }
}
