// SPDX-License-Identifier: MPL-2.0
//! Edit session: the orchestrator around the raster engine.
//!
//! This module follows a "state down, messages up" pattern: callers either
//! call the operations directly or route a [`Message`] through
//! [`EditSession::update`] and react to the returned [`Event`].
//!
//! Every full recompute starts from the immutable original. Text overlays
//! stay a separate live layer until export (or an explicit final render),
//! while strokes are baked into the pixels as soon as they end.
//!
//! Every observable mutation bumps [`EditSession::revision`], which is the
//! re-render signal for whatever presents the session.

mod export;
pub mod history;
mod messages;
pub mod overlay;
mod pipeline;
pub mod recipe;
pub mod service;
mod state;

pub use export::Exporter;
pub use history::HistoryStack;
pub use messages::{CanvasMessage, Event, Message, OverlayMessage, SidebarMessage};
pub use overlay::{Annotation, CropArea, DrawPath, OverlayId, OverlayStore, TextOverlay};
pub use pipeline::{RenderJob, Rendered};
pub use recipe::Recipe;
pub use service::SessionHandle;
pub use state::{CropState, DragTarget, OverlayDrag, TextInput, Tool};

use crate::config::Config;
use crate::domain::editing::AdjustmentParameters;
use crate::media::raster::{
    FilterPath, PercentPoint, RasterEngine, ShadowStyle, StrokeStyle, TextStyle,
};
use crate::media::DecodeLimits;
use image_rs::RgbaImage;
use std::sync::Arc;
use std::time::Duration;

/// Why a history entry was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditLabel {
    Load,
    Adjust,
    TextRender,
    Crop,
    Stroke,
}

impl EditLabel {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            EditLabel::Load => "load",
            EditLabel::Adjust => "adjust",
            EditLabel::TextRender => "text-render",
            EditLabel::Crop => "crop",
            EditLabel::Stroke => "stroke",
        }
    }
}

/// One rendered snapshot in the undo/redo log.
///
/// Besides the pixels, an entry remembers the original it was rendered from
/// and the parameters that produced it, so stepping across a crop or a
/// stroke puts the session back on a coherent base.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub image: Arc<RgbaImage>,
    pub base: Arc<RgbaImage>,
    pub params: AdjustmentParameters,
    pub label: EditLabel,
}

/// Settings the session reads from [`Config`].
#[derive(Debug, Clone)]
pub struct EditorSettings {
    pub history_size: usize,
    pub commit_debounce: Duration,
    pub export_format: String,
    pub export_quality: f32,
    /// Font-size multiplier for baked text when no preview width is known.
    pub font_scale: f32,
    pub limits: DecodeLimits,
    pub text_style: TextStyle,
    pub shadow: ShadowStyle,
    pub stroke: StrokeStyle,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for EditorSettings {
    fn from(config: &Config) -> Self {
        Self {
            history_size: config.history.max_size,
            commit_debounce: Duration::from_millis(config.adjustments.commit_debounce_ms),
            export_format: config.export.format.clone(),
            export_quality: config.export.quality,
            font_scale: config.export.font_scale,
            limits: DecodeLimits::from(&config.limits),
            text_style: TextStyle::from(&config.text),
            shadow: ShadowStyle::from(&config.text),
            stroke: StrokeStyle::from(&config.draw),
        }
    }
}

/// State of one image being edited.
// Allow struct_excessive_bools: the flags mirror independent UI states.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug)]
pub struct EditSession {
    engine: RasterEngine,
    /// The image as loaded; `reset_editor` goes back to it.
    loaded: Option<Arc<RgbaImage>>,
    /// Result of the last committed pipeline run.
    current: Option<Arc<RgbaImage>>,
    /// Live slider preview, shown instead of `current` until commit/cancel.
    preview: Option<Arc<RgbaImage>>,
    params: AdjustmentParameters,
    overlays: OverlayStore,
    history: HistoryStack<HistoryEntry>,
    tool: Tool,
    crop: CropState,
    text_input: Option<TextInput>,
    drag: Option<OverlayDrag>,
    pending_annotation: Option<PercentPoint>,
    settings: EditorSettings,
    text_layer_visible: bool,
    /// Width the preview is displayed at, for export font calibration.
    preview_width: Option<f32>,
    last_filter_path: Option<FilterPath>,
    extracted_text: Option<String>,
    extracting_text: bool,
    revision: u64,
    /// Bumped whenever the inputs of a render change (original or params).
    generation: u64,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl EditSession {
    #[must_use]
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            engine: RasterEngine::new(settings.limits),
            loaded: None,
            current: None,
            preview: None,
            params: AdjustmentParameters::default(),
            overlays: OverlayStore::new(),
            history: HistoryStack::new(settings.history_size),
            tool: Tool::default(),
            crop: CropState::default(),
            text_input: None,
            drag: None,
            pending_annotation: None,
            settings,
            text_layer_visible: true,
            preview_width: None,
            last_filter_path: None,
            extracted_text: None,
            extracting_text: false,
            revision: 0,
            generation: 0,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(EditorSettings::from(config))
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Monotonic counter bumped by every observable mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn touch(&mut self) {
        self.revision += 1;
    }

    /// Marks the render inputs as changed; in-flight renders become stale.
    pub(crate) fn invalidate(&mut self) {
        self.generation += 1;
        self.revision += 1;
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    #[must_use]
    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    #[must_use]
    pub fn params(&self) -> &AdjustmentParameters {
        &self.params
    }

    /// The original every recompute starts from.
    #[must_use]
    pub fn original(&self) -> Option<Arc<RgbaImage>> {
        self.engine.original().ok()
    }

    #[must_use]
    pub fn current(&self) -> Option<&Arc<RgbaImage>> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn preview(&self) -> Option<&Arc<RgbaImage>> {
        self.preview.as_ref()
    }

    /// What should be on screen: the preview if any, else `current`.
    #[must_use]
    pub fn display_image(&self) -> Option<&Arc<RgbaImage>> {
        self.preview.as_ref().or(self.current.as_ref())
    }

    /// Pixel size of the displayed image, `(1, 1)` before a load.
    #[must_use]
    pub fn display_size(&self) -> (u32, u32) {
        self.display_image().map_or((1, 1), |image| image.dimensions())
    }

    #[must_use]
    pub fn overlays(&self) -> &OverlayStore {
        &self.overlays
    }

    #[must_use]
    pub fn history(&self) -> &HistoryStack<HistoryEntry> {
        &self.history
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    #[must_use]
    pub fn crop_area(&self) -> Option<CropArea> {
        self.crop.area()
    }

    #[must_use]
    pub fn text_input(&self) -> Option<&TextInput> {
        self.text_input.as_ref()
    }

    #[must_use]
    pub fn drag(&self) -> Option<&OverlayDrag> {
        self.drag.as_ref()
    }

    #[must_use]
    pub fn pending_annotation(&self) -> Option<PercentPoint> {
        self.pending_annotation
    }

    /// False only while an export has the live text layer hidden.
    #[must_use]
    pub fn text_layer_visible(&self) -> bool {
        self.text_layer_visible
    }

    /// How the most recent render's filter stage went.
    #[must_use]
    pub fn last_filter_path(&self) -> Option<&FilterPath> {
        self.last_filter_path.as_ref()
    }

    #[must_use]
    pub fn extracted_text(&self) -> Option<&str> {
        self.extracted_text.as_deref()
    }

    #[must_use]
    pub fn is_extracting_text(&self) -> bool {
        self.extracting_text
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Installs the external hue transcoder used by the hue-rotate filters.
    pub fn set_transcoder(
        &mut self,
        transcoder: Option<Arc<dyn crate::application::port::HueTranscoder>>,
    ) {
        self.engine.set_transcoder(transcoder);
        self.invalidate();
    }

    /// Records the width the preview is displayed at. Export then scales
    /// baked text by `image_width / display_width`.
    pub fn set_preview_width(&mut self, width: Option<f32>) {
        self.preview_width = width.filter(|w| w.is_finite() && *w > 0.0);
        self.touch();
    }

    /// Multiplier from preview font pixels to pixels of an image
    /// `image_width` wide.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn export_font_scale(&self, image_width: u32) -> f32 {
        match self.preview_width {
            Some(display_width) => image_width as f32 / display_width,
            None => self.settings.font_scale,
        }
    }

    /// Sets the default style for new text overlays.
    pub fn set_default_text_style(&mut self, style: TextStyle) {
        self.settings.text_style = style;
        self.touch();
    }

    /// Sets the stroke style for new paths.
    pub fn set_stroke_style(&mut self, style: StrokeStyle) {
        self.settings.stroke = style;
        self.touch();
    }
}
