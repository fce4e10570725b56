// SPDX-License-Identifier: MPL-2.0
//! The fixed adjustment pipeline, packaged so it can run off the session.
//!
//! A [`RenderJob`] is a snapshot (forked engine, parameters, overlays to
//! bake) tagged with the session generation it was taken at. Running it
//! never touches the session; committing the [`Rendered`] result checks the
//! generation first so a late result cannot overwrite newer state.

use super::{EditSession, TextOverlay};
use crate::domain::editing::AdjustmentParameters;
use crate::error::{Error, Result};
use crate::media::raster::{FilterPath, RasterEngine, ShadowStyle, TextStamp};
use image_rs::RgbaImage;
use std::sync::Arc;

/// Everything needed to render the session image once.
#[derive(Debug)]
pub struct RenderJob {
    engine: RasterEngine,
    params: AdjustmentParameters,
    /// Overlays to bake after the pipeline; empty unless final render.
    texts: Vec<TextOverlay>,
    shadow: ShadowStyle,
    /// Font scale is resolved against the rendered width when `None`.
    preview_width: Option<f32>,
    default_font_scale: f32,
    generation: u64,
}

/// Output of a [`RenderJob`].
#[derive(Debug, Clone)]
pub struct Rendered {
    pub image: Arc<RgbaImage>,
    pub filter_path: FilterPath,
    pub generation: u64,
}

impl RenderJob {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn params(&self) -> &AdjustmentParameters {
        &self.params
    }

    /// Runs basic → filter → rotation → zoom from the original, then bakes
    /// the snapshot's text overlays.
    ///
    /// A filter that fails on every path does not abort the run: the stage
    /// is skipped and reported as [`FilterPath::Failed`].
    ///
    /// # Errors
    ///
    /// - [`Error::NoImageLoaded`] if the snapshot has no original
    /// - [`Error::Svg`] if a canvas cannot be allocated or text cannot render
    #[allow(clippy::cast_precision_loss)]
    pub fn run(self) -> Result<Rendered> {
        let RenderJob {
            mut engine,
            params,
            texts,
            shadow,
            preview_width,
            default_font_scale,
            generation,
        } = self;

        engine.reset_to_original()?;

        if !params.basic_is_neutral() {
            engine.apply_basic_adjustments(params.brightness, params.contrast, params.saturation)?;
        }

        let filter_path = if !params.has_filter() {
            FilterPath::Noop
        } else {
            match engine.apply_filter(params.filter, params.filter_intensity) {
                Ok(path) => path,
                Err(Error::Filter(reason)) => {
                    tracing::warn!(filter = params.filter.name(), %reason, "filter failed, stage skipped");
                    FilterPath::Failed { reason }
                }
                Err(err) => return Err(err),
            }
        };

        if !params.rotation.is_zero() {
            engine.rotate(params.rotation)?;
        }
        if !params.zoom.is_neutral() {
            engine.zoom_and_crop(params.zoom, 0.0, 0.0)?;
        }

        let mut image = engine.into_result()?;
        if !texts.is_empty() {
            let font_scale = match preview_width {
                Some(width) => image.width() as f32 / width,
                None => default_font_scale,
            };
            for overlay in &texts {
                crate::media::raster::overlay::bake_text(
                    &mut image,
                    &TextStamp {
                        text: &overlay.text,
                        anchor: overlay.position(),
                        style: &overlay.style,
                        shadow,
                        font_scale,
                    },
                )?;
            }
        }

        tracing::debug!(
            generation,
            width = image.width(),
            height = image.height(),
            baked_texts = texts.len(),
            "pipeline rendered"
        );

        Ok(Rendered {
            image: Arc::new(image),
            filter_path,
            generation,
        })
    }
}

impl EditSession {
    /// Snapshots the session for one pipeline run.
    ///
    /// With `final_render` the live text overlays are baked after the
    /// pipeline; otherwise they stay out of the pixels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoImageLoaded`] before the first load.
    pub fn render_job(&self, final_render: bool) -> Result<RenderJob> {
        self.render_job_with(self.params, final_render)
    }

    pub(crate) fn render_job_with(
        &self,
        params: AdjustmentParameters,
        final_render: bool,
    ) -> Result<RenderJob> {
        if !self.engine.is_loaded() {
            return Err(Error::NoImageLoaded);
        }
        let texts = if final_render {
            self.overlays.text_overlays().to_vec()
        } else {
            Vec::new()
        };
        Ok(RenderJob {
            engine: self.engine.fork(),
            params,
            texts,
            shadow: self.settings.shadow,
            preview_width: self.preview_width,
            default_font_scale: self.settings.font_scale,
            generation: self.generation,
        })
    }

    fn ensure_fresh(&self, rendered: &Rendered) -> Result<()> {
        if rendered.generation == self.generation {
            Ok(())
        } else {
            tracing::debug!(
                expected = self.generation,
                got = rendered.generation,
                "discarding stale render"
            );
            Err(Error::StaleResult)
        }
    }

    /// Commits a pipeline result: it becomes `current`, the preview is
    /// released and a history entry is pushed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StaleResult`] if the render inputs changed (or another
    /// result was committed) since the job was taken; the session is left
    /// untouched.
    pub fn commit_render(&mut self, rendered: Rendered, label: super::EditLabel) -> Result<()> {
        self.ensure_fresh(&rendered)?;
        let base = self.engine.original()?;
        self.history.push(super::HistoryEntry {
            image: Arc::clone(&rendered.image),
            base,
            params: self.params,
            label,
        });
        self.current = Some(rendered.image);
        self.preview = None;
        self.last_filter_path = Some(rendered.filter_path);
        // Anything still rendering was snapshotted before this commit.
        self.invalidate();
        tracing::debug!(label = label.name(), entries = self.history.len(), "render committed");
        Ok(())
    }

    /// Stores a pipeline result as the live preview without recording
    /// history.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StaleResult`] if the render inputs changed since the
    /// job was taken.
    pub fn commit_preview(&mut self, rendered: Rendered) -> Result<()> {
        self.ensure_fresh(&rendered)?;
        self.preview = Some(rendered.image);
        self.last_filter_path = Some(rendered.filter_path);
        self.touch();
        Ok(())
    }
}
