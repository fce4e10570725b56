// SPDX-License-Identifier: MPL-2.0
//! Raster engine: one working buffer plus the immutable original.
//!
//! Every full recompute starts with [`RasterEngine::reset_to_original`], so
//! rounding never accumulates across slider moves. The individual stages are
//! pure functions in the submodules; the engine only sequences them on the
//! working buffer and enforces the "no image loaded" guard.

pub mod adjust;
pub mod filter;
pub mod geometry;
pub mod overlay;

pub use filter::FilterPath;
pub use overlay::{PercentPoint, ShadowStyle, StrokeStyle, TextStamp, TextStyle};

use crate::application::port::HueTranscoder;
use crate::domain::editing::{
    Brightness, Contrast, FilterIntensity, FilterKind, RotationDegrees, Saturation, ZoomPercent,
};
use crate::error::{Error, Result};
use crate::media::image::{self, DecodeLimits};
use image_rs::RgbaImage;
use std::fmt;
use std::sync::Arc;

/// Converts a straight-alpha buffer into a premultiplied pixmap.
///
/// # Errors
///
/// Returns [`Error::Svg`] if the pixmap cannot be allocated.
pub fn rgba_to_pixmap(image: &RgbaImage) -> Result<tiny_skia::Pixmap> {
    let (width, height) = image.dimensions();
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| Error::Svg(format!("cannot allocate {width}x{height} pixmap")))?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = tiny_skia::ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

/// Converts a premultiplied pixmap back into a straight-alpha buffer.
#[must_use]
pub fn pixmap_to_rgba(pixmap: &tiny_skia::Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let color = src.demultiply();
        dst.0 = [color.red(), color.green(), color.blue(), color.alpha()];
    }
    image
}

/// Working buffer plus immutable original.
#[derive(Default)]
pub struct RasterEngine {
    original: Option<Arc<RgbaImage>>,
    working: Option<RgbaImage>,
    transcoder: Option<Arc<dyn HueTranscoder>>,
    limits: DecodeLimits,
}

impl fmt::Debug for RasterEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterEngine")
            .field("original", &self.original.as_ref().map(|i| i.dimensions()))
            .field("working", &self.working.as_ref().map(RgbaImage::dimensions))
            .field("transcoder", &self.transcoder.as_ref().map(|t| t.name()))
            .field("limits", &self.limits)
            .finish()
    }
}

impl RasterEngine {
    #[must_use]
    pub fn new(limits: DecodeLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    /// A scratch engine sharing this engine's original, transcoder and
    /// limits, with no working buffer yet. Used to render off the session
    /// (e.g. on a blocking thread) without disturbing it.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self {
            original: self.original.clone(),
            working: None,
            transcoder: self.transcoder.clone(),
            limits: self.limits,
        }
    }

    /// Installs (or removes) the external hue transcoder.
    pub fn set_transcoder(&mut self, transcoder: Option<Arc<dyn HueTranscoder>>) {
        self.transcoder = transcoder;
    }

    #[must_use]
    pub fn limits(&self) -> DecodeLimits {
        self.limits
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.original.is_some()
    }

    /// Decodes `bytes` and makes the result both the original and the
    /// working buffer. On failure the previous buffers are kept.
    ///
    /// # Errors
    ///
    /// Propagates decode errors, including [`Error::UnsupportedResolution`].
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<Arc<RgbaImage>> {
        let decoded = image::decode(bytes, &self.limits)?;
        Ok(self.install(Arc::new(decoded)))
    }

    /// Same as [`load_image`](Self::load_image) for an already-decoded buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedResolution`] if the buffer exceeds the limits.
    pub fn load_decoded(&mut self, image: Arc<RgbaImage>) -> Result<Arc<RgbaImage>> {
        self.limits.check(image.width(), image.height())?;
        Ok(self.install(image))
    }

    fn install(&mut self, image: Arc<RgbaImage>) -> Arc<RgbaImage> {
        self.working = Some((*image).clone());
        self.original = Some(Arc::clone(&image));
        image
    }

    /// Drops both buffers.
    pub fn unload(&mut self) {
        self.original = None;
        self.working = None;
    }

    /// The immutable original.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoImageLoaded`] before the first load.
    pub fn original(&self) -> Result<Arc<RgbaImage>> {
        self.original.clone().ok_or(Error::NoImageLoaded)
    }

    fn working_mut(&mut self) -> Result<&mut RgbaImage> {
        self.working.as_mut().ok_or(Error::NoImageLoaded)
    }

    /// Replaces the working buffer with a copy of the original.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoImageLoaded`] before the first load.
    pub fn reset_to_original(&mut self) -> Result<()> {
        let original = self.original()?;
        self.working = Some((*original).clone());
        Ok(())
    }

    /// Replaces the working buffer (e.g. with the session's current image
    /// before a destructive crop). The original is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoImageLoaded`] before the first load.
    pub fn set_working(&mut self, image: RgbaImage) -> Result<()> {
        if self.original.is_none() {
            return Err(Error::NoImageLoaded);
        }
        self.working = Some(image);
        Ok(())
    }

    /// Brightness → contrast → saturation on the working buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoImageLoaded`] before the first load.
    pub fn apply_basic_adjustments(
        &mut self,
        brightness: Brightness,
        contrast: Contrast,
        saturation: Saturation,
    ) -> Result<()> {
        adjust::apply_basic(self.working_mut()?, brightness, contrast, saturation);
        Ok(())
    }

    /// Applies a named filter and reports which path produced the pixels.
    ///
    /// Unsupported filters leave the buffer untouched. Hue rotations try the
    /// transcoder first and fall back to the in-process HSL path. If the
    /// fallback fails as well, the pre-filter buffer is kept.
    ///
    /// # Errors
    ///
    /// - [`Error::NoImageLoaded`] before the first load
    /// - [`Error::Filter`] when every hue-rotation path failed
    pub fn apply_filter(&mut self, kind: FilterKind, intensity: FilterIntensity) -> Result<FilterPath> {
        let transcoder = self.transcoder.clone();
        let working = self.working_mut()?;

        if kind.is_none() || intensity.is_zero() {
            return Ok(FilterPath::Noop);
        }
        if kind == FilterKind::Unsupported {
            tracing::debug!("unsupported filter left the buffer untouched");
            return Ok(FilterPath::Skipped);
        }
        let Some(degrees) = kind.hue_shift() else {
            filter::apply_pixel_filter(working, kind, intensity);
            return Ok(FilterPath::Pixel);
        };

        let mut fallback_reason = None;
        if let Some(transcoder) = transcoder {
            match transcoder.rotate_hue(working, degrees) {
                Ok(rotated) => match filter::blend_into(working, &rotated, intensity) {
                    Ok(()) => return Ok(FilterPath::Delegated),
                    Err(err) => fallback_reason = Some(err.to_string()),
                },
                Err(err) => fallback_reason = Some(err.to_string()),
            }
            tracing::warn!(
                transcoder = transcoder.name(),
                reason = fallback_reason.as_deref().unwrap_or_default(),
                "hue transcoder failed, using pixel fallback"
            );
        }

        let rotated = filter::rotate_hue(working, degrees)?;
        filter::blend_into(working, &rotated, intensity)?;
        Ok(match fallback_reason {
            Some(reason) => FilterPath::Fallback { reason },
            None => FilterPath::Pixel,
        })
    }

    /// Rotates the working buffer clockwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoImageLoaded`] before the first load.
    pub fn rotate(&mut self, degrees: RotationDegrees) -> Result<()> {
        let working = self.working_mut()?;
        *working = geometry::rotate(working, degrees)?;
        Ok(())
    }

    /// Centered zoom with an optional offset in percent of the canvas.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoImageLoaded`] before the first load.
    pub fn zoom_and_crop(&mut self, zoom: ZoomPercent, x_offset: f32, y_offset: f32) -> Result<()> {
        let working = self.working_mut()?;
        *working = geometry::zoom_and_crop(working, zoom, x_offset, y_offset)?;
        Ok(())
    }

    /// Crops the working buffer to a percent rectangle.
    ///
    /// # Errors
    ///
    /// - [`Error::NoImageLoaded`] before the first load
    /// - [`Error::InvalidCrop`] if the rectangle has no pixels
    pub fn crop(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
        let working = self.working_mut()?;
        *working = geometry::crop(working, x, y, width, height)?;
        Ok(())
    }

    /// Bakes text into the working buffer.
    ///
    /// # Errors
    ///
    /// - [`Error::NoImageLoaded`] before the first load
    /// - [`Error::Svg`] if the text cannot be rendered
    pub fn add_text(&mut self, stamp: &TextStamp<'_>) -> Result<()> {
        overlay::bake_text(self.working_mut()?, stamp)
    }

    /// Bakes a freehand stroke into the working buffer.
    ///
    /// # Errors
    ///
    /// - [`Error::NoImageLoaded`] before the first load
    /// - [`Error::Svg`] if the stroke cannot be rendered
    pub fn draw_path(&mut self, points: &[PercentPoint], style: &StrokeStyle) -> Result<()> {
        overlay::bake_stroke(self.working_mut()?, points, style)
    }

    /// Snapshot of the working buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoImageLoaded`] before the first load.
    pub fn result(&self) -> Result<Arc<RgbaImage>> {
        self.working
            .as_ref()
            .map(|image| Arc::new(image.clone()))
            .ok_or(Error::NoImageLoaded)
    }

    /// Consumes the engine and returns the working buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoImageLoaded`] if there is no working buffer.
    pub fn into_result(self) -> Result<RgbaImage> {
        self.working.ok_or(Error::NoImageLoaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::TranscoderError;
    use image_rs::Rgba;

    struct FailingTranscoder;

    impl HueTranscoder for FailingTranscoder {
        fn name(&self) -> &str {
            "failing"
        }

        fn rotate_hue(&self, _: &RgbaImage, _: f32) -> std::result::Result<RgbaImage, TranscoderError> {
            Err(TranscoderError::Unavailable)
        }
    }

    struct WrongSizeTranscoder;

    impl HueTranscoder for WrongSizeTranscoder {
        fn name(&self) -> &str {
            "wrong-size"
        }

        fn rotate_hue(&self, _: &RgbaImage, _: f32) -> std::result::Result<RgbaImage, TranscoderError> {
            Ok(RgbaImage::new(1, 1))
        }
    }

    struct PixelTranscoder;

    impl HueTranscoder for PixelTranscoder {
        fn name(&self) -> &str {
            "pixel"
        }

        fn rotate_hue(&self, image: &RgbaImage, degrees: f32) -> std::result::Result<RgbaImage, TranscoderError> {
            filter::rotate_hue(image, degrees).map_err(|e| TranscoderError::Failed(e.to_string()))
        }
    }

    fn loaded_engine() -> RasterEngine {
        let mut engine = RasterEngine::default();
        let image = RgbaImage::from_fn(8, 4, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            Rgba([200, (x * 30) as u8, (y * 60) as u8, 255])
        });
        engine.load_decoded(Arc::new(image)).expect("load should succeed");
        engine
    }

    #[test]
    fn operations_without_image_fail_with_no_image_loaded() {
        let mut engine = RasterEngine::default();
        assert!(matches!(engine.reset_to_original(), Err(Error::NoImageLoaded)));
        assert!(matches!(
            engine.apply_basic_adjustments(Brightness::default(), Contrast::default(), Saturation::default()),
            Err(Error::NoImageLoaded)
        ));
        assert!(matches!(
            engine.apply_filter(FilterKind::Sepia, FilterIntensity::default()),
            Err(Error::NoImageLoaded)
        ));
        assert!(matches!(engine.rotate(RotationDegrees::new(90.0)), Err(Error::NoImageLoaded)));
        assert!(matches!(engine.crop(0.0, 0.0, 50.0, 50.0), Err(Error::NoImageLoaded)));
        assert!(matches!(engine.result(), Err(Error::NoImageLoaded)));
    }

    #[test]
    fn failed_decode_keeps_previous_buffers() {
        let mut engine = loaded_engine();
        let before = engine.original().expect("original");
        assert!(engine.load_image(b"garbage").is_err());
        assert_eq!(*engine.original().expect("original"), *before);
        assert_eq!(*engine.result().expect("working"), *before);
    }

    #[test]
    fn reset_restores_working_from_original() {
        let mut engine = loaded_engine();
        engine
            .apply_basic_adjustments(Brightness::new(150.0), Contrast::default(), Saturation::default())
            .expect("adjust");
        assert_ne!(*engine.result().expect("working"), *engine.original().expect("original"));
        engine.reset_to_original().expect("reset");
        assert_eq!(*engine.result().expect("working"), *engine.original().expect("original"));
    }

    #[test]
    fn adjustments_never_touch_the_original() {
        let mut engine = loaded_engine();
        let original = engine.original().expect("original");
        let snapshot = (*original).clone();
        engine
            .apply_filter(FilterKind::Invert, FilterIntensity::default())
            .expect("filter");
        engine.rotate(RotationDegrees::new(30.0)).expect("rotate");
        assert_eq!(*engine.original().expect("original"), snapshot);
    }

    #[test]
    fn unsupported_filter_is_skipped() {
        let mut engine = loaded_engine();
        let before = engine.result().expect("working");
        let path = engine
            .apply_filter(FilterKind::Unsupported, FilterIntensity::default())
            .expect("skipped filter is not an error");
        assert_eq!(path, FilterPath::Skipped);
        assert_eq!(*engine.result().expect("working"), *before);
    }

    #[test]
    fn hue_rotation_without_transcoder_uses_pixel_path() {
        let mut engine = loaded_engine();
        let path = engine
            .apply_filter(FilterKind::HueRotate90, FilterIntensity::default())
            .expect("filter");
        assert_eq!(path, FilterPath::Pixel);
    }

    #[test]
    fn failing_transcoder_falls_back_with_same_result() {
        let mut reference = loaded_engine();
        reference
            .apply_filter(FilterKind::HueRotate180, FilterIntensity::new(70.0))
            .expect("filter");

        let mut engine = loaded_engine();
        engine.set_transcoder(Some(Arc::new(FailingTranscoder)));
        let path = engine
            .apply_filter(FilterKind::HueRotate180, FilterIntensity::new(70.0))
            .expect("fallback should succeed");

        assert!(matches!(path, FilterPath::Fallback { .. }));
        assert!(path.is_degraded());
        assert_eq!(*engine.result().expect("working"), *reference.result().expect("working"));
    }

    #[test]
    fn wrong_size_transcoder_result_triggers_fallback() {
        let mut engine = loaded_engine();
        engine.set_transcoder(Some(Arc::new(WrongSizeTranscoder)));
        let path = engine
            .apply_filter(FilterKind::HueRotate90, FilterIntensity::default())
            .expect("fallback should succeed");
        assert!(matches!(path, FilterPath::Fallback { .. }));
        assert_eq!(engine.result().expect("working").dimensions(), (8, 4));
    }

    #[test]
    fn working_transcoder_is_delegated() {
        let mut engine = loaded_engine();
        engine.set_transcoder(Some(Arc::new(PixelTranscoder)));
        let path = engine
            .apply_filter(FilterKind::HueRotate270, FilterIntensity::default())
            .expect("filter");
        assert_eq!(path, FilterPath::Delegated);
    }

    #[test]
    fn crop_shrinks_working_buffer() {
        let mut engine = loaded_engine();
        engine.crop(0.0, 0.0, 50.0, 50.0).expect("crop");
        assert_eq!(engine.result().expect("working").dimensions(), (4, 2));
        assert_eq!(engine.original().expect("original").dimensions(), (8, 4));
    }

    #[test]
    fn load_decoded_enforces_limits() {
        let mut engine = RasterEngine::new(DecodeLimits {
            max_dimension: 4,
            max_pixels: 100,
        });
        let result = engine.load_decoded(Arc::new(RgbaImage::new(5, 1)));
        assert!(matches!(result, Err(Error::UnsupportedResolution { .. })));
        assert!(!engine.is_loaded());
    }

    #[test]
    fn fork_shares_original_without_working_buffer() {
        let engine = loaded_engine();
        let mut fork = engine.fork();
        assert!(matches!(fork.result(), Err(Error::NoImageLoaded)));
        fork.reset_to_original().expect("reset");
        assert_eq!(*fork.result().expect("working"), *engine.original().expect("original"));
    }

    #[test]
    fn pixmap_round_trip_is_exact_for_opaque_pixels() {
        let image = RgbaImage::from_fn(3, 3, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            Rgba([(x * 80) as u8, (y * 80) as u8, 7, 255])
        });
        let pixmap = rgba_to_pixmap(&image).expect("pixmap");
        assert_eq!(pixmap_to_rgba(&pixmap), image);
    }
}
