// SPDX-License-Identifier: MPL-2.0
//! Flattening the session into an encoded image.
//!
//! Export never touches `current` or history. The live text layer is hidden
//! for the duration of the render and restored on every exit path, so a
//! failed export leaves the session exactly as it was.

use super::EditSession;
use crate::error::Result;
use crate::media::encode;
use crate::media::raster::overlay::bake_text;
use crate::media::raster::TextStamp;
use image_rs::RgbaImage;
use std::ops::{Deref, DerefMut};

/// Hides the live text layer until dropped.
struct HiddenTextLayer<'s> {
    session: &'s mut EditSession,
    was_visible: bool,
}

impl<'s> HiddenTextLayer<'s> {
    fn new(session: &'s mut EditSession) -> Self {
        let was_visible = session.text_layer_visible;
        session.text_layer_visible = false;
        session.touch();
        Self {
            session,
            was_visible,
        }
    }
}

impl Deref for HiddenTextLayer<'_> {
    type Target = EditSession;

    fn deref(&self) -> &EditSession {
        self.session
    }
}

impl DerefMut for HiddenTextLayer<'_> {
    fn deref_mut(&mut self) -> &mut EditSession {
        self.session
    }
}

impl Drop for HiddenTextLayer<'_> {
    fn drop(&mut self) {
        self.session.text_layer_visible = self.was_visible;
        self.session.touch();
    }
}

/// Renders a session to encoded bytes.
#[derive(Debug)]
pub struct Exporter<'a> {
    session: &'a mut EditSession,
}

impl<'a> Exporter<'a> {
    pub fn new(session: &'a mut EditSession) -> Self {
        Self { session }
    }

    /// Renders the adjustment pipeline into an offscreen buffer and bakes
    /// every text overlay on top of it.
    ///
    /// # Errors
    ///
    /// - [`Error::NoImageLoaded`](crate::error::Error::NoImageLoaded) before
    ///   the first load
    /// - [`Error::Svg`](crate::error::Error::Svg) if an overlay cannot render
    pub fn flatten(&mut self) -> Result<RgbaImage> {
        let session = HiddenTextLayer::new(self.session);
        let rendered = session.render_job(false)?.run()?;
        let mut canvas = (*rendered.image).clone();

        let font_scale = session.export_font_scale(canvas.width());
        let shadow = session.settings().shadow;
        for overlay in session.overlays().text_overlays() {
            bake_text(
                &mut canvas,
                &TextStamp {
                    text: &overlay.text,
                    anchor: overlay.position(),
                    style: &overlay.style,
                    shadow,
                    font_scale,
                },
            )?;
        }
        tracing::debug!(
            overlays = session.overlays().text_overlays().len(),
            font_scale,
            "session flattened"
        );
        Ok(canvas)
    }

    /// Flattens the session and encodes it as `mime`. `quality` (0–1) only
    /// applies to lossy formats.
    ///
    /// # Errors
    ///
    /// Everything [`flatten`](Self::flatten) returns, plus
    /// [`Error::UnsupportedFormat`](crate::error::Error::UnsupportedFormat)
    /// and encoder failures.
    pub fn save_image(&mut self, mime: &str, quality: f32) -> Result<Vec<u8>> {
        let result = self
            .flatten()
            .and_then(|canvas| encode::encode_mime(&canvas, mime, quality));
        match &result {
            Ok(bytes) => tracing::debug!(mime, bytes = bytes.len(), "image exported"),
            Err(err) => tracing::error!(mime, error = %err, "export failed"),
        }
        result
    }

    /// Exports with the configured default format and quality.
    ///
    /// # Errors
    ///
    /// Same as [`save_image`](Self::save_image).
    pub fn save_default(&mut self) -> Result<Vec<u8>> {
        let mime = self.session.settings().export_format.clone();
        let quality = self.session.settings().export_quality;
        self.save_image(&mime, quality)
    }

    /// Commits a final render with the text overlays baked in, then exports.
    ///
    /// # Errors
    ///
    /// Same as [`save_image`](Self::save_image).
    pub fn save_image_with_overlays(&mut self, mime: &str, quality: f32) -> Result<Vec<u8>> {
        self.session.apply_text_overlays(true)?;
        self.save_image(mime, quality)
    }
}

impl EditSession {
    /// Shorthand for [`Exporter::save_image`].
    ///
    /// # Errors
    ///
    /// Same as [`Exporter::save_image`].
    pub fn save_image(&mut self, mime: &str, quality: f32) -> Result<Vec<u8>> {
        Exporter::new(self).save_image(mime, quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use image_rs::Rgba;

    fn session_with(width: u32, height: u32) -> EditSession {
        let mut session = EditSession::default();
        session
            .load_decoded(RgbaImage::from_pixel(width, height, Rgba([90, 120, 150, 255])))
            .expect("load should succeed");
        session
    }

    #[test]
    fn export_without_image_fails() {
        let mut session = EditSession::default();
        match session.save_image("image/png", 1.0) {
            Err(Error::NoImageLoaded) => {}
            other => panic!("expected NoImageLoaded, got {other:?}"),
        }
    }

    #[test]
    fn unsupported_mime_keeps_text_layer_visible() {
        let mut session = session_with(8, 8);
        match session.save_image("image/tiff", 1.0) {
            Err(Error::UnsupportedFormat(mime)) => assert_eq!(mime, "image/tiff"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
        assert!(session.text_layer_visible());
    }

    #[test]
    fn export_leaves_current_and_history_alone() {
        let mut session = session_with(16, 12);
        let before = session.current().cloned().expect("current after load");
        let entries = session.history().len();

        let bytes = session.save_image("image/png", 1.0).expect("export should succeed");
        assert!(!bytes.is_empty());

        let after = session.current().expect("current after export");
        assert!(std::sync::Arc::ptr_eq(&before, after));
        assert_eq!(session.history().len(), entries);
        assert!(session.text_layer_visible());
    }

    #[test]
    fn flatten_without_overlays_matches_pipeline() {
        let mut session = session_with(10, 10);
        session
            .apply_quick_adjustment(crate::domain::editing::AdjustmentField::Brightness(120.0))
            .expect("preview should render");
        let preview = session.preview().cloned().expect("preview");

        let flat = Exporter::new(&mut session).flatten().expect("flatten should succeed");
        assert_eq!(flat.as_raw(), preview.as_raw());
    }
}
