// SPDX-License-Identifier: MPL-2.0
//! Session lifecycle: loading, history navigation, reset and teardown.

use crate::application::port::TextExtractor;
use crate::editor::{EditLabel, EditSession, HistoryEntry};
use crate::error::{Error, Result};
use image_rs::RgbaImage;
use std::sync::Arc;

impl EditSession {
    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    /// Decodes `bytes` and starts a fresh session on the result.
    ///
    /// # Errors
    ///
    /// Propagates decode failures, including
    /// [`Error::UnsupportedResolution`]. On failure the previous image, its
    /// history and its overlays are kept.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<()> {
        match self.engine.load_image(bytes) {
            Ok(image) => {
                self.start_fresh(image);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "image load failed, session unchanged");
                Err(err)
            }
        }
    }

    /// Starts a fresh session on an already-decoded image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedResolution`] if the image exceeds the
    /// configured limits.
    pub fn load_decoded(&mut self, image: RgbaImage) -> Result<()> {
        match self.engine.load_decoded(Arc::new(image)) {
            Ok(image) => {
                self.start_fresh(image);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "image load failed, session unchanged");
                Err(err)
            }
        }
    }

    /// Clears every edit and seeds history with `image`.
    fn start_fresh(&mut self, image: Arc<RgbaImage>) {
        tracing::debug!(width = image.width(), height = image.height(), "session started");
        self.cancel_interaction();
        self.loaded = Some(Arc::clone(&image));
        self.current = Some(Arc::clone(&image));
        self.preview = None;
        self.params.reset();
        self.overlays.clear();
        self.tool = Default::default();
        self.last_filter_path = None;
        self.extracted_text = None;
        self.history.reset();
        self.history.push(HistoryEntry {
            image: Arc::clone(&image),
            base: image,
            params: self.params,
            label: EditLabel::Load,
        });
        self.invalidate();
    }

    /// Makes a destructive edit's result the new original and records it.
    pub(crate) fn promote(&mut self, image: RgbaImage, label: EditLabel) -> Result<()> {
        let image = self.engine.load_decoded(Arc::new(image))?;
        self.params.reset();
        self.preview = None;
        self.current = Some(Arc::clone(&image));
        self.last_filter_path = None;
        self.history.push(HistoryEntry {
            image: Arc::clone(&image),
            base: image,
            params: self.params,
            label,
        });
        self.invalidate();
        Ok(())
    }

    /// Drops every edit and returns to the image as loaded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoImageLoaded`] before the first load.
    pub fn reset_editor(&mut self) -> Result<()> {
        let loaded = self.loaded.clone().ok_or(Error::NoImageLoaded)?;
        let image = self.engine.load_decoded(loaded)?;
        self.start_fresh(image);
        Ok(())
    }

    /// Releases every buffer. The session can be reused with a new load.
    pub fn close(&mut self) {
        self.cancel_interaction();
        self.engine.unload();
        self.loaded = None;
        self.current = None;
        self.preview = None;
        self.params.reset();
        self.overlays.clear();
        self.history.reset();
        self.last_filter_path = None;
        self.extracted_text = None;
        self.extracting_text = false;
        self.invalidate();
        tracing::debug!("session closed");
    }

    // -------------------------------------------------------------------------
    // History
    // -------------------------------------------------------------------------

    /// Steps back one history entry. Returns false at the oldest entry.
    pub fn perform_undo(&mut self) -> bool {
        match self.history.undo() {
            Some(entry) => {
                self.restore(entry);
                true
            }
            None => false,
        }
    }

    /// Steps forward one history entry. Returns false at the newest entry.
    pub fn perform_redo(&mut self) -> bool {
        match self.history.redo() {
            Some(entry) => {
                self.restore(entry);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, entry: HistoryEntry) {
        let same_base = self
            .engine
            .original()
            .is_ok_and(|original| Arc::ptr_eq(&original, &entry.base));
        if !same_base {
            // The entry was recorded before or after a crop or stroke.
            if let Err(err) = self.engine.load_decoded(Arc::clone(&entry.base)) {
                tracing::warn!(error = %err, "could not restore history base");
            }
        }
        tracing::debug!(label = entry.label.name(), "history restored");
        self.params = entry.params;
        self.current = Some(entry.image);
        self.preview = None;
        self.invalidate();
    }

    // -------------------------------------------------------------------------
    // Text extraction
    // -------------------------------------------------------------------------

    /// Marks extraction as running and hands out the buffer to read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoImageLoaded`] before the first load.
    pub(crate) fn begin_extraction(&mut self) -> Result<Arc<RgbaImage>> {
        let image = self.current.clone().ok_or(Error::NoImageLoaded)?;
        self.extracting_text = true;
        self.touch();
        Ok(image)
    }

    pub(crate) fn finish_extraction(&mut self, result: &Result<String>) {
        self.extracting_text = false;
        match result {
            Ok(text) => self.extracted_text = Some(text.clone()),
            Err(err) => tracing::warn!(error = %err, "text extraction failed"),
        }
        self.touch();
    }

    /// Runs `extractor` on `current` and stores the text it returns.
    ///
    /// # Errors
    ///
    /// - [`Error::NoImageLoaded`] before the first load
    /// - [`Error::Extraction`] if the collaborator fails; the previous
    ///   extracted text is kept
    pub fn extract_text(&mut self, extractor: &dyn TextExtractor) -> Result<String> {
        let image = self.begin_extraction()?;
        let result = extractor.extract_text(&image).map_err(Error::from);
        self.finish_extraction(&result);
        result
    }
}
