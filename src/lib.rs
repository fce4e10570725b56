// SPDX-License-Identifier: MPL-2.0
//! `testimonial_editor` is the image-editing core behind testimonial
//! collection: a non-destructive raster editor with an adjustment pipeline,
//! text overlays, annotations, freehand strokes, bounded undo/redo and a
//! flattening exporter.
//!
//! The crate is headless. An embedding application drives an
//! [`editor::EditSession`] directly or through the async
//! [`editor::SessionHandle`], and renders whatever the session exposes.

#![doc(html_root_url = "https://docs.rs/testimonial_editor/0.3.0")]

pub mod application;
pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod editor;
pub mod error;
pub mod media;
pub mod notifications;
