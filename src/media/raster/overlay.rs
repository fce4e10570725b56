// SPDX-License-Identifier: MPL-2.0
//! Baking of text and freehand strokes into a pixel buffer.
//!
//! Both overlays are described as a small SVG document sized like the target
//! buffer, rendered by resvg onto a transparent pixmap, and composited
//! source-over onto the straight-alpha buffer. Pixels the overlay does not
//! touch stay bit-identical.
//!
//! Text is centered horizontally on its anchor with a central baseline and
//! sits on a blurred drop shadow. Strokes use round caps and round joins.

use crate::config::{DrawConfig, TextConfig};
use crate::error::{Error, Result};
use image_rs::RgbaImage;
use quick_xml::escape::escape;
use resvg::usvg::{self, fontdb};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::{Arc, OnceLock};

// =============================================================================
// Coordinates
// =============================================================================

/// A position expressed in percent of the image size (0–100 on both axes).
///
/// Percent coordinates keep overlays resolution-independent: (50, 50) is the
/// center of the image whatever size it is displayed or exported at.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PercentPoint {
    pub x: f32,
    pub y: f32,
}

impl PercentPoint {
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the point clamped into the image (0–100). Non-finite values
    /// collapse to 0.
    #[must_use]
    pub fn clamped(self) -> Self {
        let clamp = |v: f32| if v.is_finite() { v.clamp(0.0, 100.0) } else { 0.0 };
        Self {
            x: clamp(self.x),
            y: clamp(self.y),
        }
    }

    /// Resolves the point against a pixel size.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_pixels(self, width: u32, height: u32) -> (f32, f32) {
        (
            self.x / 100.0 * width as f32,
            self.y / 100.0 * height as f32,
        )
    }
}

// =============================================================================
// Styles
// =============================================================================

/// Visual style of a text overlay. Sizes are preview pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub font_size: f32,
    pub font_family: String,
    /// Any CSS color (`#fff`, `rgb(…)`, `white`).
    pub color: String,
    pub is_bold: bool,
    pub is_italic: bool,
    /// Clockwise rotation in degrees about the anchor.
    pub rotation: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::from(&TextConfig::default())
    }
}

impl From<&TextConfig> for TextStyle {
    fn from(config: &TextConfig) -> Self {
        Self {
            font_size: config.font_size,
            font_family: config.font_family.clone(),
            color: config.color.clone(),
            is_bold: false,
            is_italic: false,
            rotation: 0.0,
        }
    }
}

/// Drop shadow drawn under baked text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowStyle {
    pub offset: f32,
    pub blur: f32,
    pub opacity: f32,
}

impl Default for ShadowStyle {
    fn default() -> Self {
        Self::from(&TextConfig::default())
    }
}

impl From<&TextConfig> for ShadowStyle {
    fn from(config: &TextConfig) -> Self {
        Self {
            offset: config.shadow_offset,
            blur: config.shadow_blur,
            opacity: config.shadow_opacity,
        }
    }
}

/// Stroke width and color of a freehand path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub width: f32,
    pub color: String,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::from(&DrawConfig::default())
    }
}

impl From<&DrawConfig> for StrokeStyle {
    fn from(config: &DrawConfig) -> Self {
        Self {
            width: config.stroke_width,
            color: config.color.clone(),
        }
    }
}

// =============================================================================
// Fonts
// =============================================================================

static FONT_DATABASE: OnceLock<Arc<fontdb::Database>> = OnceLock::new();

/// System fonts, loaded once per process.
pub fn font_database() -> Arc<fontdb::Database> {
    FONT_DATABASE
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            point_generic_families_at_installed_face(&mut db);
            tracing::debug!(faces = db.len(), "loaded system fonts");
            Arc::new(db)
        })
        .clone()
}

/// The generic families default to names such as "Arial" and "Times New
/// Roman". On hosts without them, text in those families would vanish, so
/// they are redirected to the first installed face.
fn point_generic_families_at_installed_face(db: &mut fontdb::Database) {
    let Some(fallback) = db
        .faces()
        .find_map(|face| face.families.first().map(|(name, _)| name.clone()))
    else {
        return;
    };
    let missing = |db: &fontdb::Database, family: fontdb::Family<'_>| {
        db.query(&fontdb::Query {
            families: &[family],
            ..fontdb::Query::default()
        })
        .is_none()
    };
    if missing(db, fontdb::Family::SansSerif) {
        db.set_sans_serif_family(fallback.clone());
    }
    if missing(db, fontdb::Family::Serif) {
        db.set_serif_family(fallback);
    }
}

/// Returns true when at least one font face is installed.
#[must_use]
pub fn fonts_available() -> bool {
    !font_database().is_empty()
}

// =============================================================================
// Baking
// =============================================================================

/// Parameters for one baked text item, already resolved to pixels.
#[derive(Debug, Clone, Copy)]
pub struct TextStamp<'a> {
    pub text: &'a str,
    pub anchor: PercentPoint,
    pub style: &'a TextStyle,
    pub shadow: ShadowStyle,
    /// Multiplier from preview pixels to buffer pixels.
    pub font_scale: f32,
}

/// Bakes `stamp` into `image`. Blank text is a no-op.
///
/// # Errors
///
/// Returns [`Error::Svg`] if the generated document cannot be rendered.
pub fn bake_text(image: &mut RgbaImage, stamp: &TextStamp<'_>) -> Result<()> {
    if stamp.text.trim().is_empty() {
        return Ok(());
    }
    let (width, height) = image.dimensions();
    let (x, y) = stamp.anchor.to_pixels(width, height);
    let scale = if stamp.font_scale.is_finite() && stamp.font_scale > 0.0 {
        stamp.font_scale
    } else {
        1.0
    };
    let style = stamp.style;
    let font_size = (style.font_size * scale).max(1.0);
    let shadow = stamp.shadow;
    let offset = shadow.offset * scale;

    let text = escape(stamp.text);
    let family = escape(style.font_family.as_str());
    let color = escape(style.color.as_str());
    let weight = if style.is_bold { "bold" } else { "normal" };
    let slant = if style.is_italic { "italic" } else { "normal" };
    let common = format!(
        r#"font-family="{family}" font-size="{font_size:.2}" font-weight="{weight}" font-style="{slant}" text-anchor="middle" dominant-baseline="central""#
    );

    let mut body = String::new();
    let _ = write!(
        body,
        r#"<g transform="rotate({rot:.3} {x:.2} {y:.2})">"#,
        rot = finite_or_zero(style.rotation),
    );
    if shadow.opacity > 0.0 {
        let _ = write!(
            body,
            r#"<text x="{sx:.2}" y="{sy:.2}" {common} fill="black" fill-opacity="{opacity:.3}" filter="url(#shadow)">{text}</text>"#,
            sx = x + offset,
            sy = y + offset,
            opacity = shadow.opacity.clamp(0.0, 1.0),
        );
    }
    let _ = write!(
        body,
        r#"<text x="{x:.2}" y="{y:.2}" {common} fill="{color}">{text}</text></g>"#
    );

    let defs = format!(
        r#"<defs><filter id="shadow" x="-50%" y="-50%" width="200%" height="200%"><feGaussianBlur stdDeviation="{:.2}"/></filter></defs>"#,
        (shadow.blur * scale / 2.0).max(0.0)
    );
    render_onto(image, &defs, &body)
}

/// Bakes a polyline given in percent coordinates. A single point becomes a
/// round dot; an empty path is a no-op.
///
/// # Errors
///
/// Returns [`Error::Svg`] if the generated document cannot be rendered.
pub fn bake_stroke(image: &mut RgbaImage, points: &[PercentPoint], style: &StrokeStyle) -> Result<()> {
    let Some(first) = points.first() else {
        return Ok(());
    };
    let (width, height) = image.dimensions();
    let stroke_width = style.width.max(0.5);
    let color = escape(style.color.as_str());

    let body = if points.len() == 1 {
        let (cx, cy) = first.to_pixels(width, height);
        format!(
            r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}" fill="{color}"/>"#,
            r = stroke_width / 2.0
        )
    } else {
        let mut d = String::new();
        for (i, point) in points.iter().enumerate() {
            let (px, py) = point.to_pixels(width, height);
            let command = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{command}{px:.2} {py:.2} ");
        }
        format!(
            r#"<path d="{}" fill="none" stroke="{color}" stroke-width="{stroke_width:.2}" stroke-linecap="round" stroke-linejoin="round"/>"#,
            d.trim_end()
        )
    };
    render_onto(image, "", &body)
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn render_onto(image: &mut RgbaImage, defs: &str, body: &str) -> Result<()> {
    let (width, height) = image.dimensions();
    let svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">{defs}{body}</svg>"#
    );

    let mut options = usvg::Options::default();
    options.fontdb = font_database();
    let tree = usvg::Tree::from_str(&svg, &options).map_err(|e| Error::Svg(e.to_string()))?;

    let mut layer = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| Error::Svg(format!("cannot allocate {width}x{height} overlay")))?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut layer.as_mut());

    composite_over(image, &layer);
    Ok(())
}

/// Source-over composite of a premultiplied layer onto a straight-alpha buffer.
fn composite_over(image: &mut RgbaImage, layer: &tiny_skia::Pixmap) {
    for (dst, src) in image.pixels_mut().zip(layer.pixels()) {
        let src_alpha = src.alpha();
        if src_alpha == 0 {
            continue;
        }
        let src = src.demultiply();
        let sa = f32::from(src_alpha) / 255.0;
        let da = f32::from(dst.0[3]) / 255.0;
        let out_alpha = sa + da * (1.0 - sa);
        let src_rgb = [src.red(), src.green(), src.blue()];
        for i in 0..3 {
            let blended = (f32::from(src_rgb[i]) * sa + f32::from(dst.0[i]) * da * (1.0 - sa))
                / out_alpha;
            dst.0[i] = super::adjust::to_channel(blended);
        }
        dst.0[3] = super::adjust::to_channel(out_alpha * 255.0);
    }
}
