// SPDX-License-Identifier: MPL-2.0
//! Batch edit recipes.
//!
//! A recipe is a TOML file describing the edits to apply to one image:
//!
//! ```toml
//! [adjustments]
//! brightness = 110
//! filter = "sepia"
//!
//! [crop]
//! x = 10
//! y = 10
//! width = 80
//! height = 80
//!
//! [[stroke]]
//! points = [[10, 90], [50, 80], [90, 90]]
//!
//! [[text]]
//! text = "Loved it!"
//! x = 50
//! y = 50
//!
//! [text.style]
//! font_size = 32
//! color = "#ffd60a"
//! ```
//!
//! Edits run in a fixed order: adjustments, crop, strokes, then text
//! overlays, which stay live until export.

use super::{CropArea, DrawPath, EditSession};
use crate::domain::editing::newtypes::{
    brightness_bounds, contrast_bounds, intensity_bounds, rotation_bounds, saturation_bounds,
    zoom_bounds,
};
use crate::domain::editing::{AdjustmentField, FilterKind};
use crate::error::Result;
use crate::media::raster::{PercentPoint, StrokeStyle, TextStyle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Adjustment values; missing fields stay neutral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentsRecipe {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    /// Filter name, e.g. `sepia` or `hue-rotate-90`.
    pub filter: String,
    pub filter_intensity: f32,
    pub rotation: f32,
    pub zoom: f32,
}

impl Default for AdjustmentsRecipe {
    fn default() -> Self {
        Self {
            brightness: brightness_bounds::DEFAULT,
            contrast: contrast_bounds::DEFAULT,
            saturation: saturation_bounds::DEFAULT,
            filter: FilterKind::None.name().to_string(),
            filter_intensity: intensity_bounds::DEFAULT,
            rotation: rotation_bounds::DEFAULT,
            zoom: zoom_bounds::DEFAULT,
        }
    }
}

impl AdjustmentsRecipe {
    #[must_use]
    pub fn fields(&self) -> [AdjustmentField; 7] {
        [
            AdjustmentField::Brightness(self.brightness),
            AdjustmentField::Contrast(self.contrast),
            AdjustmentField::Saturation(self.saturation),
            AdjustmentField::Filter(FilterKind::from_name(&self.filter)),
            AdjustmentField::FilterIntensity(self.filter_intensity),
            AdjustmentField::Rotation(self.rotation),
            AdjustmentField::Zoom(self.zoom),
        ]
    }
}

/// One text overlay, positioned in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRecipe {
    pub text: String,
    pub x: f32,
    pub y: f32,
    /// Falls back to the configured default style.
    #[serde(default)]
    pub style: Option<TextStyle>,
}

/// One freehand stroke as a list of `[x, y]` percent points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeRecipe {
    pub points: Vec<[f32; 2]>,
    #[serde(default)]
    pub style: Option<StrokeStyle>,
}

/// Complete edit recipe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub adjustments: AdjustmentsRecipe,

    #[serde(default)]
    pub crop: Option<CropArea>,

    #[serde(default)]
    pub stroke: Vec<StrokeRecipe>,

    #[serde(default)]
    pub text: Vec<TextRecipe>,
}

impl Recipe {
    /// Parses a recipe from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::error::Error::Config) if the document
    /// does not match the recipe schema.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reads and parses a recipe file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::error::Error::Io) if the file cannot be
    /// read, or a parse error as for [`parse`](Self::parse).
    pub fn load_from_path(path: &Path) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Applies every edit to a loaded session.
    ///
    /// # Errors
    ///
    /// Propagates the first failing session operation, e.g.
    /// [`Error::NoImageLoaded`](crate::error::Error::NoImageLoaded) or
    /// [`Error::InvalidCrop`](crate::error::Error::InvalidCrop).
    pub fn apply(&self, session: &mut EditSession) -> Result<()> {
        for field in self.adjustments.fields() {
            session.set_adjustment(field);
        }
        if !session.params().is_neutral() {
            session.apply_adjustments()?;
        }

        if let Some(area) = self.crop {
            session.set_crop_area(Some(area));
            if !session.apply_crop()? {
                tracing::warn!(?area, "empty crop area ignored");
            }
        }

        for stroke in &self.stroke {
            let Some((first, rest)) = stroke.points.split_first() else {
                continue;
            };
            let style = stroke
                .style
                .clone()
                .unwrap_or_else(|| session.settings().stroke.clone());
            let mut path = DrawPath::new(PercentPoint::new(first[0], first[1]), &style);
            path.points.extend(
                rest.iter()
                    .map(|[x, y]| PercentPoint::new(*x, *y).clamped()),
            );
            session.commit_stroke(&path)?;
        }

        for text in &self.text {
            let position = PercentPoint::new(text.x, text.y);
            match &text.style {
                Some(style) => session.add_styled_text_overlay(position, &text.text, style.clone()),
                None => session.add_text_overlay(position, &text.text),
            };
        }

        tracing::debug!(
            crop = self.crop.is_some(),
            strokes = self.stroke.len(),
            texts = self.text.len(),
            "recipe applied"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::editing::Brightness;
    use crate::error::Error;
    use image_rs::{Rgba, RgbaImage};

    fn loaded(width: u32, height: u32) -> EditSession {
        let mut session = EditSession::default();
        session
            .load_decoded(RgbaImage::from_pixel(width, height, Rgba([90, 90, 90, 255])))
            .expect("load should succeed");
        session
    }

    #[test]
    fn empty_recipe_is_neutral() {
        let recipe = Recipe::parse("").expect("empty recipe should parse");
        assert_eq!(recipe, Recipe::default());

        let mut session = loaded(8, 8);
        recipe.apply(&mut session).expect("apply should succeed");
        assert_eq!(session.history().len(), 1);
        assert!(session.overlays().is_empty());
    }

    #[test]
    fn parses_every_section() {
        let recipe = Recipe::parse(
            r##"
[adjustments]
brightness = 110
filter = "sepia"

[crop]
x = 0
y = 0
width = 50
height = 50

[[stroke]]
points = [[10, 10], [90, 90]]

[[text]]
text = "Hi"
x = 50
y = 50

[text.style]
font_size = 32
color = "#ffd60a"
"##,
        )
        .expect("recipe should parse");

        assert!((recipe.adjustments.brightness - 110.0).abs() < f32::EPSILON);
        assert_eq!(recipe.adjustments.filter, "sepia");
        assert!((recipe.adjustments.zoom - 100.0).abs() < f32::EPSILON);
        assert_eq!(recipe.crop.map(|c| c.width), Some(50.0));
        assert_eq!(recipe.stroke[0].points.len(), 2);
        let style = recipe.text[0].style.as_ref().expect("style");
        assert!((style.font_size - 32.0).abs() < f32::EPSILON);
        assert_eq!(style.color, "#ffd60a");
        assert!(!style.is_bold);
    }

    #[test]
    fn invalid_recipe_is_a_config_error() {
        assert!(matches!(
            Recipe::parse("adjustments = 3"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn apply_runs_every_edit() {
        let recipe = Recipe::parse(
            r#"
[adjustments]
brightness = 120

[crop]
x = 0
y = 0
width = 50
height = 50

[[stroke]]
points = [[0, 0], [100, 100]]

[[text]]
text = "Hi"
x = 50
y = 50
"#,
        )
        .expect("recipe should parse");
        let mut session = loaded(20, 20);

        recipe.apply(&mut session).expect("apply should succeed");

        // load, adjust, crop, stroke
        assert_eq!(session.history().len(), 4);
        assert_eq!(session.display_size(), (10, 10));
        assert_eq!(session.overlays().text_overlays().len(), 1);
        assert!(session.params().is_neutral());
        let entry = session.history().iter().nth(1).expect("adjust entry");
        assert_eq!(entry.params.brightness, Brightness::new(120.0));
    }

    #[test]
    fn apply_without_image_fails() {
        let recipe = Recipe::parse("[adjustments]\nbrightness = 120").expect("parse");
        let mut session = EditSession::default();
        assert!(matches!(
            recipe.apply(&mut session),
            Err(Error::NoImageLoaded)
        ));
    }
}
