// SPDX-License-Identifier: MPL-2.0
//! Editing domain types.
//!
//! This module provides pure domain types for the adjustment pipeline:
//! - [`Brightness`], [`Contrast`], [`Saturation`]: basic per-pixel adjustments
//! - [`FilterKind`] and [`FilterIntensity`]: named color filters
//! - [`RotationDegrees`], [`ZoomPercent`]: geometric stages
//! - [`AdjustmentParameters`]: the complete, neutral-by-default set

pub mod newtypes;
pub mod parameters;

pub use newtypes::{
    Brightness, Contrast, FilterIntensity, RotationDegrees, Saturation, ZoomPercent,
};
pub use parameters::{AdjustmentField, AdjustmentParameters, FilterKind};
