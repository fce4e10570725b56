// SPDX-License-Identifier: MPL-2.0
//! Pure value types shared by the editor, free of I/O and pixel buffers.
//!
//! Everything here depends on `std` only, so the rules it encodes (clamping
//! ranges, neutral values, parameter ordering) can be tested in isolation.
//!
//! # Modules
//!
//! - [`diagnostics`]: [`JournalCapacity`](diagnostics::JournalCapacity)
//! - [`editing`]: [`AdjustmentParameters`](editing::AdjustmentParameters),
//!   [`FilterKind`](editing::FilterKind) and the clamped field newtypes

pub mod diagnostics;
pub mod editing;
