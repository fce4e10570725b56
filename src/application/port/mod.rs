// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! # Available Ports
//!
//! - [`filter`]: Delegated hue rotation ([`HueTranscoder`])
//! - [`ocr`]: Best-effort text extraction ([`TextExtractor`])
//!
//! # Design Notes
//!
//! - Traits are `Send + Sync` so adapters can be shared with blocking workers
//! - Methods are synchronous; the async session handle moves calls onto
//!   blocking threads
//! - Each port carries its own error type with a hand-written `Display`

pub mod filter;
pub mod ocr;

pub use filter::{HueTranscoder, TranscoderError};
pub use ocr::{ExtractionError, TextExtractor};
