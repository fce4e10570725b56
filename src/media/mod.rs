// SPDX-License-Identifier: MPL-2.0
//! Image input, pixel processing and output.
//!
//! - [`source`]: where encoded bytes come from (URL, file, upload)
//! - [`image`]: decoding with resolution limits
//! - [`raster`]: the raster engine and its pixel stages
//! - [`encode`]: MIME-driven encoding for export

pub mod encode;
pub mod image;
pub mod raster;
pub mod source;

pub use encode::ExportFormat;
pub use image::DecodeLimits;
pub use raster::{FilterPath, PercentPoint, RasterEngine, StrokeStyle, TextStyle};
pub use source::ImageSource;
