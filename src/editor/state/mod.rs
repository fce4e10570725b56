// SPDX-License-Identifier: MPL-2.0
//! Session sub-state modules (tools, crop, text, adjustment, ...).

mod adjustment;
pub mod crop;
mod draw;
mod routing;
mod session;
pub mod text;
pub mod tools;

pub use crop::CropState;
pub use text::{DragTarget, OverlayDrag, TextInput};
pub use tools::Tool;
