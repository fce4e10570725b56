// SPDX-License-Identifier: MPL-2.0
//! Application layer - collaborator interfaces.
//!
//! - [`port`]: Trait definitions for capabilities the editor consumes but does
//!   not implement itself (external filter transcoding, text extraction)
//!
//! # Dependency Rule
//!
//! - Ports speak in domain and pixel-buffer types only
//! - The raster engine and the edit session depend on the traits, never on
//!   concrete adapters
//! - Adapters are injected by the embedding application

pub mod port;
