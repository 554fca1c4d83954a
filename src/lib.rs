//! A library for assembling ICO image files from pre-rendered PNG images.
//!
//! Each included PNG is embedded byte-for-byte as one 32-bit entry of the
//! icon, in the order the images are given:
//!
//! ```no_run
//! use ico_assembler::{IcoAssembler, ImageCandidate};
//!
//! let candidates = vec![
//!     ImageCandidate::new("icon-16.png", true),
//!     ImageCandidate::new("icon-512.png", false),
//!     ImageCandidate::new("icon-256.png", true),
//! ];
//! let bytes = IcoAssembler::default()
//!     .assemble(&candidates, "icon.ico")
//!     .unwrap();
//! assert_eq!(&bytes[4..6], &[2, 0]);
//! ```

#![warn(missing_docs)]

#[macro_use]
mod macros;

mod assembler;
mod error;
mod icondir;
mod plan;
mod raster;
mod render;

pub use crate::assembler::{AssemblerOptions, IcoAssembler, ImageCandidate};
pub use crate::error::{AssembleError, ErrorKind};
pub use crate::icondir::{
    entry_bytes, header_bytes, IconDir, IconDirEntry, ResourceType,
    SizeByteRule, ENTRY_LEN, HEADER_LEN,
};
pub use crate::plan::{resolve_base, ExportPlan, ExportTarget};
pub use crate::raster::RasterInfo;
pub use crate::render::{create_icon_file, InkscapeRasterizer, Rasterizer};
