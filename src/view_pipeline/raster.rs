//! Raster reading module
//!
//! This module provides header lookup and whole-band reads for ENVI-style
//! flat binary rasters, the on-disk format of both view vector and level-1 files.

mod source;
mod bil_reader;
pub mod envi_header;
pub mod types;

pub use source::RasterSource;
pub use bil_reader::BilFile;
pub use envi_header::EnviHeader;
pub use types::{ByteOrder, DataType, Interleave, RasterLayout};
