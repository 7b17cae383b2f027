//! View vector module
//!
//! Per-pixel rotation angles loaded from a view vector raster, and their
//! reconciliation against the binning and pixel window of a level-1 product.

pub mod binning;
mod level1;
mod view_vectors;


pub use level1::Level1Geometry;
pub use view_vectors::{Rotations, ViewVectorSet};
