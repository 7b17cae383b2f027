//! View vector pipeline module
//!
//! This module loads per-pixel view vectors from ENVI rasters, reconciles them
//! with a level-1 product's binning and pixel window, and writes the result.

pub mod raster;
pub mod vectors;
pub mod output;
pub mod conversions;
pub mod common;

pub use common::{
    Result,
    ViewVectorError,
};

pub use raster::{
    BilFile,
    EnviHeader,
    RasterSource,
};

pub use vectors::{
    Level1Geometry,
    Rotations,
    ViewVectorSet,
};

pub use output::{
    BilWriter,
    Boresight,
    OutputFormat,
    PipelineConfig,
    PipelineConfigBuilder,
    TiffCompression,
    TiffViewVectorWriter,
    ViewVectorWriter,
};

pub use conversions::{
    ViewVectorPipeline,
};
