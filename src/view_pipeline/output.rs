//! View vector output module
//!
//! This module writes reconciled view vectors as ENVI BIL or TIFF files.

mod writer;
mod bil_writer;
mod tiff_writer;
pub mod types;

pub use writer::ViewVectorWriter;
pub use bil_writer::BilWriter;
pub use tiff_writer::TiffViewVectorWriter;
pub use types::{Boresight, OutputFormat, PipelineConfig, PipelineConfigBuilder, TiffCompression};
