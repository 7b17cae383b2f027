use std::io::Write;

use byteorder::{ByteOrder, LittleEndian};
use tracing::debug;

use crate::view_pipeline::common::error::Result;
use crate::view_pipeline::output::types::PipelineConfig;
use crate::view_pipeline::output::writer::ViewVectorWriter;
use crate::view_pipeline::raster::DataType;
use crate::view_pipeline::vectors::ViewVectorSet;

/// Writes view vectors in the layout they are read from: `samples` = rows,
/// `lines` = columns, bands X, Y, Z interleaved by line, little-endian f64.
pub struct BilWriter;

impl ViewVectorWriter for BilWriter {
    fn write_vectors(&self, vectors: &ViewVectorSet, output: &mut dyn Write, _config: &PipelineConfig) -> Result<()> {
        let rows = vectors.rows();
        debug!("Encoding BIL view vectors: {}x{}", rows, vectors.cols());

        let size = DataType::F64.size_bytes();
        let mut line = vec![0u8; rows * size];
        for col in 0..vectors.cols() {
            let start = col * rows;
            for band in [vectors.rot_x(), vectors.rot_y(), vectors.rot_z()] {
                LittleEndian::write_f64_into(&band[start..start + rows], &mut line);
                output.write_all(&line)?;
            }
        }

        debug!("BIL encoding complete");
        Ok(())
    }

    fn header_text(&self, vectors: &ViewVectorSet) -> Option<String> {
        let binning = vectors
            .spatial_binning()
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        Some(format!(
            "ENVI\n\
             description = {{View vectors}}\n\
             samples = {}\n\
             lines = {}\n\
             bands = 3\n\
             header offset = 0\n\
             data type = {}\n\
             interleave = bil\n\
             byte order = 0\n\
             spatial binning = {{{}}}\n\
             band names = {{X rotation, Y rotation, Z rotation}}\n",
            vectors.rows(),
            vectors.cols(),
            DataType::F64.envi_code(),
            binning,
        ))
    }
}
