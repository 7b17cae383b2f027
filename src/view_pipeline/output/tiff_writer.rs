use std::io::Write;

use tiff::encoder::{Compression, TiffEncoder, colortype, compression::DeflateLevel};
use tracing::debug;

use crate::view_pipeline::common::error::{Result, ViewVectorError};
use crate::view_pipeline::output::types::{PipelineConfig, TiffCompression};
use crate::view_pipeline::output::writer::ViewVectorWriter;
use crate::view_pipeline::vectors::ViewVectorSet;

/// Writes one float64 page per rotation axis (X, Y, Z). Each page is
/// `rows` wide and `cols` high, so pixel `(row, col)` keeps its position.
pub struct TiffViewVectorWriter;

impl ViewVectorWriter for TiffViewVectorWriter {
    fn write_vectors(&self, vectors: &ViewVectorSet, output: &mut dyn Write, config: &PipelineConfig) -> Result<()> {
        debug!("Encoding TIFF view vectors: {}x{}", vectors.rows(), vectors.cols());

        let compression = match config.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        };

        let width = u32::try_from(vectors.rows())
            .map_err(|_| ViewVectorError::EncodeError(format!("{} rows exceed TIFF limits", vectors.rows())))?;
        let height = u32::try_from(vectors.cols())
            .map_err(|_| ViewVectorError::EncodeError(format!("{} columns exceed TIFF limits", vectors.cols())))?;

        let mut buffer = Vec::new();
        {
            let mut encoder = TiffEncoder::new(std::io::Cursor::new(&mut buffer))
                .map_err(|e| ViewVectorError::EncodeError(e.to_string()))?
                .with_compression(compression);

            for band in [vectors.rot_x(), vectors.rot_y(), vectors.rot_z()] {
                encoder
                    .write_image::<colortype::Gray64Float>(width, height, band)
                    .map_err(|e| ViewVectorError::EncodeError(e.to_string()))?;
            }
        }

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete");
        Ok(())
    }
}
