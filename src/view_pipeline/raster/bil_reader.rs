//! Flat binary raster reader driven by an ENVI header.
//!
//! Supports BIL, BSQ and BIP interleaves, both byte orders and the integer
//! and floating point ENVI data types. Every sample is widened to `f64`.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, LittleEndian};
use tracing::{debug, instrument};

use crate::view_pipeline::common::error::{Result, ViewVectorError};
use crate::view_pipeline::raster::envi_header::{EnviHeader, header_path_for};
use crate::view_pipeline::raster::source::RasterSource;
use crate::view_pipeline::raster::types::{ByteOrder, DataType, Interleave, RasterLayout};

/// ENVI data type assumed when the header omits `data type`.
const DEFAULT_DATA_TYPE: u32 = 4;

pub struct BilFile {
    path: PathBuf,
    header: EnviHeader,
    file: Option<File>,
}

impl BilFile {
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let header_path = header_path_for(&path).ok_or_else(|| {
            ViewVectorError::InputReadError(format!("{}: no ENVI header file found", path.display()))
        })?;
        let header = EnviHeader::from_file(&header_path)?;

        let file = File::open(&path).map_err(|e| {
            ViewVectorError::InputReadError(format!("{}: {}", path.display(), e))
        })?;

        debug!(header = %header_path.display(), "Opened raster");
        Ok(Self {
            path,
            header,
            file: Some(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    pub fn layout(&self) -> Result<RasterLayout> {
        let data_type = self.header_uint("data type", 0)?.unwrap_or(DEFAULT_DATA_TYPE);
        let interleave = match self.header("interleave") {
            Some(value) => Interleave::parse(&value)?,
            None => Interleave::Bil,
        };
        let byte_order = self.header_uint("byte order", 0)?.unwrap_or(0);
        let header_offset = self.header_uint("header offset", 0)?.unwrap_or(0);

        Ok(RasterLayout {
            samples: self.required_uint("samples")? as usize,
            lines: self.required_uint("lines")? as usize,
            bands: self.required_uint("bands")? as usize,
            data_type: DataType::from_envi_code(data_type)?,
            interleave,
            byte_order: ByteOrder::from_envi_code(byte_order),
            header_offset: u64::from(header_offset),
        })
    }
}

impl RasterSource for BilFile {
    fn header(&self, key: &str) -> Option<String> {
        self.header.get(key).map(str::to_string)
    }

    #[instrument(skip(self, buffer), fields(path = %self.path.display()))]
    fn read_band(&mut self, band: usize, buffer: &mut [f64]) -> Result<()> {
        let layout = self.layout()?;
        if band >= layout.bands {
            return Err(ViewVectorError::InputReadError(format!(
                "{}: band {} requested but file has {} bands",
                self.path.display(),
                band,
                layout.bands
            )));
        }
        if buffer.len() != layout.band_len() {
            return Err(ViewVectorError::InternalStateError {
                expected: layout.band_len(),
                actual: buffer.len(),
            });
        }

        let file = self.file.as_mut().ok_or_else(|| {
            ViewVectorError::InputReadError(format!("{}: file already closed", self.path.display()))
        })?;

        let size = layout.data_type.size_bytes();
        let mut line_bytes = Vec::new();

        for (line, out) in buffer.chunks_exact_mut(layout.samples.max(1)).enumerate() {
            let (offset, stride) = layout.line_start(band, line);
            // Reads the span from the first to the last sample of this band in the line.
            let span = ((layout.samples - 1) * stride + 1) * size;
            line_bytes.resize(span, 0);

            file.seek(SeekFrom::Start(offset))?;
            file.read_exact(&mut line_bytes).map_err(|e| {
                ViewVectorError::InputReadError(format!(
                    "{}: line {} of band {}: {}",
                    self.path.display(),
                    line,
                    band,
                    e
                ))
            })?;

            match layout.byte_order {
                ByteOrder::Little => decode_samples::<LittleEndian>(&line_bytes, layout.data_type, stride, out),
                ByteOrder::Big => decode_samples::<BigEndian>(&line_bytes, layout.data_type, stride, out),
            }
        }

        debug!(band, samples = layout.samples, lines = layout.lines, "Band read");
        Ok(())
    }

    fn close(&mut self) {
        if self.file.take().is_some() {
            debug!(path = %self.path.display(), "Closed raster");
        }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn decode_samples<E: byteorder::ByteOrder>(bytes: &[u8], data_type: DataType, stride: usize, out: &mut [f64]) {
    let size = data_type.size_bytes();
    for (i, value) in out.iter_mut().enumerate() {
        let start = i * stride * size;
        let sample = &bytes[start..start + size];
        *value = match data_type {
            DataType::U8 => f64::from(sample[0]),
            DataType::I16 => f64::from(E::read_i16(sample)),
            DataType::U16 => f64::from(E::read_u16(sample)),
            DataType::I32 => f64::from(E::read_i32(sample)),
            DataType::U32 => f64::from(E::read_u32(sample)),
            DataType::F32 => f64::from(E::read_f32(sample)),
            DataType::F64 => E::read_f64(sample),
            DataType::I64 => E::read_i64(sample) as f64,
            DataType::U64 => E::read_u64(sample) as f64,
        };
    }
}
