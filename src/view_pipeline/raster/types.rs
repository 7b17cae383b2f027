//! Raster layout types

use crate::view_pipeline::common::error::{Result, ViewVectorError};

/// Sample encoding, identified by the ENVI `data type` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    U8,
    I16,
    I32,
    F32,
    F64,
    U16,
    U32,
    I64,
    U64,
}

impl DataType {
    pub fn from_envi_code(code: u32) -> Result<Self> {
        match code {
            1 => Ok(Self::U8),
            2 => Ok(Self::I16),
            3 => Ok(Self::I32),
            4 => Ok(Self::F32),
            5 => Ok(Self::F64),
            12 => Ok(Self::U16),
            13 => Ok(Self::U32),
            14 => Ok(Self::I64),
            15 => Ok(Self::U64),
            other => Err(ViewVectorError::UnsupportedDataType(other)),
        }
    }

    pub fn envi_code(self) -> u32 {
        match self {
            Self::U8 => 1,
            Self::I16 => 2,
            Self::I32 => 3,
            Self::F32 => 4,
            Self::F64 => 5,
            Self::U16 => 12,
            Self::U32 => 13,
            Self::I64 => 14,
            Self::U64 => 15,
        }
    }

    pub fn size_bytes(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::F64 | Self::I64 | Self::U64 => 8,
        }
    }
}

/// Band interleave of the binary file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interleave {
    /// Band interleaved by line (default for view vector files)
    Bil,
    /// Band sequential
    Bsq,
    /// Band interleaved by pixel
    Bip,
}

impl Interleave {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bil" => Ok(Self::Bil),
            "bsq" => Ok(Self::Bsq),
            "bip" => Ok(Self::Bip),
            other => Err(ViewVectorError::UnsupportedInterleave(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    pub fn from_envi_code(code: u32) -> Self {
        if code == 1 { Self::Big } else { Self::Little }
    }
}

/// Everything needed to locate a sample inside the binary file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterLayout {
    pub samples: usize,
    pub lines: usize,
    pub bands: usize,
    pub data_type: DataType,
    pub interleave: Interleave,
    pub byte_order: ByteOrder,
    pub header_offset: u64,
}

impl RasterLayout {
    pub fn band_len(&self) -> usize {
        self.samples * self.lines
    }

    /// Byte offset of the first sample of `line` in `band`, plus the stride
    /// (in samples) between consecutive samples of that line.
    pub fn line_start(&self, band: usize, line: usize) -> (u64, usize) {
        let size = self.data_type.size_bytes() as u64;
        let (index, stride) = match self.interleave {
            Interleave::Bil => ((line * self.bands + band) * self.samples, 1),
            Interleave::Bsq => (band * self.band_len() + line * self.samples, 1),
            Interleave::Bip => (line * self.samples * self.bands + band, self.bands),
        };
        (self.header_offset + index as u64 * size, stride)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(interleave: Interleave) -> RasterLayout {
        RasterLayout {
            samples: 4,
            lines: 3,
            bands: 3,
            data_type: DataType::F32,
            interleave,
            byte_order: ByteOrder::Little,
            header_offset: 16,
        }
    }

    #[test]
    fn test_line_start_per_interleave() {
        assert_eq!(layout(Interleave::Bil).line_start(1, 2), (16 + 4 * ((2 * 3 + 1) * 4), 1));
        assert_eq!(layout(Interleave::Bsq).line_start(1, 2), (16 + 4 * (12 + 8), 1));
        assert_eq!(layout(Interleave::Bip).line_start(1, 2), (16 + 4 * (24 + 1), 3));
    }

    #[test]
    fn test_unknown_codes() {
        assert!(matches!(
            DataType::from_envi_code(6),
            Err(ViewVectorError::UnsupportedDataType(6))
        ));
        assert!(matches!(
            Interleave::parse("xyz"),
            Err(ViewVectorError::UnsupportedInterleave(_))
        ));
        assert_eq!(Interleave::parse(" BSQ ").unwrap(), Interleave::Bsq);
        assert_eq!(DataType::from_envi_code(12).unwrap().size_bytes(), 2);
    }
}
