use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewVectorError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Header field '{key}' is missing from {file}")]
    MissingHeaderField { key: String, file: String },

    #[error("Header field '{key}' has an invalid value: '{value}'")]
    InvalidHeaderValue { key: String, value: String },

    #[error("Invalid view vector dimensions: rows={0}, cols={1}")]
    InvalidDimensions(usize, usize),

    #[error("Unsupported ENVI data type: {0}")]
    UnsupportedDataType(u32),

    #[error("Unsupported interleave: {0}")]
    UnsupportedInterleave(String),

    #[error("View vector file should contain exactly 3 bands (X, Y, Z rotations), found {bands}")]
    FormatError { bands: u32 },

    #[error("Cannot read view vector file: rotation buffers hold {actual} elements, expected {expected}")]
    InternalStateError { expected: usize, actual: usize },

    #[error("View vector file declares {0} spatial binning values; only 1 or 2 channel groups are supported")]
    UnsupportedChannelGroups(usize),

    #[error(
        "Spatial binning is missing from the level-1 file header. Add a line containing: {keys} \
         where VALUE is the spectral and spatial binning of the data, e.g. {{1,1}}"
    )]
    ConfigError { keys: &'static str },

    #[error(
        "Spatial binning of view vectors ({view_vector_binning}) is greater than binning of level-1 data \
         ({level1_binning}). Use a view vector file with spatial binning equal to (or lower than) the level-1 file"
    )]
    ResolutionError {
        view_vector_binning: u32,
        level1_binning: u32,
    },

    #[error(
        "VNIR and SWIR sections need different view vector scaling ({vnir_scale} vs {swir_scale}); \
         this cannot be handled"
    )]
    UnsupportedConfigurationError { vnir_scale: u32, swir_scale: u32 },

    #[error("Pixel window start {x_start} lies beyond the {binned_rows} binned view vector samples")]
    TrimOutOfRange { x_start: usize, binned_rows: usize },

    #[error(
        "Binned view vector file has {binned} samples but the level-1 file has {level1}. \
         Have you given the correct view vector file?"
    )]
    SizeMismatchError { binned: usize, level1: usize },

    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ViewVectorError>;
