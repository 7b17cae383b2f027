//! Pipeline configuration types

/// Container format for reconciled view vectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// ENVI band-interleaved-by-line, float64, with a `.hdr` sidecar
    Bil,
    /// Multi-page float64 TIFF, one page per rotation axis
    Tiff,
}

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression
    Lzw,
    /// Deflate compression - fast level
    DeflateFast,
    /// Deflate compression - balanced
    DeflateBalanced,
    /// Deflate compression - best compression (slower)
    DeflateBest,
}

/// Constant boresight misalignment added to every view vector, in the same
/// angular unit as the view vector file.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Boresight {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Boresight {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

/// Configuration for view vector processing
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Boresight correction applied after reconciliation
    pub boresight: Option<Boresight>,
    /// Output container
    pub output_format: OutputFormat,
    /// Compression used when writing TIFF output
    pub compression: TiffCompression,
    /// Whether to reject empty view vector sets before writing
    pub validate_dimensions: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            boresight: None,
            output_format: OutputFormat::Bil,
            compression: TiffCompression::None,
            validate_dimensions: true,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }
}

/// Builder for PipelineConfig
#[derive(Default)]
pub struct PipelineConfigBuilder {
    boresight: Option<Option<Boresight>>,
    output_format: Option<OutputFormat>,
    compression: Option<TiffCompression>,
    validate_dimensions: Option<bool>,
}

impl PipelineConfigBuilder {
    pub fn boresight(mut self, boresight: Option<Boresight>) -> Self {
        self.boresight = Some(boresight);
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn build(self) -> PipelineConfig {
        let default = PipelineConfig::default();
        PipelineConfig {
            boresight: self.boresight.unwrap_or(default.boresight),
            output_format: self.output_format.unwrap_or(default.output_format),
            compression: self.compression.unwrap_or(default.compression),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
        }
    }
}
