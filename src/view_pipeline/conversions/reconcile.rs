use std::io::Write;
use std::path::Path;

use tracing::{info, instrument, warn};

use crate::view_pipeline::{
    common::error::{Result, ViewVectorError},
    output::{BilWriter, OutputFormat, PipelineConfig, TiffViewVectorWriter, ViewVectorWriter},
    raster::{BilFile, RasterSource},
    vectors::ViewVectorSet,
};

pub struct ViewVectorPipeline<W: ViewVectorWriter> {
    writer: W,
    config: PipelineConfig,
}

impl ViewVectorPipeline<Box<dyn ViewVectorWriter>> {
    /// Pipeline whose writer follows `config.output_format`.
    pub fn new(config: PipelineConfig) -> Self {
        let writer: Box<dyn ViewVectorWriter> = match config.output_format {
            OutputFormat::Bil => Box::new(BilWriter),
            OutputFormat::Tiff => Box::new(TiffViewVectorWriter),
        };
        Self { writer, config }
    }
}

impl<W: ViewVectorWriter> ViewVectorPipeline<W> {
    pub fn with_custom(writer: W, config: PipelineConfig) -> Self {
        Self { writer, config }
    }

    fn validate_dimensions(&self, rows: usize, cols: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if rows == 0 || cols == 0 {
            return Err(ViewVectorError::InvalidDimensions(rows, cols));
        }

        Ok(())
    }

    fn apply_boresight(&self, vectors: &mut ViewVectorSet) {
        if let Some(boresight) = self.config.boresight.filter(|b| !b.is_zero()) {
            let _span = tracing::info_span!("apply_boresight",
                x = boresight.x,
                y = boresight.y,
                z = boresight.z
            ).entered();
            vectors.apply_angle_rotations(boresight.x, boresight.y, boresight.z);
        }
    }

    /// Loads view vectors from `source`, reconciles them with `level1` when
    /// given, then applies the configured boresight.
    #[instrument(skip_all)]
    pub fn build(
        &self,
        source: Box<dyn RasterSource>,
        level1: Option<Box<dyn RasterSource>>,
    ) -> Result<ViewVectorSet> {
        let mut vectors = {
            let _span = tracing::info_span!("load_view_vectors").entered();
            match level1 {
                Some(level1) => ViewVectorSet::from_sources(source, level1)?,
                None => ViewVectorSet::from_source(source)?,
            }
        };

        self.apply_boresight(&mut vectors);
        Ok(vectors)
    }

    #[instrument(skip(self, vv_path, level1_path))]
    pub fn load_files<P: AsRef<Path>>(&self, vv_path: P, level1_path: Option<&Path>) -> Result<ViewVectorSet> {
        let source = BilFile::open(vv_path)?;
        let level1 = match level1_path {
            Some(path) => Some(Box::new(BilFile::open(path)?) as Box<dyn RasterSource>),
            None => {
                warn!("No level-1 file given; view vectors are used without binning or trimming");
                None
            }
        };
        self.build(Box::new(source), level1)
    }

    #[instrument(skip(self, vectors, output))]
    pub fn write(&self, vectors: &ViewVectorSet, output: &mut dyn Write) -> Result<()> {
        {
            let _span = tracing::info_span!("validate_dimensions",
                rows = vectors.rows(),
                cols = vectors.cols()
            ).entered();
            self.validate_dimensions(vectors.rows(), vectors.cols())?;
        }

        {
            let _span = tracing::info_span!("encode_view_vectors").entered();
            self.writer.write_vectors(vectors, output, &self.config)?;
        }

        info!(rows = vectors.rows(), cols = vectors.cols(), "View vectors written");
        Ok(())
    }

    #[instrument(skip(self, vv_path, level1_path, output_path))]
    pub fn process_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        vv_path: P,
        level1_path: Option<&Path>,
        output_path: Q,
    ) -> Result<ViewVectorSet> {
        let vv_path = vv_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %vv_path.display(),
            output = %output_path.display(),
            "Processing view vectors"
        );

        let vectors = self.load_files(vv_path, level1_path)?;

        let mut output_file = {
            let _span = tracing::info_span!("create_output_file").entered();
            std::fs::File::create(output_path).map_err(|e| {
                ViewVectorError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?
        };
        self.write(&vectors, &mut output_file)?;

        if let Some(header) = self.writer.header_text(&vectors) {
            let header_path = output_path.with_extension("hdr");
            std::fs::write(&header_path, header).map_err(|e| {
                ViewVectorError::OutputWriteError(format!("{}: {}", header_path.display(), e))
            })?;
        }

        Ok(vectors)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: PipelineConfig) {
        self.config = config;
    }
}
