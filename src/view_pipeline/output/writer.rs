use std::io::Write;

use crate::view_pipeline::common::error::Result;
use crate::view_pipeline::output::types::PipelineConfig;
use crate::view_pipeline::vectors::ViewVectorSet;

pub trait ViewVectorWriter {
    fn write_vectors(&self, vectors: &ViewVectorSet, output: &mut dyn Write, config: &PipelineConfig) -> Result<()>;

    /// Text of a sidecar header to store next to the output, if the format has one.
    fn header_text(&self, _vectors: &ViewVectorSet) -> Option<String> {
        None
    }
}

impl<W: ViewVectorWriter + ?Sized> ViewVectorWriter for Box<W> {
    fn write_vectors(&self, vectors: &ViewVectorSet, output: &mut dyn Write, config: &PipelineConfig) -> Result<()> {
        (**self).write_vectors(vectors, output, config)
    }

    fn header_text(&self, vectors: &ViewVectorSet) -> Option<String> {
        (**self).header_text(vectors)
    }
}
