use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::view_pipeline::common::error::{Result, ViewVectorError};
use crate::view_pipeline::conversions::ViewVectorPipeline;
use crate::view_pipeline::output::{
    BilWriter, Boresight, OutputFormat, PipelineConfig, TiffCompression, TiffViewVectorWriter, ViewVectorWriter,
};
use crate::view_pipeline::vectors::ViewVectorSet;

struct MockWriter {
    should_fail: bool,
    written: Arc<Mutex<Vec<ViewVectorSet>>>,
}

impl ViewVectorWriter for MockWriter {
    fn write_vectors(&self, vectors: &ViewVectorSet, _output: &mut dyn Write, _config: &PipelineConfig) -> Result<()> {
        if self.should_fail {
            return Err(ViewVectorError::EncodeError("Mock encode error".to_string()));
        }
        self.written.lock().unwrap().push(vectors.clone());
        Ok(())
    }
}

/// Writes a BIL float32 view vector file of `rows` x `cols`; the X angle of
/// `(row, col)` is `col * 100 + row`, Y is its negative and Z is 0.5.
fn write_view_vector_file(dir: &Path, rows: usize, cols: usize, spatial_binning: &str) -> PathBuf {
    let path = dir.join("viewvectors.bil");
    let mut data = Vec::new();
    for col in 0..cols {
        for band in 0..3 {
            for row in 0..rows {
                let x = (col * 100 + row) as f32;
                let value = match band {
                    0 => x,
                    1 => -x,
                    _ => 0.5,
                };
                data.extend_from_slice(&value.to_le_bytes());
            }
        }
    }
    std::fs::write(&path, data).unwrap();
    std::fs::write(
        dir.join("viewvectors.hdr"),
        format!(
            "ENVI\nsamples = {}\nlines = {}\nbands = 3\ndata type = 4\ninterleave = bil\nbyte order = 0\nspatial binning = {}\n",
            rows, cols, spatial_binning
        ),
    )
    .unwrap();
    path
}

fn write_level1_file(dir: &Path, header_fields: &str) -> PathBuf {
    let path = dir.join("level1.bil");
    std::fs::write(&path, b"").unwrap();
    std::fs::write(dir.join("level1.bil.hdr"), format!("ENVI\n{}", header_fields)).unwrap();
    path
}

fn mock_pipeline(should_fail: bool, config: PipelineConfig) -> (ViewVectorPipeline<MockWriter>, Arc<Mutex<Vec<ViewVectorSet>>>) {
    let written = Arc::new(Mutex::new(Vec::new()));
    let writer = MockWriter {
        should_fail,
        written: written.clone(),
    };
    (ViewVectorPipeline::with_custom(writer, config), written)
}

#[test]
fn test_config_builder() {
    let config = PipelineConfig::builder()
        .boresight(Some(Boresight::new(0.1, -0.2, 0.3)))
        .output_format(OutputFormat::Tiff)
        .compression(TiffCompression::DeflateBest)
        .validate_dimensions(false)
        .build();

    assert_eq!(config.boresight, Some(Boresight::new(0.1, -0.2, 0.3)));
    assert_eq!(config.output_format, OutputFormat::Tiff);
    assert_eq!(config.compression, TiffCompression::DeflateBest);
    assert!(!config.validate_dimensions);

    let default = PipelineConfig::builder().build();
    assert_eq!(default.boresight, None);
    assert_eq!(default.output_format, OutputFormat::Bil);
    assert!(default.validate_dimensions);
}

#[test]
fn test_load_reconcile_and_boresight() {
    let dir = tempfile::tempdir().unwrap();
    let vv = write_view_vector_file(dir.path(), 8, 2, "1");
    let level1 = write_level1_file(dir.path(), "samples = 3\nx start = 1\nbinning = {1, 2}\n");

    let config = PipelineConfig::builder()
        .boresight(Some(Boresight::new(1.0, 0.0, -0.5)))
        .build();
    let (pipeline, _) = mock_pipeline(false, config);

    let vectors = pipeline.load_files(&vv, Some(level1.as_path())).unwrap();
    assert_eq!(vectors.rows(), 3);
    assert_eq!(vectors.cols(), 2);
    assert_eq!(vectors.spatial_binning(), &[1]);
    // Binned rows of column 1: 100.5, 102.5, 104.5, 106.5; trimmed by one.
    assert_eq!(vectors.angles(0, 1), Some([103.5, -102.5, 0.0]));
    assert_eq!(vectors.angles(2, 0), Some([7.5, -6.5, 0.0]));
}

#[test]
fn test_load_without_level1() {
    let dir = tempfile::tempdir().unwrap();
    let vv = write_view_vector_file(dir.path(), 4, 3, "2");
    let (pipeline, _) = mock_pipeline(false, PipelineConfig::default());

    let vectors = pipeline.load_files(&vv, None).unwrap();
    assert_eq!(vectors.rows(), 4);
    assert_eq!(vectors.cols(), 3);
    assert_eq!(vectors.spatial_binning(), &[2]);
    assert!(vectors.has_source());
}

#[test]
fn test_level1_size_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let vv = write_view_vector_file(dir.path(), 8, 1, "1");
    let level1 = write_level1_file(dir.path(), "samples = 4\nx start = 1\nbinning = {1, 2}\n");
    let (pipeline, _) = mock_pipeline(false, PipelineConfig::default());

    let result = pipeline.load_files(&vv, Some(level1.as_path()));
    assert!(matches!(
        result,
        Err(ViewVectorError::SizeMismatchError { binned: 3, level1: 4 })
    ));
}

#[test]
fn test_successful_write() {
    let dir = tempfile::tempdir().unwrap();
    let vv = write_view_vector_file(dir.path(), 2, 2, "1");
    let (pipeline, written) = mock_pipeline(false, PipelineConfig::default());

    let vectors = pipeline.load_files(&vv, None).unwrap();
    let mut output = Cursor::new(Vec::new());
    pipeline.write(&vectors, &mut output).unwrap();

    let written = written.lock().unwrap();
    assert_eq!(written.len(), 1);
    assert!(!written[0].has_source());
    assert_eq!(written[0].rotations(), vectors.rotations());
}

#[test]
fn test_writer_failure() {
    let dir = tempfile::tempdir().unwrap();
    let vv = write_view_vector_file(dir.path(), 2, 2, "1");
    let (pipeline, _) = mock_pipeline(true, PipelineConfig::default());

    let vectors = pipeline.load_files(&vv, None).unwrap();
    let mut output = Cursor::new(Vec::new());
    let result = pipeline.write(&vectors, &mut output);
    assert!(matches!(result, Err(ViewVectorError::EncodeError(_))));
}

#[test]
fn test_dimension_validation() {
    let dir = tempfile::tempdir().unwrap();
    let vv = write_view_vector_file(dir.path(), 4, 1, "1");
    let level1 = write_level1_file(dir.path(), "samples = 0\nx start = 4\nbinning = {1, 1}\n");

    let (pipeline, written) = mock_pipeline(false, PipelineConfig::default());
    let vectors = pipeline.load_files(&vv, Some(level1.as_path())).unwrap();
    assert_eq!(vectors.rows(), 0);

    let mut output = Cursor::new(Vec::new());
    let result = pipeline.write(&vectors, &mut output);
    assert!(matches!(result, Err(ViewVectorError::InvalidDimensions(0, 1))));
    assert!(written.lock().unwrap().is_empty());

    let config = PipelineConfig::builder().validate_dimensions(false).build();
    let (pipeline, written) = mock_pipeline(false, config);
    pipeline.write(&vectors, &mut output).unwrap();
    assert_eq!(written.lock().unwrap().len(), 1);
}

#[test]
fn test_bil_output_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let vv = write_view_vector_file(dir.path(), 6, 2, "1");
    let level1 = write_level1_file(dir.path(), "samples = 2\nx start = 1\nbinning = {1, 2}\n");
    let output = dir.path().join("reconciled.bil");

    let config = PipelineConfig::builder()
        .boresight(Some(Boresight::new(0.0, 0.0, 0.25)))
        .build();
    let pipeline = ViewVectorPipeline::new(config);
    let written = pipeline.process_file(&vv, Some(level1.as_path()), &output).unwrap();

    let reloaded = ViewVectorSet::open(&output).unwrap();
    assert_eq!(reloaded.rows(), 2);
    assert_eq!(reloaded.cols(), 2);
    assert_eq!(reloaded.spatial_binning(), written.spatial_binning());
    assert_eq!(reloaded.rotations(), written.rotations());
    assert_eq!(reloaded.angles(0, 0), Some([2.5, -2.5, 0.75]));
}

#[test]
fn test_bil_header_text() {
    let dir = tempfile::tempdir().unwrap();
    let vv = write_view_vector_file(dir.path(), 5, 2, "2, 4");
    let vectors = ViewVectorSet::open(&vv).unwrap();

    let header = BilWriter.header_text(&vectors).unwrap();
    assert!(header.starts_with("ENVI\n"));
    assert!(header.contains("samples = 5\n"));
    assert!(header.contains("lines = 2\n"));
    assert!(header.contains("data type = 5\n"));
    assert!(header.contains("spatial binning = {2, 4}\n"));
}

#[test]
fn test_tiff_output_has_three_pages() {
    let dir = tempfile::tempdir().unwrap();
    let vv = write_view_vector_file(dir.path(), 3, 2, "1");
    let vectors = ViewVectorSet::open(&vv).unwrap();

    let config = PipelineConfig::builder()
        .output_format(OutputFormat::Tiff)
        .compression(TiffCompression::Lzw)
        .build();
    let pipeline = ViewVectorPipeline::with_custom(TiffViewVectorWriter, config);

    let mut output = Cursor::new(Vec::new());
    pipeline.write(&vectors, &mut output).unwrap();

    let mut decoder = tiff::decoder::Decoder::new(Cursor::new(output.into_inner())).unwrap();
    let mut pages = Vec::new();
    loop {
        assert_eq!(decoder.dimensions().unwrap(), (3, 2));
        match decoder.read_image().unwrap() {
            tiff::decoder::DecodingResult::F64(data) => pages.push(data),
            _ => panic!("expected float64 page"),
        }
        if !decoder.more_images() {
            break;
        }
        decoder.next_image().unwrap();
    }

    assert_eq!(pages.len(), 3);
    assert_eq!(pages[0], vectors.rot_x());
    assert_eq!(pages[1], vectors.rot_y());
    assert_eq!(pages[2], vectors.rot_z());
}
