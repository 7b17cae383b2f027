use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use viewvector_rs::logger;
use viewvector_rs::view_pipeline::{Boresight, OutputFormat, PipelineConfig, TiffCompression, ViewVectorPipeline};

use tracing::{error, info};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Bil,
    Tiff,
}

/// Reconcile sensor view vectors with a level-1 product.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// View vector file (3 bands: rotations about X, Y, Z).
    #[arg(long)]
    vvfile: PathBuf,

    /// Level-1 file whose binning and pixel window the view vectors must match.
    #[arg(long)]
    lev1: Option<PathBuf>,

    /// Output file.
    #[arg(long)]
    output: PathBuf,

    #[arg(long, value_enum, default_value_t = Format::Bil)]
    format: Format,

    /// Boresight correction added to every pixel: X Y Z.
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    boresight: Option<Vec<f64>>,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    logger::init(&args.log_level);

    if let Err(err) = run(args) {
        error!("View vector processing failed: {:#}", err);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let boresight = args
        .boresight
        .as_deref()
        .map(|angles| Boresight::new(angles[0], angles[1], angles[2]));

    let (output_format, compression) = match args.format {
        Format::Bil => (OutputFormat::Bil, TiffCompression::None),
        Format::Tiff => (OutputFormat::Tiff, TiffCompression::DeflateBalanced),
    };

    let config = PipelineConfig::builder()
        .boresight(boresight)
        .output_format(output_format)
        .compression(compression)
        .build();
    let pipeline = ViewVectorPipeline::new(config);

    info!("View vector pipeline initialized");
    info!("Output format: {:?}", pipeline.config().output_format);
    if let Some(boresight) = pipeline.config().boresight {
        info!("Boresight: {:?}", boresight);
    }

    let vectors = pipeline
        .process_file(&args.vvfile, args.lev1.as_deref(), &args.output)
        .with_context(|| format!("processing {}", args.vvfile.display()))?;

    info!(
        rows = vectors.rows(),
        cols = vectors.cols(),
        output = %args.output.display(),
        "Done"
    );
    Ok(())
}
