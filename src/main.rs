// Command-line runner: decodes an image, pixelates it and writes a PNG.

use anyhow::{Context, Result};
use clap::Parser;
use slic_pixelator::core_modules::utils::image_helper::image_helper;
use slic_pixelator::{Pixelator, RunParameters};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "slic_pixelator", about = "Pixelate an image along its SLIC superpixels")]
struct Args {
    /// Image to read (any format the `image` crate decodes).
    input: PathBuf,
    /// PNG file to write.
    output: PathBuf,
    /// JSON file with run parameters; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed grid spacing and search half-width, in pixels.
    #[arg(long)]
    step: Option<usize>,
    /// Number of clustering iterations.
    #[arg(long)]
    iterations: Option<usize>,
    /// Edge length of an output tile, in pixels.
    #[arg(long)]
    block_size: Option<usize>,
    /// Compactness: larger values weight position over color.
    #[arg(long)]
    color_weight: Option<f64>,
    /// Report the number of segment contour pixels.
    #[arg(long)]
    contours: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    // --- 1. Parameters ---
    let mut params = match &args.config {
        Some(path) => RunParameters::from_json_file(path)
            .with_context(|| format!("reading parameters from {}", path.display()))?,
        None => RunParameters::default(),
    };
    params.step = args.step.unwrap_or(params.step);
    params.iterations = args.iterations.unwrap_or(params.iterations);
    params.block_size = args.block_size.unwrap_or(params.block_size);
    params.color_weight = args.color_weight.unwrap_or(params.color_weight);

    // --- 2. Decode ---
    let image = image_helper::load(&args.input)
        .with_context(|| format!("decoding {}", args.input.display()))?;

    // --- 3. Pixelate ---
    let mut pixelator = Pixelator::new(image, params).context("invalid run parameters")?;
    let output = pixelator.process()?;

    if args.contours {
        if let Some(segmentation) = pixelator.segmentation() {
            info!(
                centers = segmentation.centers().len(),
                contour_pixels = segmentation.contour_pixels().len(),
                "segmentation summary"
            );
        }
    }

    // --- 4. Encode ---
    image_helper::save(&args.output, &output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!(output = %args.output.display(), "done");
    Ok(())
}
