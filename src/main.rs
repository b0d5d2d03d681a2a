//! Command-line front end: scores image files and writes their heat-maps.
//!
//! ```text
//! plant-hpi leaf.jpg fern.png --out-dir spectral_images
//! plant-hpi leaf.jpg --json --no-render
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};
use serde::Serialize;

use plant_hpi::pipeline::spectral_file_name;
use plant_hpi::render::render_to_path;
use plant_hpi::{HealthCategory, HpiAnalysis, HpiWarning, Pipeline, PipelineConfig, ZeroDivisorPolicy};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ZeroDivisorArg {
    Floor,
    Midpoint,
}

impl From<ZeroDivisorArg> for ZeroDivisorPolicy {
    fn from(arg: ZeroDivisorArg) -> Self {
        match arg {
            ZeroDivisorArg::Floor    => ZeroDivisorPolicy::Floor,
            ZeroDivisorArg::Midpoint => ZeroDivisorPolicy::Midpoint,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Compute the Health Plant Index of images and render jet heat-maps")]
struct Args {
    /// Input images (png/jpg/bmp/gif)
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Directory that receives spectral_<file name>.png heat-maps
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Print a JSON array of reports instead of one line per image
    #[arg(long)]
    json: bool,

    /// Score only; do not render heat-maps
    #[arg(long)]
    no_render: bool,

    /// Pipeline configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the uniform-image policy from the config file
    #[arg(long, value_enum)]
    zero_divisor: Option<ZeroDivisorArg>,
}

#[derive(Debug, Serialize)]
struct CliReport {
    image: String,
    health_status: HealthCategory,
    average_hpi: f64,
    spectral_image: Option<String>,
    warning: Option<HpiWarning>,
}

fn load_config(args: &Args) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load_json(&path.to_string_lossy())
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(policy) = args.zero_divisor {
        config.zero_divisor = policy.into();
    }
    Ok(config)
}

fn process(pipeline: &Pipeline, path: &Path, args: &Args) -> Result<CliReport> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read image: {}", path.display()))?;
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();

    let analysis = pipeline.analyze(&bytes)
        .with_context(|| format!("Failed to score {}", path.display()))?;

    let spectral_image = if args.no_render {
        None
    } else {
        let out_path = args.out_dir.join(spectral_file_name(&name));
        render_to_path(&analysis.index.percentage, &pipeline.config().render, &out_path)
            .with_context(|| format!("Failed to save heat-map: {}", out_path.display()))?;
        info!("wrote {}", out_path.display());
        Some(out_path.display().to_string())
    };
    let HpiAnalysis { score, category, index } = analysis;
    let warning = index.warning;

    if let Some(w) = &warning {
        warn!("{}: {}", name, w);
    }

    Ok(CliReport { image: path.display().to_string(), health_status: category, average_hpi: score, spectral_image, warning })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let pipeline = Pipeline::new(load_config(&args)?);

    if !args.no_render {
        std::fs::create_dir_all(&args.out_dir)
            .with_context(|| format!("Failed to create output directory: {}", args.out_dir.display()))?;
    }

    let mut reports = Vec::with_capacity(args.images.len());
    for path in &args.images {
        reports.push(process(&pipeline, path, &args)?);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for r in &reports {
            println!("{}: HPI {:.2} ({})", r.image, r.average_hpi, r.health_status);
        }
    }
    Ok(())
}
