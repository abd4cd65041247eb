use anyhow::{Context, Result};
use std::path::PathBuf;
use structopt::StructOpt;
use tracing_subscriber::layer::SubscriberExt;

mod aggregate;
mod angle;
mod config;
mod dataset;
mod detect;
mod error;
mod extract;
mod point;
mod pose;

#[derive(structopt::StructOpt)]
struct Opt {
    /// Directory of still images to process.
    image_dir: PathBuf,

    /// Path of the CSV dataset to write.
    output: PathBuf,

    /// Pose-detection oracle command, run once per image.
    #[structopt(long)]
    oracle: PathBuf,

    /// Landmarks at or below this visibility count as missing.
    #[structopt(long, default_value = "0.5")]
    visibility_threshold: f32,

    /// Oracle detection confidence threshold.
    #[structopt(long, default_value = "0.5")]
    min_detection_confidence: f32,

    /// Oracle tracking confidence threshold.
    #[structopt(long, default_value = "0.5")]
    min_tracking_confidence: f32,

    #[structopt(short, long, default_value = "info", env = "RUST_LOG")]
    log_level: tracing_subscriber::filter::EnvFilter,

    #[structopt(short, long)]
    show_progress: bool,
}

fn main() -> Result<()> {
    let opt = Opt::from_args();

    tracing::subscriber::set_global_default(
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(opt.log_level),
    )?;

    let mut config = config::PipelineConfig::new(opt.image_dir, opt.output);
    config.visibility_threshold = opt.visibility_threshold;
    config.detector = config::DetectorConfig {
        min_detection_confidence: opt.min_detection_confidence,
        min_tracking_confidence: opt.min_tracking_confidence,
    };

    let mut detector = detect::CommandDetector::new(opt.oracle, config.detector);

    aggregate::run(&config, &mut detector, opt.show_progress)
        .context("failed running extraction batch")
}
