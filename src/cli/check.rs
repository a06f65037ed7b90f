//! Check command implementation

use anyhow::{Context, Result};
use clap::Args;
use evc_config::load_experiment;

use super::utils::SourceArgs;

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Apply the schema but skip value checks such as frame ranges and ports
    #[arg(long)]
    pub no_validate: bool,
}

pub fn run(args: CheckArgs) -> Result<()> {
    let file = &args.source.file;
    let options = args.source.load_options(args.no_validate)?;
    let loaded = load_experiment(file, &options)
        .with_context(|| format!("Invalid config: {}", file.display()))?;
    let cfg = &loaded.experiment;

    let train = cfg.dataloader_cfg.dataset_cfg.frame_sample;
    let val = cfg.val_dataloader_cfg.dataset_cfg.frame_sample;
    let sampler = &cfg.model_cfg.sampler_cfg;

    println!("Experiment: {}", loaded.exp_name());
    println!("Layers: {}", loaded.chain.len());
    println!(
        "Train frames: [{}, {}, {}] ({} frames)",
        train.start,
        train.end,
        train.step,
        train.len()
    );
    println!("Val frames: [{}, {}, {}] ({} frames)", val.start, val.end, val.step, val.len());
    println!("Sampler points: {}", sampler.n_points);
    println!(
        "Background radius: shift {} max {}",
        sampler.bg_sampler_cfg.radius_shift, sampler.bg_sampler_cfg.radius_max
    );
    if let Some(viewer) = &cfg.viewer_cfg {
        println!(
            "Viewer: {} send {} recv {} ({}x{}, jpeg {})",
            viewer.host,
            viewer.send_port,
            viewer.recv_port,
            viewer.camera_cfg.width,
            viewer.camera_cfg.height,
            viewer.jpeg_quality
        );
    }
    println!("OK");
    Ok(())
}
