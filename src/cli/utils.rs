//! Shared CLI arguments.

use anyhow::{Context, Result};
use clap::Args;
use evc_config::{CliOverrides, LoadOptions};
use std::path::PathBuf;

#[derive(Args)]
pub struct SourceArgs {
    /// Experiment config file to load
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Directory `configs:` entries are resolved against (defaults to the current directory)
    #[arg(short, long, value_name = "DIR", env = "EVC_CONFIG_ROOT")]
    pub root: Option<PathBuf>,

    /// Override a value after all layers are merged, e.g. `model_cfg.sampler_cfg.n_points=1024`
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,
}

impl SourceArgs {
    pub fn load_options(&self, skip_validation: bool) -> Result<LoadOptions> {
        let overrides = CliOverrides::parse(&self.overrides).context("Invalid --set override")?;
        Ok(LoadOptions { project_root: self.root.clone(), overrides, skip_validation })
    }
}
