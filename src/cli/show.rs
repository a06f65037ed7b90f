//! Show command implementation

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use evc_config::config::loader::load_merged;
use evc_config::load_experiment;
use serde_yaml::Value;

use super::utils::SourceArgs;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Print the merged document as-is, without schema checks
    #[arg(long)]
    pub raw: bool,

    /// Apply the schema but skip value checks such as frame ranges and ports
    #[arg(long)]
    pub no_validate: bool,
}

pub fn run(args: ShowArgs) -> Result<()> {
    let file = &args.source.file;
    let options = args.source.load_options(args.raw || args.no_validate)?;

    let merged = if args.raw {
        load_merged(file, &options)
            .with_context(|| format!("Failed to load config: {}", file.display()))?
            .1
    } else {
        // Load through the schema so broken configs fail here, not in the runner.
        load_experiment(file, &options)
            .with_context(|| format!("Failed to load config: {}", file.display()))?
            .merged
    };

    let rendered = match args.format {
        OutputFormat::Yaml => serde_yaml::to_string(&Value::Mapping(merged))?,
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&Value::Mapping(merged))?;
            json.push('\n');
            json
        }
    };
    print!("{}", rendered);
    Ok(())
}
