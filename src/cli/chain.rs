//! Chain command implementation

use anyhow::{Context, Result};
use clap::Args;
use evc_config::config::loader::load_merged;

use super::utils::SourceArgs;

#[derive(Args)]
pub struct ChainArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

pub fn run(args: ChainArgs) -> Result<()> {
    let file = &args.source.file;
    let options = args.source.load_options(true)?;
    let (chain, _) = load_merged(file, &options)
        .with_context(|| format!("Failed to resolve includes: {}", file.display()))?;

    // Lowest precedence first, entry file last.
    for (idx, path) in chain.iter().enumerate() {
        println!("{:>2}. {}", idx + 1, path.display());
    }
    Ok(())
}
