//! evc-config: resolve layered experiment configs
//!
//! Merges an experiment config with the base configs it includes and prints,
//! validates or explains the result.

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    cli::run()
}
