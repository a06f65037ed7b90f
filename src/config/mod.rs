//! Configuration loading and merging
//!
//! Resolves a config file into one document: includes listed under
//! `configs:` are loaded first, then each later layer overrides the earlier
//! ones, and command-line overrides are applied last (CLI > File > Includes).

pub mod document;
pub mod include;
pub mod loader;
pub mod merge;
pub mod template;

pub use loader::{load_experiment, LoadOptions, LoadedConfig};
pub use merge::{merge_cli_with_config, CliOverrides};
