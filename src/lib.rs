//! evc-config: layered experiment configuration for volumetric video runs
//!
//! Loads an experiment config together with the base configs it includes,
//! expands YAML merge keys, substitutes file placeholders and exposes the
//! result as a validated [`domain::ExperimentConfig`].

pub mod config;
pub mod domain;
pub mod error;

pub use config::{load_experiment, CliOverrides, LoadOptions, LoadedConfig};
pub use domain::ExperimentConfig;
pub use error::{ConfigError, ValidationError};
