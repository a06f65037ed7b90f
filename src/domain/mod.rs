//! Experiment config schema

pub mod experiment;
pub mod viewer;

pub use experiment::{
    BgSamplerConfig, DataloaderConfig, DatasetConfig, ExperimentConfig, FrameSample, ModelConfig,
    SamplerConfig,
};
pub use viewer::{CameraConfig, ViewerConfig};
