//! Typed view of a resolved experiment config

use crate::config::document::ConfigFormat;
use crate::domain::viewer::ViewerConfig;
use crate::error::ValidationError;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// The experiment document after includes, merge keys and placeholders are
/// resolved. Keys this crate does not model are ignored here; the loader
/// keeps them in the merged document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Include list, earliest (lowest precedence) first. A single path is
    /// accepted as a list of one.
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub configs: Vec<String>,

    pub dataloader_cfg: DataloaderConfig,

    pub val_dataloader_cfg: DataloaderConfig,

    pub model_cfg: ModelConfig,

    /// Tag for run outputs. The loader fills it from the file stem when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewer_cfg: Option<ViewerConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataloaderConfig {
    pub dataset_cfg: DatasetConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub frame_sample: FrameSample,
}

/// `[start, end, step]` selection over a frame sequence, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct FrameSample {
    pub start: i64,
    pub end: i64,
    pub step: i64,
}

impl FrameSample {
    pub fn new(start: i64, end: i64, step: i64) -> Self {
        Self { start, end, step }
    }

    /// Number of selected frames, zero for an invalid range.
    pub fn len(&self) -> usize {
        if self.step <= 0 || self.end <= self.start {
            return 0;
        }
        let span = self.end.abs_diff(self.start);
        let step = self.step.unsigned_abs();
        usize::try_from(span.div_ceil(step)).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Selected frame indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = i64> {
        let step = usize::try_from(self.step).unwrap_or(1).max(1);
        let range = if self.is_empty() { 0..0 } else { self.start..self.end };
        range.step_by(step)
    }

    pub fn validate(&self, field: &str, errors: &mut ValidationError) {
        if self.start < 0 {
            errors.push(field, format!("start must be non-negative, got {}", self.start));
        }
        if self.start >= self.end {
            errors.push(
                field,
                format!("start must be less than end, got [{}, {}]", self.start, self.end),
            );
        }
        if self.step <= 0 {
            errors.push(field, format!("step must be positive, got {}", self.step));
        }
    }
}

impl TryFrom<Vec<i64>> for FrameSample {
    type Error = String;

    fn try_from(values: Vec<i64>) -> Result<Self, Self::Error> {
        match values.as_slice() {
            &[start, end, step] => Ok(Self { start, end, step }),
            other => Err(format!(
                "frame_sample must be [start, end, step] with 3 integers, got {} element(s)",
                other.len()
            )),
        }
    }
}

impl From<FrameSample> for Vec<i64> {
    fn from(sample: FrameSample) -> Self {
        vec![sample.start, sample.end, sample.step]
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(path)) => vec![path],
        Some(OneOrMany::Many(paths)) => paths,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub sampler_cfg: SamplerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Points drawn for surface extraction.
    pub n_points: u64,

    pub bg_sampler_cfg: BgSamplerConfig,
}

/// Background sampler radius band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BgSamplerConfig {
    pub radius_shift: f64,
    pub radius_max: f64,
}

impl ExperimentConfig {
    /// Check every invariant, reporting all violations at once.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();

        for (idx, entry) in self.configs.iter().enumerate() {
            let field = format!("configs[{idx}]");
            if entry.trim().is_empty() {
                errors.push(field, "include path is empty");
            } else if !ConfigFormat::is_recognized(Path::new(entry)) {
                errors.push(field, format!("`{entry}` does not have a config file extension"));
            }
        }

        self.dataloader_cfg
            .dataset_cfg
            .frame_sample
            .validate("dataloader_cfg.dataset_cfg.frame_sample", &mut errors);
        self.val_dataloader_cfg
            .dataset_cfg
            .frame_sample
            .validate("val_dataloader_cfg.dataset_cfg.frame_sample", &mut errors);

        let bg = &self.model_cfg.sampler_cfg.bg_sampler_cfg;
        if !bg.radius_shift.is_finite() {
            errors.push("model_cfg.sampler_cfg.bg_sampler_cfg.radius_shift", "must be finite");
        }
        if !bg.radius_max.is_finite() {
            errors.push("model_cfg.sampler_cfg.bg_sampler_cfg.radius_max", "must be finite");
        }

        if let Some(name) = &self.exp_name {
            if name.trim().is_empty() {
                errors.push("exp_name", "must not be empty");
            }
        }

        if let Some(viewer) = &self.viewer_cfg {
            viewer.validate("viewer_cfg", &mut errors);
        }

        errors.into_result()
    }
}
