//! Config file loading

use crate::config::include::{resolve_chain, INCLUDE_KEY};
use crate::config::merge::{merge_cli_with_config, merge_layers, CliOverrides};
use crate::domain::ExperimentConfig;
use crate::error::{ConfigError, Result};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

const EXP_NAME_KEY: &str = "exp_name";

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Directory `configs:` entries are resolved against first. Defaults to
    /// the current directory.
    pub project_root: Option<PathBuf>,
    pub overrides: CliOverrides,
    pub skip_validation: bool,
}

/// A fully resolved config.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub path: PathBuf,
    /// Every file that contributed, in merge order; `path` is last.
    pub chain: Vec<PathBuf>,
    /// The merged document, including keys the typed view does not model.
    pub merged: Mapping,
    pub experiment: ExperimentConfig,
}

impl LoadedConfig {
    pub fn exp_name(&self) -> &str {
        self.experiment.exp_name.as_deref().unwrap_or_default()
    }
}

/// Resolve `path` and its includes into one merged mapping, without the
/// typed schema applied.
pub fn load_merged(path: &Path, options: &LoadOptions) -> Result<(Vec<PathBuf>, Mapping)> {
    let project_root = match &options.project_root {
        Some(root) => root.clone(),
        None => std::env::current_dir()
            .map_err(|source| ConfigError::Io { path: PathBuf::from("."), source })?,
    };

    let layers = resolve_chain(path, &project_root)?;
    let last = layers.len().saturating_sub(1);

    let mut chain = Vec::with_capacity(layers.len());
    let mut merged = Mapping::new();
    for (idx, layer) in layers.into_iter().enumerate() {
        chain.push(layer.path);
        // Only the entry file's include list describes the final config.
        let document = if idx == last {
            layer.document
        } else {
            layer.document.into_iter().filter(|(key, _)| key.as_str() != Some(INCLUDE_KEY)).collect()
        };
        merge_layers(&mut merged, document);
    }

    if !options.overrides.is_empty() {
        tracing::info!("applying {} command-line override(s)", options.overrides.len());
        merge_cli_with_config(&mut merged, &options.overrides)?;
    }

    fill_exp_name(&mut merged, path);
    Ok((chain, merged))
}

pub fn load_experiment(path: &Path, options: &LoadOptions) -> Result<LoadedConfig> {
    let (chain, merged) = load_merged(path, options)?;

    let experiment: ExperimentConfig =
        serde_path_to_error::deserialize(Value::Mapping(merged.clone())).map_err(|e| {
            ConfigError::Schema {
                path: path.to_path_buf(),
                field: e.path().to_string(),
                message: e.inner().to_string(),
            }
        })?;

    if options.skip_validation {
        tracing::debug!("skipping validation of {}", path.display());
    } else {
        experiment.validate()?;
    }

    Ok(LoadedConfig { path: path.to_path_buf(), chain, merged, experiment })
}

fn fill_exp_name(merged: &mut Mapping, path: &Path) {
    let missing = matches!(merged.get(EXP_NAME_KEY), None | Some(Value::Null));
    if !missing {
        return;
    }
    let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
        return;
    };
    tracing::debug!("exp_name not set, using file stem `{stem}`");
    merged.insert(Value::String(EXP_NAME_KEY.to_string()), Value::String(stem));
}
