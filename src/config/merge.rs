//! Layer merging and command-line overrides
//!
//! Mappings merge key by key; anything else (scalars, sequences, null) in a
//! later layer replaces the earlier value outright.

use crate::config::document::{expand_merge_keys, kind};
use crate::error::{ConfigError, Result};
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// Merge `upper` on top of `base`, recursing into mappings present on both sides.
pub fn merge_layers(base: &mut Mapping, upper: Mapping) {
    for (key, value) in upper {
        match base.get_mut(&key) {
            Some(Value::Mapping(existing)) if value.is_mapping() => {
                if let Value::Mapping(incoming) = value {
                    merge_layers(existing, incoming);
                }
            }
            Some(slot) => *slot = value,
            None => {
                base.insert(key, value);
            }
        }
    }
}

/// `dotted.key.path=value` assignments applied after every file layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    assignments: Vec<(Vec<String>, Value)>,
}

impl CliOverrides {
    pub fn parse<I, S>(exprs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let assignments =
            exprs.into_iter().map(|e| parse_assignment(e.as_ref())).collect::<Result<Vec<_>>>()?;
        Ok(Self { assignments })
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }
}

fn parse_assignment(expr: &str) -> Result<(Vec<String>, Value)> {
    let override_err =
        |message: &str| ConfigError::Override { expr: expr.to_string(), message: message.to_string() };

    let (key, raw) = expr.split_once('=').ok_or_else(|| override_err("expected KEY=VALUE"))?;
    let segments: Vec<String> = key.trim().split('.').map(|s| s.trim().to_string()).collect();
    if segments.iter().any(String::is_empty) {
        return Err(override_err("key path has an empty segment"));
    }

    // Values are YAML so `[0, 100, 2]`, `0.5` and `true` keep their types.
    let mut value: Value = if raw.trim().is_empty() {
        Value::Null
    } else {
        serde_yaml::from_str(raw).map_err(|e| override_err(&e.to_string()))?
    };
    expand_merge_keys(&mut value, Path::new("<command line>"), key)?;
    Ok((segments, value))
}

pub fn merge_cli_with_config(config: &mut Mapping, overrides: &CliOverrides) -> Result<()> {
    for (segments, value) in &overrides.assignments {
        apply_assignment(config, segments, value.clone())?;
    }
    Ok(())
}

fn apply_assignment(config: &mut Mapping, segments: &[String], value: Value) -> Result<()> {
    let Some((last, parents)) = segments.split_last() else {
        return Ok(());
    };

    let mut cursor = config;
    for (depth, segment) in parents.iter().enumerate() {
        let slot = cursor
            .entry(Value::String(segment.clone()))
            .or_insert(Value::Mapping(Mapping::new()));
        cursor = match slot {
            Value::Mapping(next) => next,
            other => {
                return Err(ConfigError::Override {
                    expr: format!("{}={}", segments.join("."), render_inline(&value)),
                    message: format!(
                        "`{}` is {}, not a mapping",
                        segments[..=depth].join("."),
                        kind(other)
                    ),
                })
            }
        };
    }

    tracing::debug!("override {} = {}", segments.join("."), render_inline(&value));
    cursor.insert(Value::String(last.clone()), value);
    Ok(())
}

fn render_inline(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "<value>".to_string())
}
