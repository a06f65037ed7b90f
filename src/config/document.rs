//! Single-file reading: format detection, parsing, placeholders and
//! merge-key expansion

use crate::config::template::{self, TemplateContext};
use crate::error::{ConfigError, Result};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

const MERGE_KEY: &str = "<<";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat {
                extension: other.to_string(),
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn is_recognized(path: &Path) -> bool {
        Self::from_path(path).is_ok()
    }
}

/// Read one config file into a mapping with placeholders substituted and
/// merge keys expanded. Includes are not followed here.
pub fn read_document(path: &Path) -> Result<Mapping> {
    let format = ConfigFormat::from_path(path)?;
    let text = fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    parse_document(&text, format, path)
}

pub fn parse_document(text: &str, format: ConfigFormat, path: &Path) -> Result<Mapping> {
    let parse_err = |message: String| ConfigError::Parse { path: path.to_path_buf(), message };

    // An empty file is an empty layer.
    if is_blank(text) {
        return Ok(Mapping::new());
    }

    let mut value = match format {
        ConfigFormat::Yaml => {
            serde_yaml::from_str::<Value>(text).map_err(|e| parse_err(e.to_string()))?
        }
        ConfigFormat::Json => {
            let json: serde_json::Value =
                serde_json::from_str(text).map_err(|e| parse_err(e.to_string()))?;
            serde_yaml::to_value(json).map_err(|e| parse_err(e.to_string()))?
        }
        ConfigFormat::Toml => {
            let toml: toml::Value = toml::from_str(text).map_err(|e| parse_err(e.to_string()))?;
            serde_yaml::to_value(toml).map_err(|e| parse_err(e.to_string()))?
        }
    };

    template::resolve_placeholders(&mut value, &TemplateContext::for_file(path), path)?;
    expand_merge_keys(&mut value, path, "")?;

    match value {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        other => Err(parse_err(format!("top level must be a mapping, found {}", kind(&other)))),
    }
}

fn is_blank(text: &str) -> bool {
    text.lines().map(str::trim).all(|line| line.is_empty() || line.starts_with('#'))
}

/// Expand every `<<` entry below `value` in place.
///
/// The merged-in mappings never override keys written next to the `<<`, and
/// in a sequence of sources the earlier source wins. Malformed merge keys are
/// located first so the error can name the field; `field` prefixes that name.
pub fn expand_merge_keys(value: &mut Value, path: &Path, field: &str) -> Result<()> {
    if let Some((bad_field, message)) = find_invalid_merge(value, field) {
        return Err(ConfigError::Merge { path: path.to_path_buf(), field: bad_field, message });
    }
    apply_merge_bottom_up(value).map_err(|e| ConfigError::Merge {
        path: path.to_path_buf(),
        field: field.to_string(),
        message: e.to_string(),
    })
}

// Children first, so a source that itself carries `<<` is complete before it
// is merged into its parent.
fn apply_merge_bottom_up(value: &mut Value) -> std::result::Result<(), serde_yaml::Error> {
    match value {
        Value::Mapping(map) => {
            for child in map.values_mut() {
                apply_merge_bottom_up(child)?;
            }
            if map.contains_key(MERGE_KEY) {
                value.apply_merge()?;
            }
        }
        Value::Sequence(seq) => {
            for item in seq.iter_mut() {
                apply_merge_bottom_up(item)?;
            }
        }
        Value::Tagged(tagged) => apply_merge_bottom_up(&mut tagged.value)?,
        _ => {}
    }
    Ok(())
}

fn find_invalid_merge(value: &Value, field: &str) -> Option<(String, String)> {
    match value {
        Value::Mapping(map) => map.iter().find_map(|(key, child)| {
            let child_field = join_field(field, key);
            if key.as_str() == Some(MERGE_KEY) {
                if let Some(message) = invalid_merge_source(child) {
                    return Some((child_field, message));
                }
            }
            find_invalid_merge(child, &child_field)
        }),
        Value::Sequence(seq) => seq
            .iter()
            .enumerate()
            .find_map(|(idx, item)| find_invalid_merge(item, &format!("{field}[{idx}]"))),
        Value::Tagged(tagged) => find_invalid_merge(&tagged.value, field),
        _ => None,
    }
}

fn invalid_merge_source(source: &Value) -> Option<String> {
    match source {
        Value::Mapping(_) => None,
        Value::Sequence(seq) => seq.iter().find(|item| !item.is_mapping()).map(|other| {
            format!("sequence entries must be mappings, found {}", kind(other))
        }),
        other => Some(format!("expected a mapping or a sequence of mappings, found {}", kind(other))),
    }
}

pub(crate) fn join_field(parent: &str, key: &Value) -> String {
    let key = match key {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other).map(|s| s.trim().to_string()).unwrap_or_default(),
    };
    if parent.is_empty() {
        key
    } else {
        format!("{parent}.{key}")
    }
}

pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
