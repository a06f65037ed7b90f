//! `{{placeholder}}` substitution against the file being loaded
//!
//! Substitution runs on the parsed document, so a resolved value is always a
//! string no matter what the file name looks like.

use crate::error::{ConfigError, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_yaml::{Mapping, Value};
use std::path::Path;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("valid placeholder regex"));
static PLACEHOLDER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid placeholder name regex"));

/// Values a placeholder can resolve to, derived from one config file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateContext {
    pub file_basename: String,
    pub file_basename_no_extension: String,
    pub file_dirname: String,
    pub file_extname: String,
}

impl TemplateContext {
    pub fn for_file(path: &Path) -> Self {
        let file_basename =
            path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let file_basename_no_extension =
            path.file_stem().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let file_dirname =
            path.parent().map(|p| p.to_string_lossy().into_owned()).unwrap_or_default();
        let file_extname =
            path.extension().map(|e| format!(".{}", e.to_string_lossy())).unwrap_or_default();
        Self { file_basename, file_basename_no_extension, file_dirname, file_extname }
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        match name {
            "fileBasename" => Some(&self.file_basename),
            "fileBasenameNoExtension" => Some(&self.file_basename_no_extension),
            "fileDirname" => Some(&self.file_dirname),
            "fileExtname" => Some(&self.file_extname),
            _ => None,
        }
    }

    fn resolve(&self, name: &str, path: &Path) -> Result<&str> {
        self.lookup(name).ok_or_else(|| ConfigError::UnresolvedPlaceholder {
            name: name.to_string(),
            path: path.to_path_buf(),
        })
    }
}

/// Replace every placeholder in `text`, failing on the first unknown name.
pub fn render(text: &str, ctx: &TemplateContext, path: &Path) -> Result<String> {
    if let Some(caps) = PLACEHOLDER.captures_iter(text).find(|caps| ctx.lookup(&caps[1]).is_none())
    {
        ctx.resolve(&caps[1], path)?;
    }

    let rendered = PLACEHOLDER.replace_all(text, |caps: &Captures| {
        ctx.lookup(&caps[1]).unwrap_or_default().to_string()
    });
    Ok(rendered.into_owned())
}

/// Resolve placeholders in every value of a parsed document.
///
/// Strings are rendered in place. A bare `{{name}}` written without quotes
/// parses as a nested flow mapping `{{name: null}: null}`; that shape is
/// replaced by the resolved string.
pub fn resolve_placeholders(value: &mut Value, ctx: &TemplateContext, path: &Path) -> Result<()> {
    if let Some(name) = bare_placeholder(value) {
        let resolved = ctx.resolve(&name, path)?.to_string();
        *value = Value::String(resolved);
        return Ok(());
    }

    match value {
        Value::String(text) => {
            if PLACEHOLDER.is_match(text) {
                *text = render(text, ctx, path)?;
            }
        }
        Value::Mapping(map) => {
            for child in map.values_mut() {
                resolve_placeholders(child, ctx, path)?;
            }
        }
        Value::Sequence(seq) => {
            for child in seq.iter_mut() {
                resolve_placeholders(child, ctx, path)?;
            }
        }
        Value::Tagged(tagged) => resolve_placeholders(&mut tagged.value, ctx, path)?,
        _ => {}
    }
    Ok(())
}

fn bare_placeholder(value: &Value) -> Option<String> {
    let (outer_key, outer_value) = single_entry(value.as_mapping()?)?;
    if !outer_value.is_null() {
        return None;
    }
    let (name, inner_value) = single_entry(outer_key.as_mapping()?)?;
    let name = name.as_str()?;
    (inner_value.is_null() && PLACEHOLDER_NAME.is_match(name)).then(|| name.to_string())
}

fn single_entry(map: &Mapping) -> Option<(&Value, &Value)> {
    let mut entries = map.iter();
    let entry = entries.next()?;
    entries.next().is_none().then_some(entry)
}
