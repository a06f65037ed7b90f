//! Following the `configs:` include list

use crate::config::document::{kind, read_document};
use crate::error::{ConfigError, Result};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const INCLUDE_KEY: &str = "configs";

/// One parsed file of the chain.
#[derive(Debug, Clone)]
pub struct Layer {
    pub path: PathBuf,
    pub document: Mapping,
}

/// Load `entry` and everything it includes, depth first.
///
/// The returned layers are in merge order: a file's includes (in listed
/// order) come before the file itself, so `entry` is always last.
pub fn resolve_chain(entry: &Path, project_root: &Path) -> Result<Vec<Layer>> {
    let mut layers = Vec::new();
    let mut stack = Vec::new();
    load_recursive(entry, project_root, &mut stack, &mut layers)?;
    tracing::info!("resolved {} config layer(s) for {}", layers.len(), entry.display());
    Ok(layers)
}

fn load_recursive(
    path: &Path,
    project_root: &Path,
    stack: &mut Vec<PathBuf>,
    layers: &mut Vec<Layer>,
) -> Result<()> {
    let identity = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if stack.contains(&identity) {
        let mut chain = stack.clone();
        chain.push(identity);
        return Err(ConfigError::Cycle { chain });
    }

    let document = read_document(path)?;
    tracing::debug!("loaded config layer {}", path.display());

    stack.push(identity);
    for include in include_entries(&document, path)? {
        let resolved = resolve_include(&include, path, project_root)?;
        load_recursive(&resolved, project_root, stack, layers)?;
    }
    stack.pop();

    layers.push(Layer { path: path.to_path_buf(), document });
    Ok(())
}

/// The include list of one document. A single string counts as a list of one.
pub fn include_entries(document: &Mapping, path: &Path) -> Result<Vec<String>> {
    let schema_err = |found: &Value| ConfigError::Schema {
        path: path.to_path_buf(),
        field: INCLUDE_KEY.to_string(),
        message: format!("expected a path or a list of paths, found {}", kind(found)),
    };

    let entries = match document.get(INCLUDE_KEY) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::String(single)) => vec![single.clone()],
        Some(Value::Sequence(seq)) => seq
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(|| schema_err(item)))
            .collect::<Result<Vec<_>>>()?,
        Some(other) => return Err(schema_err(other)),
    };

    Ok(entries
        .into_iter()
        .filter(|entry| {
            let keep = !entry.trim().is_empty();
            if !keep {
                tracing::warn!("skipping empty `{INCLUDE_KEY}` entry in {}", path.display());
            }
            keep
        })
        .map(|entry| entry.trim().to_string())
        .collect())
}

/// Locate an include: absolute paths as written, otherwise the project root
/// first and then the including file's directory.
pub fn resolve_include(entry: &str, included_from: &Path, project_root: &Path) -> Result<PathBuf> {
    let raw = Path::new(entry);
    let candidates: Vec<PathBuf> = if raw.is_absolute() {
        vec![raw.to_path_buf()]
    } else {
        let mut candidates = vec![project_root.join(raw)];
        if let Some(dir) = included_from.parent() {
            candidates.push(dir.join(raw));
        }
        candidates
    };

    candidates.into_iter().find(|candidate| candidate.is_file()).ok_or_else(|| {
        ConfigError::NotFound { entry: entry.to_string(), included_from: included_from.to_path_buf() }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, content).expect("write");
        path
    }

    fn names(layers: &[Layer]) -> Vec<String> {
        layers
            .iter()
            .map(|l| l.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn includes_load_before_includer_in_listed_order() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "configs/base.yaml", "a: 1\n");
        write(tmp.path(), "configs/models/m.yaml", "configs: configs/base.yaml\nb: 2\n");
        write(tmp.path(), "configs/datasets/d.yaml", "c: 3\n");
        let exp = write(
            tmp.path(),
            "configs/exps/exp.yaml",
            "configs:\n  - configs/models/m.yaml\n  - configs/datasets/d.yaml\n",
        );

        let layers = resolve_chain(&exp, tmp.path()).expect("chain");
        assert_eq!(names(&layers), ["base.yaml", "m.yaml", "d.yaml", "exp.yaml"]);
    }

    #[test]
    fn falls_back_to_including_directory() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "configs/exps/sibling.yaml", "a: 1\n");
        let exp = write(tmp.path(), "configs/exps/exp.yaml", "configs: [sibling.yaml]\n");

        let layers = resolve_chain(&exp, tmp.path()).expect("chain");
        assert_eq!(names(&layers), ["sibling.yaml", "exp.yaml"]);
    }

    #[test]
    fn project_root_wins_over_including_directory() {
        let tmp = TempDir::new().expect("tmp");
        let at_root = write(tmp.path(), "shared.yaml", "from: root\n");
        write(tmp.path(), "configs/shared.yaml", "from: local\n");
        let exp = write(tmp.path(), "configs/exp.yaml", "configs: [shared.yaml]\n");

        let layers = resolve_chain(&exp, tmp.path()).expect("chain");
        assert_eq!(layers[0].path, at_root);
    }

    #[test]
    fn missing_include_names_entry_and_includer() {
        let tmp = TempDir::new().expect("tmp");
        let exp = write(tmp.path(), "exp.yaml", "configs: [configs/nope.yaml]\n");

        let err = resolve_chain(&exp, tmp.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("config not found: configs/nope.yaml"), "{message}");
        assert!(message.contains("exp.yaml"), "{message}");
    }

    #[test]
    fn self_include_is_a_cycle() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "a.yaml", "configs: [b.yaml]\n");
        write(tmp.path(), "b.yaml", "configs: [a.yaml]\n");

        let err = resolve_chain(&tmp.path().join("a.yaml"), tmp.path()).unwrap_err();
        match err {
            ConfigError::Cycle { chain } => assert_eq!(chain.len(), 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn diamond_includes_are_not_cycles() {
        let tmp = TempDir::new().expect("tmp");
        write(tmp.path(), "base.yaml", "a: 1\n");
        write(tmp.path(), "left.yaml", "configs: [base.yaml]\n");
        write(tmp.path(), "right.yaml", "configs: [base.yaml]\n");
        let top = write(tmp.path(), "top.yaml", "configs: [left.yaml, right.yaml]\n");

        let layers = resolve_chain(&top, tmp.path()).expect("chain");
        assert_eq!(names(&layers), ["base.yaml", "left.yaml", "base.yaml", "right.yaml", "top.yaml"]);
    }

    #[test]
    fn empty_entries_are_skipped() {
        let doc: Mapping = serde_yaml::from_str("configs: ['a.yaml', '  ', b.yaml]\n").unwrap();
        let entries = include_entries(&doc, Path::new("x.yaml")).expect("entries");
        assert_eq!(entries, ["a.yaml", "b.yaml"]);
    }

    #[test]
    fn non_string_entry_is_a_schema_error() {
        let doc: Mapping = serde_yaml::from_str("configs: [1]\n").unwrap();
        let err = include_entries(&doc, Path::new("x.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Schema { .. }));
    }
}
