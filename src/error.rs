//! Loader error type

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config not found: {entry} (included from {included_from})")]
    NotFound { entry: String, included_from: PathBuf },

    #[error("failed reading config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported config extension '.{extension}' for file {path}")]
    UnsupportedFormat { extension: String, path: PathBuf },

    #[error("invalid config syntax in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid merge key at `{field}` in {path}: {message}")]
    Merge { path: PathBuf, field: String, message: String },

    #[error("unresolved placeholder {{{{{name}}}}} in {path}")]
    UnresolvedPlaceholder { name: String, path: PathBuf },

    #[error("config include cycle: {}", format_chain(.chain))]
    Cycle { chain: Vec<PathBuf> },

    #[error("invalid override `{expr}`: {message}")]
    Override { expr: String, message: String },

    #[error("config {path} does not match the experiment schema at `{field}`: {message}")]
    Schema { path: PathBuf, field: String, message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(" -> ")
}

fn format_issues(issues: &[(String, String)]) -> String {
    issues.iter().map(|(field, message)| format!("{field}: {message}")).collect::<Vec<_>>().join("; ")
}

/// Every violated invariant of a typed config, keyed by dotted field path.
#[derive(Debug, Default, Clone, PartialEq, Error)]
#[error("invalid config: {}", format_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<(String, String)>,
}

impl ValidationError {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.issues.push((field.into(), message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|(f, _)| f == field)
    }
}
