//! Error types for hardenkit-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{TemplateId, VariableKind};

/// All errors that can arise from catalog, usage-log and settings operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (write/save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error (usage log save path).
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Parse error on load, with the offending file path.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// `dirs::home_dir()` returned `None`; cannot locate `~/.hardenkit/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// The catalog file did not exist at the expected path.
    #[error("catalog not found at {path}")]
    CatalogNotFound { path: PathBuf },

    /// The catalog file declares a format this build does not read.
    #[error("unsupported catalog version {found} in {path} (expected {supported})")]
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        supported: u32,
    },

    /// No template with this id in the catalog.
    #[error("template not found: {id}")]
    TemplateNotFound { id: TemplateId },

    /// Catalog data breaks a structural rule (duplicate id, duplicate variable, bad timestamps).
    #[error("invalid catalog entry '{id}': {reason}")]
    InvalidTemplate { id: TemplateId, reason: String },

    /// A raw value supplied at a boundary does not parse as the declared kind.
    #[error("invalid value for '{name}' ({kind}): {reason}")]
    InvalidValue {
        name: String,
        kind: VariableKind,
        reason: String,
    },
}

impl CatalogError {
    /// Whether this is the explicit not-found outcome of a lookup.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::TemplateNotFound { .. })
    }
}

pub(crate) fn parse_err(
    path: impl Into<PathBuf>,
    source: impl std::error::Error + Send + Sync + 'static,
) -> CatalogError {
    CatalogError::Parse {
        path: path.into(),
        source: Box::new(source),
    }
}
