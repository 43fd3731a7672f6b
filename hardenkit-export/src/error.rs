//! Error types for hardenkit-export.

use std::path::PathBuf;

use thiserror::Error;

use hardenkit_core::CatalogError;
use hardenkit_generator::RenderError;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Catalog, usage log or settings failure, including an unknown template id.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    /// True when the requested template does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ExportError::Catalog(e) if e.is_not_found())
    }
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ExportError {
    ExportError::Io {
        path: path.into(),
        source,
    }
}
