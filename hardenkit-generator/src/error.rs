//! Error types for hardenkit-generator.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from wrapping a generated body into a script file.
///
/// Generation itself never fails; see [`crate::GenerationResult`].
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Filesystem error while loading user script layouts.
    #[error("layout io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}
