//! Hash-gated atomic script writer.
//!
//! ## `write_script` protocol
//!
//! 1. Normalise line endings to LF.
//! 2. SHA-256 the normalised content.
//! 3. Hash whatever is on disk at the target path.
//! 4. Identical digest → skip; the file is not touched.
//! 5. Write to `<path>.hardenkit.tmp`, mark it executable.
//! 6. Rename to the final path (atomic on POSIX).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{io_err, ExportError};

/// Mode applied to exported scripts on Unix.
pub const SCRIPT_MODE: u32 = 0o755;

/// Outcome of a single script write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf, digest: String },
    /// File already holds exactly this content.
    Unchanged { path: PathBuf, digest: String },
    /// Dry run: the file *would* have been written.
    WouldWrite { path: PathBuf, digest: String },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path, .. }
            | WriteResult::Unchanged { path, .. }
            | WriteResult::WouldWrite { path, .. } => path,
        }
    }

    pub fn digest(&self) -> &str {
        match self {
            WriteResult::Written { digest, .. }
            | WriteResult::Unchanged { digest, .. }
            | WriteResult::WouldWrite { digest, .. } => digest,
        }
    }
}

/// Hex SHA-256 of `content`.
pub fn content_digest(content: &str) -> String {
    let mut h = Sha256::new();
    h.update(content.as_bytes());
    hex::encode(h.finalize())
}

pub(crate) fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}

/// `<path>.hardenkit.tmp`
pub fn tmp_path_for(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.hardenkit.tmp", path.display()))
}

/// Digest of the LF-normalised file at `path`, or `None` if it does not exist.
fn digest_on_disk(path: &Path) -> Result<Option<String>, ExportError> {
    match std::fs::read_to_string(path) {
        Ok(existing) => Ok(Some(content_digest(&normalize_line_endings(&existing)))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        // Unreadable as UTF-8 counts as different content.
        Err(e) if e.kind() == ErrorKind::InvalidData => Ok(None),
        Err(e) => Err(io_err(path, e)),
    }
}

/// Atomically write `content` to `path` unless it already holds it.
pub fn write_script(path: &Path, content: &str, dry_run: bool) -> Result<WriteResult, ExportError> {
    write_script_with_tmp(path, content, dry_run, &tmp_path_for(path))
}

fn write_script_with_tmp(
    path: &Path,
    content: &str,
    dry_run: bool,
    tmp: &Path,
) -> Result<WriteResult, ExportError> {
    let content = normalize_line_endings(content);
    let digest = content_digest(&content);

    if digest_on_disk(path)?.as_deref() == Some(digest.as_str()) {
        tracing::debug!("unchanged: {}", path.display());
        return Ok(WriteResult::Unchanged {
            path: path.to_path_buf(),
            digest,
        });
    }

    if dry_run {
        tracing::info!("[dry-run] would write: {}", path.display());
        return Ok(WriteResult::WouldWrite {
            path: path.to_path_buf(),
            digest,
        });
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    if let Some(tmp_parent) = tmp.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(tmp_parent).map_err(|e| io_err(tmp_parent, e))?;
    }
    std::fs::write(tmp, &content).map_err(|e| io_err(tmp, e))?;
    if let Err(e) = set_executable(tmp) {
        let _ = std::fs::remove_file(tmp);
        return Err(e);
    }

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
        digest,
    })
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<(), ExportError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(SCRIPT_MODE))
        .map_err(|e| io_err(path, e))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<(), ExportError> {
    Ok(())
}
