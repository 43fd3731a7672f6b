//! Unified diff between an exported script and what would be generated now.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use crate::error::{io_err, ExportError};
use crate::pipeline::{prepare, UseRequest};
use crate::writer::normalize_line_endings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Render the script for `request` and diff it against the file at `path`.
///
/// A missing file diffs against empty content. Returns `None` when the file
/// already matches. Nothing is written and no usage is recorded.
pub fn diff_script(
    home: &Path,
    request: &UseRequest,
    path: &Path,
) -> Result<Option<ScriptDiff>, ExportError> {
    let prepared = prepare(home, request)?;
    let rendered = normalize_line_endings(&prepared.script);
    let existing = read_existing_or_empty(path)?;
    if existing == rendered {
        return Ok(None);
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let unified = TextDiff::from_lines(&existing, &rendered)
        .unified_diff()
        .header(&format!("a/{name}"), &format!("b/{name}"))
        .context_radius(3)
        .to_string();

    Ok(Some(ScriptDiff {
        path: path.to_path_buf(),
        unified_diff: unified,
    }))
}

fn read_existing_or_empty(path: &Path) -> Result<String, ExportError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(normalize_line_endings(&content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_err(path, err)),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use hardenkit_core::{usage, Value, VariableMap};
    use tempfile::TempDir;

    use super::*;
    use crate::use_template;

    fn request(out: &Path, file_mode: &str) -> UseRequest {
        let mut values = VariableMap::new();
        values.insert("FILE_MODE".into(), Value::Text(file_mode.into()));
        let mut request = UseRequest::new("u106-shadow-permissions", values);
        request.output = Some(out.to_path_buf());
        request
    }

    #[test]
    fn no_diff_after_export() {
        let home = TempDir::new().unwrap();
        let out = home.path().join("u106.sh");
        let req = request(&out, "400");
        use_template(home.path(), &req).unwrap();

        assert_eq!(diff_script(home.path(), &req, &out).unwrap(), None);
    }

    #[test]
    fn changed_value_produces_unified_diff() {
        let home = TempDir::new().unwrap();
        let out = home.path().join("u106.sh");
        use_template(home.path(), &request(&out, "400")).unwrap();

        let diff = diff_script(home.path(), &request(&out, "600"), &out)
            .unwrap()
            .expect("diff expected");
        assert!(diff.unified_diff.contains("--- a/u106.sh"));
        assert!(diff.unified_diff.contains("+++ b/u106.sh"));
        assert!(diff.unified_diff.contains("-chmod 400 /etc/shadow"));
        assert!(diff.unified_diff.contains("+chmod 600 /etc/shadow"));
    }

    #[test]
    fn missing_file_diffs_against_empty_and_records_nothing() {
        let home = TempDir::new().unwrap();
        let out = home.path().join("absent.sh");
        let diff = diff_script(home.path(), &request(&out, "400"), &out)
            .unwrap()
            .expect("diff expected");
        assert!(diff.unified_diff.contains("+#!/bin/bash"));
        assert!(!out.exists());
        assert!(usage::load_at(home.path()).unwrap().is_empty());
    }

    #[test]
    fn crlf_file_matching_content_has_no_diff() {
        let home = TempDir::new().unwrap();
        let out = home.path().join("crlf.sh");
        let req = request(&out, "400");
        let outcome = use_template(home.path(), &req).unwrap();
        fs::write(&out, outcome.script.replace('\n', "\r\n")).unwrap();
        assert_eq!(diff_script(home.path(), &req, &out).unwrap(), None);
    }
}
