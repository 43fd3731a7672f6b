//! User settings, read from `<home>/.hardenkit/config.yaml`.
//!
//! Every field has a serde default, so a partial file (or no file) is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::{data_dir_at, home};
use crate::error::{parse_err, CatalogError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Separator used to join array values during substitution and to split
    /// them when parsed from the command line. The built-in templates split
    /// arrays on `,`, `;`, space or tab, so any of those is safe here.
    #[serde(default = "default_array_separator")]
    pub array_separator: String,
    /// Interpreter line for generated scripts whose body has no shebang.
    #[serde(default = "default_shell")]
    pub default_shell: String,
    /// Identity recorded in usage records.
    #[serde(default)]
    pub user: Option<String>,
}

fn default_array_separator() -> String {
    ",".to_string()
}

fn default_shell() -> String {
    "/bin/bash".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            array_separator: default_array_separator(),
            default_shell: default_shell(),
            user: None,
        }
    }
}

/// `<home>/.hardenkit/config.yaml` — pure, no I/O.
pub fn settings_path_at(home: &Path) -> PathBuf {
    data_dir_at(home).join("config.yaml")
}

/// Load settings; a missing file yields [`Settings::default`].
pub fn load_at(home: &Path) -> Result<Settings, CatalogError> {
    let path = settings_path_at(home);
    if !path.exists() {
        return Ok(Settings::default());
    }
    let contents = std::fs::read_to_string(&path)?;
    if contents.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| parse_err(&path, e))
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<Settings, CatalogError> {
    load_at(&home()?)
}
