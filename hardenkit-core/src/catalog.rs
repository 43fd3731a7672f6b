//! Template catalog: the in-memory repository plus its YAML persistence.
//!
//! # Storage layout
//!
//! ```text
//! ~/.hardenkit/
//!   catalog.yaml   (all templates — mode 0600, written atomically)
//!   layouts/       (optional script.sh.tera override)
//! ```
//!
//! # API pattern
//!
//! Every persistence function has two forms:
//! - `fn_at(home: &Path, …)` — explicit home; used in tests with `TempDir`
//! - `fn(…)` — derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrappers; always use `_at`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{parse_err, CatalogError};
use crate::query::{self, SortSpec, TemplateFilter};
use crate::types::{is_placeholder_name, Template, TemplateId, TemplateSummary};

const BUILTIN_CATALOG: &str = include_str!("data/builtin.yaml");

/// Current on-disk format version.
pub const CATALOG_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// 1. Repository
// ---------------------------------------------------------------------------

/// The full collection of available templates.
///
/// Owned by the composing application and passed by reference to queries
/// and generation. The only mutation is [`Catalog::record_download`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub version: u32,
    #[serde(default)]
    templates: Vec<Template>,
}

impl Catalog {
    /// Build a catalog, rejecting structurally invalid entries.
    pub fn new(templates: Vec<Template>) -> Result<Self, CatalogError> {
        let catalog = Catalog {
            version: CATALOG_VERSION,
            templates,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The catalog shipped inside the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_yaml::from_str(BUILTIN_CATALOG)
            .map_err(|e| parse_err("<builtin catalog>", e))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Look up a template. Absence is reported as
    /// [`CatalogError::TemplateNotFound`], never a panic.
    pub fn get(&self, id: &TemplateId) -> Result<&Template, CatalogError> {
        self.templates
            .iter()
            .find(|t| &t.id == id)
            .ok_or_else(|| CatalogError::TemplateNotFound { id: id.clone() })
    }

    /// Filtered, optionally sorted templates.
    pub fn query(&self, filter: &TemplateFilter, sort: Option<SortSpec>) -> Vec<&Template> {
        query::query(&self.templates, filter, sort)
    }

    /// Filtered, optionally sorted list-view summaries.
    pub fn list(&self, filter: &TemplateFilter, sort: Option<SortSpec>) -> Vec<TemplateSummary> {
        self.query(filter, sort)
            .into_iter()
            .map(Template::summary)
            .collect()
    }

    /// Bump the download counter of `id` once; returns the new count.
    pub fn record_download(&mut self, id: &TemplateId) -> Result<u64, CatalogError> {
        let template = self
            .templates
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| CatalogError::TemplateNotFound { id: id.clone() })?;
        template.download_count = template.download_count.saturating_add(1);
        Ok(template.download_count)
    }

    /// Check structural rules: unique ids, unique variable names per template,
    /// `updated_at >= created_at`, defaults shaped like their declared kind.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut ids = HashSet::new();
        for t in &self.templates {
            let invalid = |reason: String| CatalogError::InvalidTemplate {
                id: t.id.clone(),
                reason,
            };
            if !ids.insert(&t.id) {
                return Err(invalid("duplicate template id".to_string()));
            }
            if t.updated_at < t.created_at {
                return Err(invalid("updated_at is earlier than created_at".to_string()));
            }
            let mut names = HashSet::new();
            for var in &t.variables {
                if !is_placeholder_name(&var.name) {
                    return Err(invalid(format!(
                        "variable name {:?} cannot appear in a placeholder",
                        var.name
                    )));
                }
                if !names.insert(var.name.as_str()) {
                    return Err(invalid(format!("duplicate variable '{}'", var.name)));
                }
                if let Some(default) = &var.default {
                    if !default.conforms_to(var.kind) {
                        return Err(invalid(format!(
                            "default of '{}' is not a {}",
                            var.name, var.kind
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// 2. Path helpers
// ---------------------------------------------------------------------------

/// `<home>/.hardenkit/` — pure, no I/O.
pub fn data_dir_at(home: &Path) -> PathBuf {
    home.join(".hardenkit")
}

/// `<home>/.hardenkit/layouts/`: optional `.tera` overrides for the script
/// wrapper. Pure, no I/O.
pub fn layouts_dir_at(home: &Path) -> PathBuf {
    data_dir_at(home).join("layouts")
}

/// `<home>/.hardenkit/catalog.yaml` — pure, no I/O.
pub fn catalog_path_at(home: &Path) -> PathBuf {
    data_dir_at(home).join("catalog.yaml")
}

// ---------------------------------------------------------------------------
// 3. Load
// ---------------------------------------------------------------------------

/// Load the catalog from `<home>/.hardenkit/catalog.yaml`.
///
/// Returns `CatalogError::CatalogNotFound` if absent,
/// `CatalogError::Parse` (with path + line context) if malformed YAML,
/// `CatalogError::UnsupportedVersion` for any version but [`CATALOG_VERSION`].
pub fn load_at(home: &Path) -> Result<Catalog, CatalogError> {
    let path = catalog_path_at(home);
    if !path.exists() {
        return Err(CatalogError::CatalogNotFound { path });
    }
    let contents = std::fs::read_to_string(&path)?;
    let catalog: Catalog = serde_yaml::from_str(&contents).map_err(|e| parse_err(&path, e))?;
    if catalog.version != CATALOG_VERSION {
        return Err(CatalogError::UnsupportedVersion {
            path,
            found: catalog.version,
            supported: CATALOG_VERSION,
        });
    }
    catalog.validate()?;
    Ok(catalog)
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<Catalog, CatalogError> {
    load_at(&home()?)
}

/// Load the saved catalog, or the built-in one if none has been initialised.
pub fn open_at(home: &Path) -> Result<Catalog, CatalogError> {
    match load_at(home) {
        Err(CatalogError::CatalogNotFound { .. }) => Catalog::builtin(),
        other => other,
    }
}

// ---------------------------------------------------------------------------
// 4. Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically save the catalog to `<home>/.hardenkit/catalog.yaml`.
///
/// Write flow: serialize → `.yaml.tmp` sibling → `chmod 0600` → `rename`.
pub fn save_at(home: &Path, catalog: &Catalog) -> Result<(), CatalogError> {
    ensure_data_dir(home)?;
    let path = catalog_path_at(home);
    let tmp_path = path.with_file_name("catalog.yaml.tmp");

    let yaml = serde_yaml::to_string(catalog)?;
    std::fs::write(&tmp_path, yaml)?;
    set_file_permissions(&tmp_path)?;
    std::fs::rename(&tmp_path, &path)?;
    Ok(())
}

/// `save_at` convenience wrapper.
pub fn save(catalog: &Catalog) -> Result<(), CatalogError> {
    save_at(&home()?, catalog)
}

// ---------------------------------------------------------------------------
// 5. Init
// ---------------------------------------------------------------------------

/// Seed `<home>/.hardenkit/catalog.yaml` with the built-in catalog.
///
/// Idempotent: if the file already exists and `force` is false, loads and
/// returns it unchanged.
pub fn init_at(home: &Path, force: bool) -> Result<Catalog, CatalogError> {
    if catalog_path_at(home).exists() && !force {
        return load_at(home);
    }
    let catalog = Catalog::builtin()?;
    save_at(home, &catalog)?;
    Ok(catalog)
}

/// `init_at` convenience wrapper.
pub fn init(force: bool) -> Result<Catalog, CatalogError> {
    init_at(&home()?, force)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

pub(crate) fn home() -> Result<PathBuf, CatalogError> {
    dirs::home_dir().ok_or(CatalogError::HomeNotFound)
}

/// Create `<home>/.hardenkit/` (mode `0700`) if it does not yet exist.
pub(crate) fn ensure_data_dir(home: &Path) -> Result<PathBuf, CatalogError> {
    let dir = data_dir_at(home);
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
        set_dir_permissions(&dir)?;
    }
    Ok(dir)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), CatalogError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), CatalogError> {
    Ok(())
}

#[cfg(unix)]
pub(crate) fn set_file_permissions(path: &Path) -> Result<(), CatalogError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}
#[cfg(not(unix))]
pub(crate) fn set_file_permissions(_path: &Path) -> Result<(), CatalogError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
