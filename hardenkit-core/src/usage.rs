//! Usage recorder: append-only log of template generations.
//!
//! Persists a [`UsageLog`] JSON document at `<home>/.hardenkit/usage.json`.
//! Writes use the same atomic `.tmp` + rename pattern as the catalog.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{data_dir_at, ensure_data_dir, home, set_file_permissions};
use crate::error::{parse_err, CatalogError};
use crate::types::{TemplateId, VariableMap};

/// One completed generation. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub template_id: TemplateId,
    pub recorded_at: DateTime<Utc>,
    pub user: String,
    #[serde(default)]
    pub variables: VariableMap,
    pub success: bool,
}

/// In-memory usage log. No deduplication, no retention policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageLog {
    #[serde(default)]
    records: Vec<UsageRecord>,
}

impl UsageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record stamped with the current time and return it.
    pub fn record(
        &mut self,
        template_id: TemplateId,
        user: impl Into<String>,
        variables: VariableMap,
        success: bool,
    ) -> &UsageRecord {
        self.push(UsageRecord {
            template_id,
            recorded_at: Utc::now(),
            user: user.into(),
            variables,
            success,
        })
    }

    /// Append an already-built record.
    pub fn push(&mut self, record: UsageRecord) -> &UsageRecord {
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[UsageRecord] {
        &self.records
    }

    pub fn for_template<'a>(&'a self, id: &'a TemplateId) -> impl Iterator<Item = &'a UsageRecord> {
        self.records.iter().filter(move |r| &r.template_id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// `<home>/.hardenkit/usage.json` — pure, no I/O.
pub fn usage_path_at(home: &Path) -> PathBuf {
    data_dir_at(home).join("usage.json")
}

/// Load the usage log. Returns an empty log if the file does not yet exist.
pub fn load_at(home: &Path) -> Result<UsageLog, CatalogError> {
    let path = usage_path_at(home);
    if !path.exists() {
        return Ok(UsageLog::new());
    }
    let contents = std::fs::read_to_string(&path)?;
    serde_json::from_str(&contents).map_err(|e| parse_err(&path, e))
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<UsageLog, CatalogError> {
    load_at(&home()?)
}

/// Save the usage log atomically: `<path>.tmp` then rename.
pub fn save_at(home: &Path, log: &UsageLog) -> Result<(), CatalogError> {
    ensure_data_dir(home)?;
    let path = usage_path_at(home);
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(log)?;
    std::fs::write(&tmp, json)?;
    set_file_permissions(&tmp)?;
    std::fs::rename(&tmp, &path)?;
    Ok(())
}

/// `save_at` convenience wrapper.
pub fn save(log: &UsageLog) -> Result<(), CatalogError> {
    save_at(&home()?, log)
}
