//! Domain types for the hardenkit template catalog.
//!
//! All types are serializable/deserializable via serde + serde_yaml.
//! Field names on disk are snake_case.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Stable unique identifier of a template in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TemplateId(pub String);

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TemplateId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TemplateId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Checklist code classifying which compliance check a template implements
/// (e.g. `U-102`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChecklistType(pub String);

impl fmt::Display for ChecklistType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ChecklistType {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ChecklistType {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How hard a template is to apply safely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!(
                "unknown difficulty '{other}'; expected: easy, medium, hard"
            )),
        }
    }
}

/// Declared type of a template variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    #[default]
    String,
    Number,
    Boolean,
    Array,
    Select,
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableKind::String => write!(f, "string"),
            VariableKind::Number => write!(f, "number"),
            VariableKind::Boolean => write!(f, "boolean"),
            VariableKind::Array => write!(f, "array"),
            VariableKind::Select => write!(f, "select"),
        }
    }
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A variable value: the tagged union over the shapes a [`VariableKind`] admits.
///
/// Deserialized untagged, so YAML `8` is a number, `true` a boolean,
/// `[a, b]` a list and anything else text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl Value {
    /// Parse a raw boundary string (CLI argument, form field) against `kind`.
    ///
    /// Arrays are split on `separator` and each item trimmed; empty items are dropped.
    pub fn parse_as(
        name: &str,
        kind: VariableKind,
        raw: &str,
        separator: &str,
    ) -> Result<Value, CatalogError> {
        let invalid = |reason: &str| CatalogError::InvalidValue {
            name: name.to_string(),
            kind,
            reason: reason.to_string(),
        };
        match kind {
            VariableKind::String | VariableKind::Select => Ok(Value::Text(raw.to_string())),
            VariableKind::Number => {
                let n: f64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| invalid("expected a number"))?;
                if !n.is_finite() {
                    return Err(invalid("number must be finite"));
                }
                Ok(Value::Number(n))
            }
            VariableKind::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
                "false" | "no" | "off" | "0" => Ok(Value::Bool(false)),
                _ => Err(invalid("expected true/false")),
            },
            VariableKind::Array => {
                if separator.is_empty() {
                    return Err(invalid("array separator is empty"));
                }
                Ok(Value::List(
                    raw.split(separator)
                        .map(str::trim)
                        .filter(|item| !item.is_empty())
                        .map(str::to_string)
                        .collect(),
                ))
            }
        }
    }

    /// Whether this value has the shape `kind` declares.
    pub fn conforms_to(&self, kind: VariableKind) -> bool {
        matches!(
            (kind, self),
            (VariableKind::String, Value::Text(_))
                | (VariableKind::Select, Value::Text(_))
                | (VariableKind::Number, Value::Number(_))
                | (VariableKind::Boolean, Value::Bool(_))
                | (VariableKind::Array, Value::List(_))
        )
    }

    /// Natural textual form; lists are joined with `separator`.
    pub fn render(&self, separator: &str) -> String {
        match self {
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
            Value::List(items) => items.join(separator),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(","))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

/// `8.0` prints as `8`; everything else uses the shortest round-trip form.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Caller-supplied values keyed by variable name. Sparse: absent names fall
/// back to the variable's default.
pub type VariableMap = BTreeMap<String, Value>;

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// Optional bounds on a variable's value. Only the fields relevant to the
/// variable's kind are evaluated: `min`/`max` for numbers,
/// `min_length`/`max_length`/`pattern` for strings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Constraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Regex the whole value must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// A declared template variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Placeholder key; `{{name}}` in the body.
    pub name: String,
    pub kind: VariableKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<Constraint>,
    /// Allowed choices for `select` variables.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// Whether `name` can appear inside a `{{NAME}}` token: non-empty, with no
/// whitespace, control characters or braces.
pub fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '{' || c == '}')
}

impl Variable {
    /// The `{{NAME}}` token this variable replaces.
    pub fn placeholder(&self) -> String {
        format!("{{{{{}}}}}", self.name)
    }
}

/// A shell-script template with its variable schema and catalog metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub checklist_type: ChecklistType,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub author: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub is_official: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub download_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub variables: Vec<Variable>,
    pub body: String,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_true() -> bool {
    true
}

impl Template {
    /// Look up a declared variable by name.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            checklist_type: self.checklist_type.clone(),
            tags: self.tags.clone(),
            difficulty: self.difficulty,
            is_official: self.is_official,
            download_count: self.download_count,
            variable_count: self.variables.len(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// List-view projection of a [`Template`] (no body, no schema).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub checklist_type: ChecklistType,
    pub tags: Vec<String>,
    pub difficulty: Difficulty,
    pub is_official: bool,
    pub download_count: u64,
    pub variable_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
