//! hardenkit core library — template catalog, queries, usage log, settings.
//!
//! - [`types`] — newtypes, the [`Value`] union and domain structs
//! - [`error`] — [`CatalogError`]
//! - [`catalog`] — the [`Catalog`] repository and its load / save / init
//! - [`query`] — filter and sort
//! - [`usage`] — the append-only [`UsageLog`]
//! - [`config`] — [`Settings`]

pub mod catalog;
pub mod config;
pub mod error;
pub mod query;
pub mod types;
pub mod usage;

pub use catalog::Catalog;
pub use config::Settings;
pub use error::CatalogError;
pub use query::{SortDirection, SortKey, SortSpec, TemplateFilter};
pub use types::{
    ChecklistType, Constraint, Difficulty, Template, TemplateId, TemplateSummary, Value, Variable,
    VariableKind, VariableMap,
};
pub use usage::{UsageLog, UsageRecord};
